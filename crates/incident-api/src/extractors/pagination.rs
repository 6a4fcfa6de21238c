//! Pagination extractor
//!
//! Extracts page-number pagination parameters from query strings.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use incident_core::{PageRequest, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    /// 1-indexed page number
    #[serde(default)]
    pub page: Option<u32>,
    /// Maximum number of items to return
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Validated pagination parameters
///
/// Page 0 is rejected; the limit is clamped to the allowed range.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination(pub PageRequest);

impl TryFrom<PaginationParams> for Pagination {
    type Error = ApiError;

    fn try_from(params: PaginationParams) -> Result<Self, Self::Error> {
        let request = PageRequest::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(Pagination(request))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Pagination::try_from(params)
    }
}
