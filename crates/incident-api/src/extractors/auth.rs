//! Bearer token authentication
//!
//! The token subject is the acting user recorded on audit rows.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use incident_common::JwtService;
use tracing::warn;
use uuid::Uuid;

use crate::response::ApiError;
use crate::state::AppState;

/// Caller identified by a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl AuthUser {
    /// Resolve the caller from a raw bearer token
    pub fn from_token(jwt: &JwtService, token: &str) -> Result<Self, ApiError> {
        let user_id = jwt
            .validate_access_token(token)
            .and_then(|claims| claims.user_id())
            .map_err(|e| {
                warn!(error = %e, "rejected access token");
                ApiError::App(e)
            })?;

        Ok(Self { user_id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let state = AppState::from_ref(state);
        Self::from_token(state.jwt_service(), bearer.token())
    }
}
