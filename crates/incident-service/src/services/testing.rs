//! In-memory repositories for service tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use incident_common::auth::JwtService;
use incident_common::AuditConfig;
use incident_core::audit::{group_into_batches, AuditBatch, AuditRecord, AuditReference, NewAuditBatch};
use incident_core::entities::{IncidentComment, IncidentReport};
use incident_core::traits::{AuditLogRepository, CommentRepository, IncidentRepository, RepoResult};
use incident_core::{DomainError, EntityType, Page, PageRequest};
use uuid::Uuid;

use super::context::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
struct State {
    incidents: HashMap<Uuid, IncidentReport>,
    comments: HashMap<Uuid, IncidentComment>,
    audit: Vec<AuditRecord>,
}

impl State {
    fn append(&mut self, batch: &NewAuditBatch) {
        let first_id = i64::try_from(self.audit.len()).unwrap() + 1;
        self.audit.extend(batch.clone().into_records(first_id));
    }
}

/// One store backing all three repositories, like a single database
#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn audit_rows(&self) -> Vec<AuditRecord> {
        self.lock().audit.clone()
    }

    fn timeline(
        &self,
        page: PageRequest,
        matches: impl Fn(&AuditRecord) -> bool,
    ) -> Page<AuditBatch> {
        let rows: Vec<AuditRecord> = self.lock().audit.iter().filter(|r| matches(r)).cloned().collect();
        // Rows are stored in id order, so batches come out oldest first
        let mut batches = group_into_batches(rows);
        batches.reverse();

        let total = batches.len() as u64;
        Page::new(page.slice(&batches).to_vec(), total, page)
    }
}

fn check_version(actual: i32, expected: i32) -> RepoResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(DomainError::StaleVersion { expected, actual })
    }
}

#[async_trait]
impl IncidentRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<IncidentReport>> {
        Ok(self.lock().incidents.get(&id).cloned())
    }

    async fn list(&self, page: PageRequest) -> RepoResult<Page<IncidentReport>> {
        let mut incidents: Vec<IncidentReport> = self.lock().incidents.values().cloned().collect();
        incidents.sort_by(|a, b| b.occurred_utc.cmp(&a.occurred_utc).then(a.id.cmp(&b.id)));
        let total = incidents.len() as u64;
        Ok(Page::new(page.slice(&incidents).to_vec(), total, page))
    }

    async fn create(&self, incident: &IncidentReport, audit: &NewAuditBatch) -> RepoResult<()> {
        let mut state = self.lock();
        state.incidents.insert(incident.id, incident.clone());
        state.append(audit);
        Ok(())
    }

    async fn update(
        &self,
        incident: &IncidentReport,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()> {
        let mut state = self.lock();
        let stored = state
            .incidents
            .get_mut(&incident.id)
            .ok_or(DomainError::IncidentNotFound(incident.id))?;
        check_version(stored.row_version, expected_version)?;

        *stored = incident.clone();
        stored.row_version = expected_version + 1;
        state.append(audit);
        Ok(())
    }

    async fn delete(&self, id: Uuid, expected_version: i32, audit: &NewAuditBatch) -> RepoResult<()> {
        let mut state = self.lock();
        let stored = state
            .incidents
            .get(&id)
            .ok_or(DomainError::IncidentNotFound(id))?;
        check_version(stored.row_version, expected_version)?;
        if state.comments.values().any(|c| c.incident_id == id) {
            return Err(DomainError::IncidentHasComments);
        }

        state.incidents.remove(&id);
        state.append(audit);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<IncidentComment>> {
        Ok(self.lock().comments.get(&id).cloned())
    }

    async fn list_by_incident(
        &self,
        incident_id: Uuid,
        page: PageRequest,
    ) -> RepoResult<Page<IncidentComment>> {
        let mut comments: Vec<IncidentComment> = self
            .lock()
            .comments
            .values()
            .filter(|c| c.incident_id == incident_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_utc.cmp(&b.created_utc).then(a.id.cmp(&b.id)));
        let total = comments.len() as u64;
        Ok(Page::new(page.slice(&comments).to_vec(), total, page))
    }

    async fn create(&self, comment: &IncidentComment, audit: &NewAuditBatch) -> RepoResult<()> {
        let mut state = self.lock();
        if !state.incidents.contains_key(&comment.incident_id) {
            return Err(DomainError::IncidentNotFound(comment.incident_id));
        }
        state.comments.insert(comment.id, comment.clone());
        state.append(audit);
        Ok(())
    }

    async fn update(
        &self,
        comment: &IncidentComment,
        expected_version: i32,
        audit: &NewAuditBatch,
    ) -> RepoResult<()> {
        let mut state = self.lock();
        let stored = state
            .comments
            .get_mut(&comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        check_version(stored.row_version, expected_version)?;

        *stored = comment.clone();
        stored.row_version = expected_version + 1;
        state.append(audit);
        Ok(())
    }

    async fn delete(&self, id: Uuid, expected_version: i32, audit: &NewAuditBatch) -> RepoResult<()> {
        let mut state = self.lock();
        let stored = state
            .comments
            .get(&id)
            .ok_or(DomainError::CommentNotFound(id))?;
        check_version(stored.row_version, expected_version)?;

        state.comments.remove(&id);
        state.append(audit);
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for MemoryStore {
    async fn timeline_by_entity(
        &self,
        entity_id: Uuid,
        entity_type: Option<EntityType>,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>> {
        Ok(self.timeline(page, |r| {
            r.entity_id == entity_id && entity_type.map_or(true, |t| r.entity_type == t)
        }))
    }

    async fn timeline_by_reference(
        &self,
        reference: &AuditReference,
        page: PageRequest,
    ) -> RepoResult<Page<AuditBatch>> {
        Ok(self.timeline(page, |r| r.reference.as_ref() == Some(reference)))
    }

    async fn batch_detail(&self, batch_id: Uuid) -> RepoResult<Vec<AuditRecord>> {
        Ok(self
            .lock()
            .audit
            .iter()
            .filter(|r| r.batch_id == batch_id)
            .cloned()
            .collect())
    }
}

/// Service context wired to one in-memory store
pub(crate) fn test_context(store: Arc<MemoryStore>) -> ServiceContext {
    ServiceContextBuilder::new()
        .incident_repo(store.clone())
        .comment_repo(store.clone())
        .audit_repo(store)
        .jwt_service(Arc::new(JwtService::new("service-test-secret", 900)))
        .audit_config(AuditConfig::default())
        .build()
        .unwrap()
}
