//! Server-side draft store keyed by draft id.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use natioid_common::ApplicationType;
use uuid::Uuid;

use super::types::{ApplicationDraft, DraftError};
use crate::config::MAX_TTL_SECS;

#[derive(Debug)]
pub struct DraftStore {
    drafts: DashMap<Uuid, ApplicationDraft>,
    ttl: Duration,
}

impl DraftStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            drafts: DashMap::new(),
            ttl: Duration::seconds(ttl_secs.clamp(1, MAX_TTL_SECS)),
        }
    }

    pub fn create(&self, application_type: ApplicationType) -> ApplicationDraft {
        let draft = ApplicationDraft::new(application_type, Utc::now());
        self.drafts.insert(draft.id, draft.clone());
        draft
    }

    pub fn get(&self, id: Uuid) -> Result<ApplicationDraft, DraftError> {
        self.drafts
            .get(&id)
            .map(|d| d.value().clone())
            .ok_or(DraftError::NotFound)
    }

    /// Run `f` against the stored draft and return the updated copy.
    pub fn update<F>(&self, id: Uuid, f: F) -> Result<ApplicationDraft, DraftError>
    where
        F: FnOnce(&mut ApplicationDraft) -> Result<(), DraftError>,
    {
        let mut entry = self.drafts.get_mut(&id).ok_or(DraftError::NotFound)?;
        f(entry.value_mut())?;
        Ok(entry.value().clone())
    }

    /// Remove the draft if it passes validation.
    ///
    /// Incomplete drafts stay in the store and the first problem is reported.
    pub fn take_complete(&self, id: Uuid) -> Result<ApplicationDraft, DraftError> {
        if let Some((_, draft)) = self.drafts.remove_if(&id, |_, d| d.validate().is_ok()) {
            return Ok(draft);
        }
        let draft = self.drafts.get(&id).ok_or(DraftError::NotFound)?;
        match draft.validate() {
            Err(failure) => Err(DraftError::Incomplete(failure)),
            // Completed by a concurrent request between the two lookups.
            Ok(()) => Err(DraftError::Validation("Draft changed during submission, retry".into())),
        }
    }

    pub fn remove(&self, id: Uuid) -> Result<ApplicationDraft, DraftError> {
        self.drafts
            .remove(&id)
            .map(|(_, d)| d)
            .ok_or(DraftError::NotFound)
    }

    /// Drop drafts untouched for longer than the TTL.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.ttl;
        let before = self.drafts.len();
        self.drafts.retain(|_, d| d.updated_at > cutoff);
        before.saturating_sub(self.drafts.len())
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::types::ValidationFailure;
    use natioid_common::DocumentType;

    #[test]
    fn update_persists_changes() {
        let store = DraftStore::new(60);
        let draft = store.create(ApplicationType::New);
        let updated = store
            .update(draft.id, |d| {
                d.select_document_type(DocumentType::Passport, Utc::now());
                Ok(())
            })
            .unwrap();
        assert_eq!(updated.document_type, Some(DocumentType::Passport));
        assert_eq!(store.get(draft.id).unwrap(), updated);
    }

    #[test]
    fn failed_update_reports_error() {
        let store = DraftStore::new(60);
        assert!(matches!(
            store.update(Uuid::new_v4(), |_| Ok(())),
            Err(DraftError::NotFound)
        ));
    }

    #[test]
    fn incomplete_drafts_are_not_taken() {
        let store = DraftStore::new(60);
        let draft = store.create(ApplicationType::New);
        assert!(matches!(
            store.take_complete(draft.id),
            Err(DraftError::Incomplete(ValidationFailure::MissingDocumentType))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn purge_drops_idle_drafts() {
        let store = DraftStore::new(60);
        let draft = store.create(ApplicationType::New);
        assert_eq!(store.purge_expired(Utc::now()), 0);
        assert_eq!(store.purge_expired(draft.updated_at + Duration::seconds(61)), 1);
        assert!(store.is_empty());
    }
}
