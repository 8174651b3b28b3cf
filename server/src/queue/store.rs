//! In-memory review queue.
//!
//! All records live behind a single `RwLock`. Every mutation happens inside
//! one write-lock critical section, so a bulk action is applied atomically
//! with respect to other requests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use natioid_common::{
    ApplicationRecord, ApplicationStatus, ApplicationType, DocumentType, StatusChange,
};
use rand::Rng;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{
    ApplicationDetail, ApplicationSummary, InfoRequest, PaginatedApplications, QueueError,
    QueueFilter, QueueStats, SortOrder, TrackingResponse,
};
use crate::audit::{AuditEntry, AuditLog};

/// Characters used in tracking codes. Excludes look-alikes (0/O, 1/I).
const TRACKING_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const TRACKING_SUFFIX_LEN: usize = 6;

/// A validated application about to enter the queue.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub applicant_name: String,
    pub application_type: ApplicationType,
    pub document_type: DocumentType,
    pub reason: Option<String>,
    pub fields: BTreeMap<String, String>,
}

/// Result of applying one action to one record inside a bulk pass.
pub type ItemResult = Result<ApplicationRecord, QueueError>;

#[derive(Debug, Default)]
struct QueueState {
    records: Vec<ApplicationRecord>,
    /// Side table: records for which more information was requested.
    info_requests: HashMap<Uuid, InfoRequest>,
}

impl QueueState {
    fn position(&self, id: Uuid) -> Result<usize, QueueError> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or(QueueError::NotFound)
    }

    fn detail(&self, record: &ApplicationRecord) -> ApplicationDetail {
        ApplicationDetail {
            record: record.clone(),
            info_request: self.info_requests.get(&record.id).cloned(),
            allowed_transitions: record.status.allowed_transitions().to_vec(),
        }
    }

    fn sorted_matches(&self, filter: &QueueFilter) -> Vec<&ApplicationRecord> {
        let mut matches: Vec<&ApplicationRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();
        match filter.sort {
            SortOrder::Newest => {
                matches.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(a.id.cmp(&b.id)));
            }
            SortOrder::Oldest => {
                matches.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then(a.id.cmp(&b.id)));
            }
            SortOrder::Name => matches.sort_by_cached_key(|r| (r.applicant_name.to_lowercase(), r.id)),
        }
        matches
    }

    fn transition(
        &mut self,
        id: Uuid,
        change: StatusChange,
        actor: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(ApplicationRecord, AuditEntry), QueueError> {
        let idx = self.position(id)?;
        let action = change.action_name();
        let details = match &change {
            StatusChange::Reject { reason } => Some(reason.trim().to_string()),
            StatusChange::RequestPayment { fee } => Some(format!("fee={}", crate::util::format_fee(*fee))),
            _ => None,
        };

        let record = &mut self.records[idx];
        let from = record.apply(change, now)?;
        if record.status != ApplicationStatus::Pending && record.status != ApplicationStatus::UnderReview {
            // The outstanding question is moot once a decision is made.
            self.info_requests.remove(&id);
        }

        let mut entry = AuditEntry::new(action, actor, Some(id)).with_transition(from, record.status);
        if let Some(d) = details {
            entry = entry.with_details(d);
        }
        Ok((record.clone(), entry))
    }

    fn request_info(
        &mut self,
        id: Uuid,
        note: Option<String>,
        actor: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(ApplicationRecord, AuditEntry), QueueError> {
        let idx = self.position(id)?;
        let status = self.records[idx].status;
        if self.info_requests.contains_key(&id) {
            return Err(QueueError::InfoAlreadyRequested);
        }
        if !status.accepts_info_requests() {
            return Err(QueueError::InfoNotAccepted(status));
        }

        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self.info_requests.insert(
            id,
            InfoRequest {
                note: note.clone(),
                requested_by: actor,
                requested_at: now,
            },
        );
        self.records[idx].updated_at = now;

        let mut entry = AuditEntry::new("application.request_info", actor, Some(id));
        if let Some(n) = note {
            entry = entry.with_details(n);
        }
        Ok((self.records[idx].clone(), entry))
    }

    fn has_tracking_code(&self, code: &str) -> bool {
        self.records.iter().any(|r| r.tracking_code == code)
    }
}

/// Filterable, paginated collection of submitted applications.
#[derive(Debug)]
pub struct ReviewQueue {
    state: RwLock<QueueState>,
    audit: Arc<AuditLog>,
    page_size: usize,
}

impl ReviewQueue {
    pub fn new(audit: Arc<AuditLog>, page_size: usize) -> Self {
        Self::with_records(audit, page_size, Vec::new())
    }

    pub fn with_records(audit: Arc<AuditLog>, page_size: usize, records: Vec<ApplicationRecord>) -> Self {
        Self {
            state: RwLock::new(QueueState {
                records,
                info_requests: HashMap::new(),
            }),
            audit,
            page_size: page_size.max(1),
        }
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Add a submitted application as `pending` under a fresh tracking code.
    #[tracing::instrument(skip(self, application), fields(document_type = %application.document_type))]
    pub async fn submit(&self, application: NewApplication) -> ApplicationRecord {
        let now = Utc::now();
        let mut state = self.state.write().await;

        let tracking_code = loop {
            let candidate = generate_tracking_code(now);
            if !state.has_tracking_code(&candidate) {
                break candidate;
            }
        };

        let record = ApplicationRecord {
            id: Uuid::now_v7(),
            tracking_code,
            applicant_name: application.applicant_name,
            application_type: application.application_type,
            document_type: application.document_type,
            reason: application.reason,
            fields: application.fields,
            status: ApplicationStatus::Pending,
            fee: None,
            fee_paid_at: None,
            rejection_reason: None,
            assigned_operator: None,
            submitted_at: now,
            updated_at: now,
        };
        state.records.push(record.clone());
        drop(state);

        tracing::info!(record_id = %record.id, tracking_code = %record.tracking_code, "Application submitted");
        self.audit
            .append(
                AuditEntry::new("application.submit", None, Some(record.id))
                    .with_details(record.tracking_code.clone()),
            )
            .await;
        record
    }

    /// One page of records matching `filter`. Pages are 1-based.
    pub async fn list(&self, filter: &QueueFilter, page: usize) -> PaginatedApplications {
        let page = page.max(1);
        let state = self.state.read().await;
        let matches = state.sorted_matches(filter);
        let total = matches.len();

        let items = matches
            .into_iter()
            .skip((page - 1).saturating_mul(self.page_size))
            .take(self.page_size)
            .map(|r| ApplicationSummary::new(r, state.info_requests.contains_key(&r.id)))
            .collect();

        PaginatedApplications {
            items,
            total,
            page,
            page_size: self.page_size,
            total_pages: total.div_ceil(self.page_size),
        }
    }

    /// Ids of every record matching `filter`, in listing order.
    pub async fn matching_ids(&self, filter: &QueueFilter) -> Vec<Uuid> {
        let state = self.state.read().await;
        state.sorted_matches(filter).into_iter().map(|r| r.id).collect()
    }

    /// Ids on one page of the listing for `filter`.
    pub async fn page_ids(&self, filter: &QueueFilter, page: usize) -> Vec<Uuid> {
        self.list(filter, page).await.items.into_iter().map(|s| s.id).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<ApplicationDetail, QueueError> {
        let state = self.state.read().await;
        let idx = state.position(id)?;
        Ok(state.detail(&state.records[idx]))
    }

    /// Fetch full records for `ids`, skipping unknown ids, in the given order.
    pub async fn records(&self, ids: &[Uuid]) -> Vec<ApplicationRecord> {
        let state = self.state.read().await;
        ids.iter()
            .filter_map(|id| state.records.iter().find(|r| r.id == *id).cloned())
            .collect()
    }

    pub async fn track(&self, tracking_code: &str) -> Result<TrackingResponse, QueueError> {
        let state = self.state.read().await;
        let record = state
            .records
            .iter()
            .find(|r| r.tracking_code.eq_ignore_ascii_case(tracking_code.trim()))
            .ok_or(QueueError::NotFound)?;
        Ok(TrackingResponse::new(record, state.info_requests.get(&record.id)))
    }

    pub async fn stats(&self) -> QueueStats {
        let state = self.state.read().await;
        let mut stats = QueueStats::default();
        for r in &state.records {
            stats.count(r.status);
        }
        stats
    }

    /// Dry-run a status change without modifying the queue.
    pub async fn check_transition(&self, id: Uuid, change: &StatusChange) -> Result<(), QueueError> {
        let state = self.state.read().await;
        let idx = state.position(id)?;
        let mut scratch = state.records[idx].clone();
        scratch.apply(change.clone(), Utc::now())?;
        Ok(())
    }

    /// Dry-run an information request without modifying the queue.
    pub async fn check_request_info(&self, id: Uuid) -> Result<(), QueueError> {
        let state = self.state.read().await;
        let idx = state.position(id)?;
        if state.info_requests.contains_key(&id) {
            return Err(QueueError::InfoAlreadyRequested);
        }
        let status = state.records[idx].status;
        if !status.accepts_info_requests() {
            return Err(QueueError::InfoNotAccepted(status));
        }
        Ok(())
    }

    /// Apply a guarded status change.
    #[tracing::instrument(skip(self))]
    pub async fn transition(
        &self,
        id: Uuid,
        change: StatusChange,
        actor: Option<Uuid>,
    ) -> Result<ApplicationDetail, QueueError> {
        let mut state = self.state.write().await;
        let (record, entry) = state.transition(id, change, actor, Utc::now())?;
        let detail = state.detail(&record);
        drop(state);

        tracing::info!(record_id = %id, status = %record.status, "Application status changed");
        self.audit.append(entry).await;
        Ok(detail)
    }

    /// Record the applicant's payment, moving `pending_payment` to `approved`.
    #[tracing::instrument(skip(self))]
    pub async fn record_payment(&self, tracking_code: &str) -> Result<TrackingResponse, QueueError> {
        let mut state = self.state.write().await;
        let id = state
            .records
            .iter()
            .find(|r| r.tracking_code.eq_ignore_ascii_case(tracking_code.trim()))
            .map(|r| r.id)
            .ok_or(QueueError::NotFound)?;
        let (record, entry) = state.transition(id, StatusChange::RecordPayment, None, Utc::now())?;
        let response = TrackingResponse::new(&record, state.info_requests.get(&id));
        drop(state);

        tracing::info!(record_id = %id, "Payment recorded");
        self.audit.append(entry).await;
        Ok(response)
    }

    /// Ask the applicant for more information. Allowed once per record.
    #[tracing::instrument(skip(self))]
    pub async fn request_info(
        &self,
        id: Uuid,
        note: Option<String>,
        actor: Option<Uuid>,
    ) -> Result<ApplicationDetail, QueueError> {
        let mut state = self.state.write().await;
        let (record, entry) = state.request_info(id, note, actor, Utc::now())?;
        let detail = state.detail(&record);
        drop(state);

        self.audit.append(entry).await;
        Ok(detail)
    }

    /// Remove a record and its side-table state.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, actor: Option<Uuid>) -> Result<ApplicationRecord, QueueError> {
        let mut state = self.state.write().await;
        let idx = state.position(id)?;
        let record = state.records.remove(idx);
        state.info_requests.remove(&id);
        drop(state);

        tracing::info!(record_id = %id, "Application deleted");
        self.audit
            .append(
                AuditEntry::new("application.delete", actor, Some(id))
                    .with_details(record.tracking_code.clone()),
            )
            .await;
        Ok(record)
    }

    /// Apply the same status change to every id in one pass.
    pub async fn transition_many(
        &self,
        ids: &[Uuid],
        change: &StatusChange,
        actor: Option<Uuid>,
    ) -> Vec<(Uuid, ItemResult)> {
        let now = Utc::now();
        let mut entries = Vec::new();
        let mut state = self.state.write().await;
        let results = ids
            .iter()
            .map(|&id| {
                let result = state
                    .transition(id, change.clone(), actor, now)
                    .map(|(record, entry)| {
                        entries.push(entry);
                        record
                    });
                (id, result)
            })
            .collect();
        drop(state);

        self.audit.append_all(entries).await;
        results
    }

    /// Request information on every id in one pass.
    pub async fn request_info_many(
        &self,
        ids: &[Uuid],
        note: Option<&str>,
        actor: Option<Uuid>,
    ) -> Vec<(Uuid, ItemResult)> {
        let now = Utc::now();
        let mut entries = Vec::new();
        let mut state = self.state.write().await;
        let results = ids
            .iter()
            .map(|&id| {
                let result = state
                    .request_info(id, note.map(str::to_string), actor, now)
                    .map(|(record, entry)| {
                        entries.push(entry);
                        record
                    });
                (id, result)
            })
            .collect();
        drop(state);

        self.audit.append_all(entries).await;
        results
    }
}

/// Generate a tracking code such as `NID-2026-K7QM2X`.
pub fn generate_tracking_code(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..TRACKING_SUFFIX_LEN)
        .map(|_| char::from(TRACKING_ALPHABET[rng.gen_range(0..TRACKING_ALPHABET.len())]))
        .collect();
    format!("NID-{}-{suffix}", now.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::seed;

    fn queue(page_size: usize) -> ReviewQueue {
        ReviewQueue::with_records(Arc::new(AuditLog::new()), page_size, seed::fixtures(Utc::now()))
    }

    fn new_application(name: &str) -> NewApplication {
        NewApplication {
            applicant_name: name.into(),
            application_type: ApplicationType::New,
            document_type: DocumentType::NationalIdCard,
            reason: None,
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn tracking_code_shape() {
        let code = generate_tracking_code(Utc::now());
        let parts: Vec<_> = code.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "NID");
        assert_eq!(parts[2].len(), TRACKING_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| TRACKING_ALPHABET.contains(&b)));
    }

    #[tokio::test]
    async fn pending_filter_is_independent_of_page_size() {
        for page_size in [1, 2, 3, 5, 10] {
            let q = queue(page_size);
            let filter = QueueFilter {
                status: Some(ApplicationStatus::Pending),
                ..Default::default()
            };
            let ids = q.matching_ids(&filter).await;
            assert_eq!(ids.len(), 3, "page_size={page_size}");

            let mut paged = Vec::new();
            let mut page = 1;
            loop {
                let listing = q.list(&filter, page).await;
                if listing.items.is_empty() {
                    break;
                }
                assert_eq!(listing.total, 3);
                paged.extend(listing.items.into_iter().map(|s| s.id));
                page += 1;
            }
            assert_eq!(paged, ids, "page_size={page_size}");
        }
    }

    #[tokio::test]
    async fn pagination_bounds() {
        let q = queue(3);
        let first = q.list(&QueueFilter::default(), 0).await;
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), 3);
        assert_eq!(first.total, 8);
        assert_eq!(first.total_pages, 3);

        let last = q.list(&QueueFilter::default(), 3).await;
        assert_eq!(last.items.len(), 2);
        assert!(q.list(&QueueFilter::default(), 4).await.items.is_empty());

        let far = q.list(&QueueFilter::default(), usize::MAX).await;
        assert_eq!(far.page, usize::MAX);
        assert!(far.items.is_empty());
        assert_eq!(far.total, 8);
    }

    #[tokio::test]
    async fn name_sort() {
        let q = queue(10);
        let listing = q
            .list(
                &QueueFilter {
                    sort: SortOrder::Name,
                    ..Default::default()
                },
                1,
            )
            .await;
        let names: Vec<_> = listing
            .items
            .iter()
            .map(|s| s.applicant_name.to_lowercase())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn submit_assigns_unique_tracking_codes() {
        let q = ReviewQueue::new(Arc::new(AuditLog::new()), 10);
        let a = q.submit(new_application("Amina Okafor")).await;
        let b = q.submit(new_application("Amina Okafor")).await;
        assert_eq!(a.status, ApplicationStatus::Pending);
        assert_ne!(a.tracking_code, b.tracking_code);
        assert_eq!(q.stats().await.pending, 2);
    }

    #[tokio::test]
    async fn request_info_only_once() {
        let audit = Arc::new(AuditLog::new());
        let q = ReviewQueue::with_records(audit.clone(), 10, seed::fixtures(Utc::now()));
        let id = seed::PENDING_IDS[0];

        let detail = q.request_info(id, Some("Upload a clearer photo".into()), None).await.unwrap();
        assert_eq!(detail.record.status, ApplicationStatus::Pending);
        assert!(detail.info_request.is_some());

        let err = q.request_info(id, None, None).await.unwrap_err();
        assert!(matches!(err, QueueError::InfoAlreadyRequested));
        assert!(matches!(q.check_request_info(id).await, Err(QueueError::InfoAlreadyRequested)));
        assert_eq!(audit.len().await, 1);
    }

    #[tokio::test]
    async fn request_info_refused_after_decision() {
        let q = queue(10);
        let err = q.request_info(seed::APPROVED_IDS[0], None, None).await.unwrap_err();
        assert!(matches!(err, QueueError::InfoNotAccepted(ApplicationStatus::Approved)));
    }

    #[tokio::test]
    async fn transition_many_touches_only_selection() {
        let q = queue(10);
        let before = q.stats().await;
        let selected = [seed::PENDING_IDS[0], seed::PENDING_IDS[2]];

        let results = q.transition_many(&selected, &StatusChange::Approve, None).await;
        assert!(results.iter().all(|(_, r)| r.is_ok()));

        let after = q.stats().await;
        assert_eq!(after.approved, before.approved + 2);
        assert_eq!(after.pending, before.pending - 2);
        assert_eq!(
            q.get(seed::PENDING_IDS[1]).await.unwrap().record.status,
            ApplicationStatus::Pending
        );
    }

    #[tokio::test]
    async fn refused_transition_leaves_record_untouched() {
        let q = queue(10);
        let id = seed::REJECTED_ID;
        let before = q.get(id).await.unwrap().record;
        let err = q.transition(id, StatusChange::Approve, None).await.unwrap_err();
        assert!(matches!(err, QueueError::Rule(natioid_common::Error::InvalidTransition { .. })));
        assert_eq!(q.get(id).await.unwrap().record, before);
    }

    #[tokio::test]
    async fn payment_by_tracking_code() {
        let q = queue(10);
        let id = seed::UNDER_REVIEW_ID;
        q.transition(id, StatusChange::RequestPayment { fee: 4500 }, None)
            .await
            .unwrap();
        let code = q.get(id).await.unwrap().record.tracking_code;

        let tracked = q.record_payment(&code.to_lowercase()).await.unwrap();
        assert_eq!(tracked.status, ApplicationStatus::Approved);
        assert!(tracked.fee_paid_at.is_some());

        assert!(matches!(
            q.record_payment(&code).await,
            Err(QueueError::Rule(natioid_common::Error::NoPaymentDue))
        ));
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let q = queue(10);
        q.delete(seed::PENDING_IDS[0], None).await.unwrap();
        assert!(matches!(q.get(seed::PENDING_IDS[0]).await, Err(QueueError::NotFound)));
        assert_eq!(q.stats().await.total, 7);
    }
}
