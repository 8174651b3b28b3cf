//! Application Records and Status Machine
//!
//! A submitted application moves through a fixed transition table. Every
//! status change goes through [`ApplicationRecord::apply`], which checks the
//! table and the invariants attached to the target status.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ApplicationType, DocumentType};
use crate::error::{Error, Result};

/// Review status of a submitted application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    PendingPayment,
    Approved,
    Rejected,
    Completed,
}

impl ApplicationStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::UnderReview,
        Self::PendingPayment,
        Self::Approved,
        Self::Rejected,
        Self::Completed,
    ];

    /// Statuses reachable in one step from `self`.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[
                Self::UnderReview,
                Self::PendingPayment,
                Self::Approved,
                Self::Rejected,
            ],
            Self::UnderReview => &[Self::PendingPayment, Self::Approved, Self::Rejected],
            Self::PendingPayment => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Completed],
            Self::Rejected | Self::Completed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Whether an operator may still ask the applicant for more information.
    #[must_use]
    pub const fn accepts_info_requests(self) -> bool {
        matches!(self, Self::Pending | Self::UnderReview)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under_review",
            Self::PendingPayment => "pending_payment",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested status change together with the data the target status needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChange {
    /// An operator picks the application up.
    BeginReview { operator_id: Uuid },
    Approve,
    Reject { reason: String },
    /// Fee in minor currency units.
    RequestPayment { fee: u64 },
    /// The applicant paid the outstanding fee.
    RecordPayment,
    /// The document was issued and handed over.
    Complete,
}

impl StatusChange {
    /// Status the record ends up in.
    #[must_use]
    pub const fn target(&self) -> ApplicationStatus {
        match self {
            Self::BeginReview { .. } => ApplicationStatus::UnderReview,
            Self::Approve | Self::RecordPayment => ApplicationStatus::Approved,
            Self::Reject { .. } => ApplicationStatus::Rejected,
            Self::RequestPayment { .. } => ApplicationStatus::PendingPayment,
            Self::Complete => ApplicationStatus::Completed,
        }
    }

    /// Audit action name.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::BeginReview { .. } => "application.claim",
            Self::Approve => "application.approve",
            Self::Reject { .. } => "application.reject",
            Self::RequestPayment { .. } => "application.request_payment",
            Self::RecordPayment => "application.payment",
            Self::Complete => "application.complete",
        }
    }
}

/// A submitted application as seen by operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApplicationRecord {
    pub id: Uuid,
    /// Code handed to the applicant for tracking.
    pub tracking_code: String,
    pub applicant_name: String,
    pub application_type: ApplicationType,
    pub document_type: DocumentType,
    pub reason: Option<String>,
    pub fields: BTreeMap<String, String>,
    pub status: ApplicationStatus,
    /// Outstanding or paid fee in minor currency units.
    pub fee: Option<u64>,
    pub fee_paid_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub assigned_operator: Option<Uuid>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// Apply a status change, returning the previous status.
    ///
    /// Nothing is modified when the change is refused.
    pub fn apply(&mut self, change: StatusChange, now: DateTime<Utc>) -> Result<ApplicationStatus> {
        let from = self.status;
        let to = change.target();

        match &change {
            StatusChange::Approve if from == ApplicationStatus::PendingPayment => {
                return Err(Error::PaymentOutstanding);
            }
            StatusChange::RecordPayment if from != ApplicationStatus::PendingPayment => {
                return Err(Error::NoPaymentDue);
            }
            StatusChange::Reject { reason } if reason.trim().is_empty() => {
                return Err(Error::MissingRejectionReason);
            }
            StatusChange::RequestPayment { fee: 0 } => return Err(Error::InvalidFee),
            _ => {}
        }

        if !from.can_transition_to(to) {
            return Err(Error::InvalidTransition { from, to });
        }

        match change {
            StatusChange::BeginReview { operator_id } => {
                self.assigned_operator = Some(operator_id);
            }
            StatusChange::Reject { reason } => {
                self.rejection_reason = Some(reason.trim().to_string());
            }
            StatusChange::RequestPayment { fee } => {
                self.fee = Some(fee);
                self.fee_paid_at = None;
            }
            StatusChange::RecordPayment => self.fee_paid_at = Some(now),
            StatusChange::Approve | StatusChange::Complete => {}
        }

        self.status = to;
        self.updated_at = now;
        Ok(from)
    }

    /// Check the invariants tied to the current status.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        match self.status {
            ApplicationStatus::Rejected => self
                .rejection_reason
                .as_deref()
                .is_some_and(|r| !r.trim().is_empty()),
            ApplicationStatus::PendingPayment => {
                self.fee.is_some_and(|f| f > 0) && self.fee_paid_at.is_none()
            }
            _ => true,
        }
    }
}
