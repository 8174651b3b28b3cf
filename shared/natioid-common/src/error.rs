//! Domain errors.

use crate::types::ApplicationStatus;

/// Result alias for domain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by domain rules, independent of any transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The status table does not allow this move.
    #[error("Cannot move application from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// Rejections must say why.
    #[error("A rejection reason is required")]
    MissingRejectionReason,

    /// Payment requests must carry a positive fee.
    #[error("Fee must be greater than zero")]
    InvalidFee,

    /// Approval is blocked until the outstanding fee is paid.
    #[error("Application has an outstanding fee")]
    PaymentOutstanding,

    /// Payment was recorded against an application that owes nothing.
    #[error("Application has no payment due")]
    NoPaymentDue,
}
