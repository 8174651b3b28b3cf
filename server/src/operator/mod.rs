//! Operator Identity
//!
//! Admin endpoints are attributed to an operator named in the
//! `X-Operator-Id` header. The id is checked for shape and against the
//! configured allowlist; it is not a credential.

pub mod middleware;
pub mod types;

pub use middleware::require_operator;
pub use types::{Operator, OperatorError};

/// Header carrying the operator id on admin requests.
pub const OPERATOR_HEADER: &str = "x-operator-id";
