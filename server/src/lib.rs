//! `NatioID` Server
//!
//! Identity-document applications: a citizen wizard that builds and submits
//! drafts, a public tracking lookup, and an operator review queue with
//! confirmation-gated status changes and bulk actions.

pub mod api;
pub mod audit;
pub mod bulk;
pub mod config;
pub mod drafts;
pub mod gate;
pub mod operator;
pub mod queue;
pub mod sweeper;
pub mod util;
