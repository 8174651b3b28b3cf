//! Domain types.

pub mod application;
pub mod document;
pub mod reason;

pub use application::*;
pub use document::*;
pub use reason::*;
