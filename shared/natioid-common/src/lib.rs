//! NatioID Common Library
//!
//! Domain types shared by the server and its tests: the document type
//! registry, application reasons, and the application status machine.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
