//! Utility types for the texture importer.
//!
//! - [`Error`] / [`Result`] - Error handling

mod error;

pub use error::*;
