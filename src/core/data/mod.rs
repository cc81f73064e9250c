//! Core data types used across the extraction pipeline.
//!
//! ## Module Structure
//!
//! - `source`: Source positions (`Location`) and occurrences of an id in a resource (`Usage`)
//! - `translation`: Translation records and their merge rules

pub mod source;
pub mod translation;

pub use source::{Location, Usage};
pub use translation::{MergeConflict, Translation};
