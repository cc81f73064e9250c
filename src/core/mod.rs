//! Extraction core.
//!
//! ## Module Structure
//!
//! - `data`: Translation records, usages and source locations
//! - `expression`: `{{ 'ID' | translate }}` filter expression matcher
//! - `parsers`: Markup tokenizer and script parser
//! - `markup`: Parse Context, markup extractors and the stateful markup parser
//! - `script`: Script visitor with comment-scoped error suppression
//! - `registry`: Translations registry merging every file's results
//! - `host`: Callback surface and the build session
//! - `catalog`: Serialized `id -> text` output

pub mod catalog;
pub mod data;
pub mod expression;
pub mod host;
pub mod markup;
pub mod parsers;
pub mod registry;
pub mod script;
