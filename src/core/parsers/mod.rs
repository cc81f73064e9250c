//! Source parsers.
//!
//! - `markup`: streaming HTML tokenizer
//! - `script`: JavaScript/TypeScript parser (uses swc for AST generation)

pub mod markup;
pub mod script;
