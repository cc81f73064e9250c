//! Glean - translation string extractor for AngularJS-style projects
//!
//! Glean is a CLI tool and library that harvests translatable text from HTML
//! templates and JavaScript/TypeScript sources, merges every occurrence by
//! translation id and writes a flat `id -> default text` catalog.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction engine (markup parser, script visitor, registry)
//! - `issues`: Diagnostic definitions
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
