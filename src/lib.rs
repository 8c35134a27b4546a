//! Horizon: provisioning definition compiler.
//!
//! Turns a nested XML definition of contents, schemas, fields, columns,
//! features and datasets into an ordered job of API calls and local queries,
//! and keeps every human-readable text in a path-keyed multilingual table.

pub mod builders;
pub mod cli;
pub mod core;
