//! Core compiler logic: types, parsing, paths, translations, compilation, job output.

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod error;
pub mod job;
pub mod parser;
pub mod path;
pub mod translation;
pub mod types;
