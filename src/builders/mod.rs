//! Element builders, one per element kind.
//!
//! Each builder reads its element's attributes and children, resolves the
//! translatable texts through the compilation's translation store, and returns
//! the element's path plus the planned task body. Sequencing and recursion
//! into children are the compiler's job.

pub mod column;
pub mod content;
pub mod dataset;
pub mod feature;
pub mod field;
pub mod schema;

use crate::core::error::{Error, Result};
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::{ExecAction, Payload, LOCAL_ADDRESS};

/// A task body before it is given a sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct Planned {
    /// Path of the element, used as the parent path of its children
    pub path: ElementPath,
    pub action: ExecAction,
    pub address: String,
    pub payload: Payload,
}

impl Planned {
    /// An API POST of a JSON document.
    pub fn post(path: ElementPath, address: String, document: serde_json::Value) -> Self {
        Self {
            path,
            action: ExecAction::ApiPost,
            address,
            payload: Payload::Document(document),
        }
    }

    /// A raw statement run against the local database.
    pub fn query(path: ElementPath, statement: String) -> Self {
        Self {
            path,
            action: ExecAction::ExecQuery,
            address: LOCAL_ADDRESS.to_string(),
            payload: Payload::Query(statement),
        }
    }
}

/// A required attribute: present and non-empty.
pub(crate) fn required<'a>(element: &'a Node, attr: &str, at: &ElementPath) -> Result<&'a str> {
    match element.get(attr) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::malformed(format!(
            "<{}> under {} is missing required attribute '{}'",
            element.tag(),
            at,
            attr
        ))),
    }
}

/// Boolean spellings accepted by the definition format.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
