//! HZ-001: Job document types.
//!
//! Defines the output job, its tasks, execution actions and payloads, and the
//! closed set of element kinds the compiler recognises. All output types derive
//! Serialize/Deserialize so a written job can be read back for inspection.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Job
// ============================================================================

/// The compiled output: run metadata plus the ordered task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Definition schema version
    pub version: String,

    /// Default language of the human-readable texts in the definition
    pub language_code: String,

    /// Content package the provisioned objects belong to
    pub content_code: String,

    /// Free-form runner parameters
    #[serde(default)]
    pub params: IndexMap<String, serde_json::Value>,

    /// Tasks in traversal order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Job {
    pub fn new(version: &str, language_code: &str, content_code: &str) -> Self {
        Self {
            version: version.to_string(),
            language_code: language_code.to_string(),
            content_code: content_code.to_string(),
            params: IndexMap::new(),
            tasks: Vec::new(),
        }
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// One planned provisioning operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Nesting-level sequence shared by a sibling batch
    pub sequence: u32,

    /// Which backend executes the task
    pub exec_action: ExecAction,

    /// Endpoint URL (may hold runner placeholders) or `"local"`
    pub exec_address: String,

    /// SQL text or JSON document
    pub exec_payload: Payload,
}

/// Execution backend for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecAction {
    #[serde(rename = "exec_query")]
    ExecQuery,
    #[serde(rename = "api_get")]
    ApiGet,
    #[serde(rename = "api_post")]
    ApiPost,
    #[serde(rename = "api_patch")]
    ApiPatch,
    #[serde(rename = "api_delete")]
    ApiDelete,
}

impl ExecAction {
    /// True for the HTTP actions, whose payload is a JSON document.
    pub fn is_api(self) -> bool {
        !matches!(self, Self::ExecQuery)
    }
}

impl fmt::Display for ExecAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecQuery => write!(f, "exec_query"),
            Self::ApiGet => write!(f, "api_get"),
            Self::ApiPost => write!(f, "api_post"),
            Self::ApiPatch => write!(f, "api_patch"),
            Self::ApiDelete => write!(f, "api_delete"),
        }
    }
}

/// Task payload. A raw statement for queries, a structured document for API calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Query(String),
    Document(serde_json::Value),
}

impl Payload {
    pub fn as_document(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Document(v) => Some(v),
            Self::Query(_) => None,
        }
    }

    pub fn as_query(&self) -> Option<&str> {
        match self {
            Self::Query(q) => Some(q),
            Self::Document(_) => None,
        }
    }
}

/// Address used by tasks that run directly against the local database.
pub const LOCAL_ADDRESS: &str = "local";

// ============================================================================
// Element kinds
// ============================================================================

/// Element kinds that produce a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Content,
    Schema,
    Field,
    Column,
    Feature,
    Dataset,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        Self::Content,
        Self::Schema,
        Self::Field,
        Self::Column,
        Self::Feature,
        Self::Dataset,
    ];

    /// Map a definition tag to its kind. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// The definition tag for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Content => "createContent",
            Self::Schema => "createSchema",
            Self::Field => "createField",
            Self::Column => "createColumn",
            Self::Feature => "createFeature",
            Self::Dataset => "createDataset",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => write!(f, "content"),
            Self::Schema => write!(f, "schema"),
            Self::Field => write!(f, "field"),
            Self::Column => write!(f, "column"),
            Self::Feature => write!(f, "feature"),
            Self::Dataset => write!(f, "dataset"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
