//! HZ-002: Definition document parsing.
//!
//! Parses definition XML into an owned element tree and extracts the run
//! metadata:
//! - root `version` attribute (default "1.0")
//! - `definition` child with `languageCode` (default "en-us") and
//!   `contentPackage` (default "")
//! - `tasks` child whose element children are the top-level batch

use super::error::{Error, Result};
use super::path::ElementPath;
use indexmap::IndexMap;
use std::path::Path;

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_LANGUAGE: &str = "en-us";

/// One element of a parsed definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
    text: String,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value, or `default` when the attribute is absent.
    pub fn attr<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in document order.
    pub fn elements(&self) -> &[Node] {
        &self.children
    }

    /// First child element with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All child elements with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    fn from_xml(node: roxmltree::Node<'_, '_>) -> Self {
        let mut out = Node::new(node.tag_name().name());
        for attr in node.attributes() {
            out.attributes
                .insert(attr.name().to_string(), attr.value().to_string());
        }
        for child in node.children() {
            if child.is_element() {
                out.children.push(Node::from_xml(child));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    out.text.push_str(t);
                }
            }
        }
        out
    }
}

/// Parse definition XML text into its root element.
pub fn parse_document(xml: &str) -> Result<Node> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| Error::malformed(format!("XML parse error: {}", e)))?;
    Ok(Node::from_xml(doc.root_element()))
}

/// Parse a definition file from disk.
pub fn parse_document_file(path: &Path) -> Result<Node> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingInput(
            "the definition file path is required".to_string(),
        ));
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_document(&content)
}

/// Run metadata and the top-level task batch of a definition.
#[derive(Debug, Clone)]
pub struct Definition<'a> {
    pub version: String,
    pub language_code: String,
    pub content_code: String,
    /// Path of the `tasks` element, the root of every element path
    pub tasks_path: ElementPath,
    pub tasks: &'a [Node],
}

/// Extract run metadata and the task batch from a parsed root.
pub fn read_definition(root: &Node) -> Result<Definition<'_>> {
    let definition = root.child("definition").ok_or_else(|| {
        Error::malformed(format!("<{}> has no <definition> element", root.tag()))
    })?;
    let tasks = root
        .child("tasks")
        .ok_or_else(|| Error::malformed(format!("<{}> has no <tasks> element", root.tag())))?;

    Ok(Definition {
        version: root.attr("version", DEFAULT_VERSION).to_string(),
        language_code: definition
            .attr("languageCode", DEFAULT_LANGUAGE)
            .to_string(),
        content_code: definition.attr("contentPackage", "").to_string(),
        tasks_path: ElementPath::root(&format!("/{}/{}", root.tag(), tasks.tag())),
        tasks: tasks.elements(),
    })
}
