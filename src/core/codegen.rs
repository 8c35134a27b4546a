//! HZ-005: Payload generation by dispatch to element builders.
//!
//! Each element kind produces one planned task:
//! - content, schema, field, feature, dataset: API POST of a JSON document
//! - column: a raw statement run locally

use super::compiler::Compilation;
use super::error::Result;
use super::parser::Node;
use super::path::ElementPath;
use super::types::ElementKind;
use crate::builders::{self, Planned};

/// Build the task body for an element of a known kind.
pub fn plan_element(
    c: &mut Compilation,
    kind: ElementKind,
    element: &Node,
    parent: &ElementPath,
) -> Result<Planned> {
    match kind {
        ElementKind::Content => builders::content::build(c, element, parent),
        ElementKind::Schema => builders::schema::build(c, element, parent),
        ElementKind::Field => builders::field::build(c, element, parent),
        ElementKind::Column => builders::column::build(element, parent),
        ElementKind::Feature => builders::feature::build(c, element, parent),
        ElementKind::Dataset => builders::dataset::build(c, element, parent),
    }
}
