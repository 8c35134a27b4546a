//! HZ-007: Schema definitions.

use super::{required, Planned};
use crate::core::compiler::Compilation;
use crate::core::error::Result;
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::ElementKind;
use serde_json::json;

/// `createSchema` → POST `{api}/schemas`.
pub fn build(c: &mut Compilation, element: &Node, parent: &ElementPath) -> Result<Planned> {
    let code = required(element, "code", parent)?;
    let path = parent.keyed(ElementKind::Schema.tag(), &[("code", code)]);

    let name = c.translate(&path, "name", element.attr("name", ""));
    let description = c.translate(&path, "description", element.attr("desc", ""));

    let document = json!({
        "code": code,
        "content_code": c.job.content_code,
        "name": name,
        "description": description,
    });
    Ok(Planned::post(path, c.endpoint("/schemas"), document))
}
