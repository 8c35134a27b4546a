//! HZ-006: Content package definitions.

use super::{parse_bool, required, Planned};
use crate::core::compiler::Compilation;
use crate::core::error::{Error, Result};
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::ElementKind;
use serde_json::json;

/// `createContent` → POST `{api}/contents`.
pub fn build(c: &mut Compilation, element: &Node, parent: &ElementPath) -> Result<Planned> {
    let code = required(element, "code", parent)?;
    let path = parent.keyed(ElementKind::Content.tag(), &[("code", code)]);

    let name = c.translate(&path, "name", element.attr("name", ""));
    let description = c.translate(&path, "description", element.attr("desc", ""));
    let is_module = flag(element, "module", &path)?;
    let is_system = flag(element, "system", &path)?;

    let document = json!({
        "code": code,
        "name": name,
        "description": description,
        "prefix": element.attr("prefix", ""),
        "is_module": is_module,
        "is_system": is_system,
    });
    Ok(Planned::post(path, c.endpoint("/contents"), document))
}

fn flag(element: &Node, attr: &str, path: &ElementPath) -> Result<bool> {
    let raw = element.attr(attr, "false");
    parse_bool(raw).ok_or_else(|| {
        Error::malformed(format!(
            "{}: attribute '{}' must be a boolean, got '{}'",
            path, attr, raw
        ))
    })
}
