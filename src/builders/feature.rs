//! HZ-010: Module features and their permissions.

use super::{required, Planned};
use crate::core::compiler::Compilation;
use crate::core::error::{Error, Result};
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::ElementKind;
use serde_json::{json, Map};

/// `createFeature` → POST `{api}/modules/{moduleCode}/features`.
///
/// The document is keyed by the feature code; every `<permission>` child
/// contributes `code → translated name`.
pub fn build(c: &mut Compilation, element: &Node, parent: &ElementPath) -> Result<Planned> {
    let module_code = required(element, "moduleCode", parent)?;
    let code = required(element, "code", parent)?;
    let path = parent.keyed(
        ElementKind::Feature.tag(),
        &[("moduleCode", module_code), ("code", code)],
    );

    let name = c.translate(&path, "name", element.attr("name", ""));
    let description = c.translate(&path, "description", element.attr("desc", ""));

    let mut permissions = Map::new();
    for permission in element.children_named("permission") {
        let perm_code = required(permission, "code", &path)?;
        if permissions.contains_key(perm_code) {
            return Err(Error::malformed(format!(
                "{}: duplicate permission '{}'",
                path, perm_code
            )));
        }
        let perm_path = path.keyed("permission", &[("code", perm_code)]);
        let perm_name = c.translate(&perm_path, "name", permission.attr("name", ""));
        permissions.insert(perm_code.to_string(), perm_name);
    }

    let mut document = Map::new();
    document.insert(
        code.to_string(),
        json!({
            "name": name,
            "description": description,
            "permissions": permissions,
        }),
    );

    let address = c.endpoint(&format!("/modules/{}/features", module_code));
    Ok(Planned::post(path, address, document.into()))
}
