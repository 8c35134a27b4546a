//! HZ-011: Datasets, either static option lists or query-backed sets.

use super::{required, Planned};
use crate::core::compiler::Compilation;
use crate::core::error::{Error, Result};
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::ElementKind;
use serde_json::{json, Map, Value};

/// `createDataset` → POST `{api}/datasets`.
pub fn build(c: &mut Compilation, element: &Node, parent: &ElementPath) -> Result<Planned> {
    let code = required(element, "code", parent)?;
    let dataset_type = required(element, "type", parent)?;
    let path = parent.keyed(ElementKind::Dataset.tag(), &[("code", code)]);

    let name = c.translate(&path, "name", element.attr("name", ""));
    let description = c.translate(&path, "description", element.attr("desc", ""));

    let definitions = match dataset_type {
        "static" => static_definitions(c, element, &path)?,
        "query" => query_definitions(element, &path)?,
        other => {
            return Err(Error::malformed(format!(
                "{}: unknown dataset type '{}' (expected static or query)",
                path, other
            )))
        }
    };

    let document = json!({
        "code": code,
        "name": name,
        "type": dataset_type,
        "description": description,
        "definitions": definitions,
    });
    Ok(Planned::post(path, c.endpoint("/datasets"), document))
}

fn static_definitions(c: &mut Compilation, element: &Node, path: &ElementPath) -> Result<Value> {
    let options_path = path.child("options");
    let mut order = Vec::new();
    let mut options = Map::new();

    let listed = element
        .child("options")
        .map(|o| o.children_named("option").collect::<Vec<_>>())
        .unwrap_or_default();

    for option in listed {
        let option_code = required(option, "code", &options_path)?;
        if options.contains_key(option_code) {
            return Err(Error::malformed(format!(
                "{}: duplicate option '{}'",
                path, option_code
            )));
        }
        let option_path = options_path.keyed("option", &[("code", option_code)]);
        let option_name = c.translate(&option_path, "name", option.attr("name", ""));

        order.push(option_code.to_string());
        options.insert(
            option_code.to_string(),
            json!({
                "code": option_code,
                "name": option_name,
                "active": true,
            }),
        );
    }

    Ok(json!({ "order": order, "options": options }))
}

fn query_definitions(element: &Node, path: &ElementPath) -> Result<Value> {
    let query = element
        .child("query")
        .ok_or_else(|| Error::malformed(format!("{}: query dataset needs a <query> child", path)))?;
    Ok(json!({ "query": query.text() }))
}
