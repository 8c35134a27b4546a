//! HZ-008: Schema fields (text, number, date and lookup definitions).
//!
//! The common document is the same for every field type; `definitions`
//! is built per type:
//! - text: `display`
//! - number: `display`, `decimals`, optional `scale` (dataset and rate table)
//! - date: `display`, `format`
//! - lookup: static or dynamic dataset binding

use super::{parse_bool, required, Planned};
use crate::core::compiler::Compilation;
use crate::core::error::{Error, Result};
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::ElementKind;
use serde_json::{json, Map, Number, Value};

/// `createField` → POST `{api}/schemas/{schemaCode}/fields`.
pub fn build(c: &mut Compilation, element: &Node, parent: &ElementPath) -> Result<Planned> {
    let schema_code = required(element, "schemaCode", parent)?;
    let code = required(element, "code", parent)?;
    let field_type = required(element, "type", parent)?;
    let path = parent.keyed(
        ElementKind::Field.tag(),
        &[("schemaCode", schema_code), ("code", code)],
    );

    let name = c.translate(&path, "name", element.attr("name", ""));
    let description = c.translate(&path, "description", element.attr("desc", ""));

    let definitions = match field_type {
        "text" => json!({ "display": element.attr("display", "single_line") }),
        "number" => number_definitions(element, &path)?,
        "date" => json!({
            "display": element.attr("display", "date_time"),
            "format": element.attr("format", "DD/MM/YYYY HH:MM"),
        }),
        "lookup" => lookup_definitions(c, element, &path)?,
        other => {
            return Err(Error::malformed(format!(
                "{}: unknown field type '{}' (expected text, number, date or lookup)",
                path, other
            )))
        }
    };

    let document = json!({
        "code": code,
        "content_code": c.job.content_code,
        "schema_code": schema_code,
        "field_type": field_type,
        "name": name,
        "description": description,
        "active": true,
        "definitions": definitions,
    });
    let address = c.endpoint(&format!("/schemas/{}/fields", schema_code));
    Ok(Planned::post(path, address, document))
}

fn number_definitions(element: &Node, path: &ElementPath) -> Result<Value> {
    let raw_decimals = element.attr("decimals", "0");
    let decimals: i64 = raw_decimals.parse().map_err(|_| {
        Error::malformed(format!(
            "{}: decimals must be an integer, got '{}'",
            path, raw_decimals
        ))
    })?;

    let mut definitions = Map::new();
    definitions.insert("display".into(), element.attr("display", "number").into());
    definitions.insert("decimals".into(), decimals.into());

    let mut scale = Map::new();
    if let Some(dataset) = element.get("scale").filter(|s| !s.is_empty()) {
        scale.insert("dataset_code".into(), dataset.into());
    }
    let rates = rate_table(element, path)?;
    if !rates.is_empty() {
        scale.insert("aggr_rates".into(), rates.into());
    }
    if !scale.is_empty() {
        definitions.insert("scale".into(), scale.into());
    }
    Ok(definitions.into())
}

/// Two-level rate table from the field's non-task children:
/// outer tag → inner tag → numeric `value` (default 0).
fn rate_table(element: &Node, path: &ElementPath) -> Result<Map<String, Value>> {
    let mut rates = Map::new();
    for outer in element.elements() {
        if ElementKind::from_tag(outer.tag()).is_some() {
            continue;
        }
        let mut row = Map::new();
        for inner in outer.elements() {
            let raw = inner.attr("value", "0");
            let value = parse_rate(raw).ok_or_else(|| {
                Error::malformed(format!(
                    "{}: rate {}/{} must be numeric, got '{}'",
                    path,
                    outer.tag(),
                    inner.tag(),
                    raw
                ))
            })?;
            row.insert(inner.tag().to_string(), value);
        }
        rates.insert(outer.tag().to_string(), row.into());
    }
    Ok(rates)
}

fn parse_rate(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if let Ok(i) = raw.parse::<i64>() {
        return Some(i.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn lookup_definitions(c: &mut Compilation, element: &Node, path: &ElementPath) -> Result<Value> {
    let display = element.attr("display", "select_single");
    let dataset = element
        .child("dataset")
        .ok_or_else(|| Error::malformed(format!("{}: lookup field needs a <dataset> child", path)))?;
    let dataset_code = dataset.attr("code", "");
    let lookup_type = dataset.attr("type", "");

    let mut definitions = Map::new();
    definitions.insert("display".into(), display.into());
    definitions.insert("dataset_code".into(), dataset_code.into());
    definitions.insert("lookup_type".into(), lookup_type.into());
    if lookup_type == "static" {
        return Ok(definitions.into());
    }

    definitions.insert(
        "lookup_label".into(),
        dataset.attr("lookup_label", "name").into(),
    );
    definitions.insert(
        "lookup_value".into(),
        dataset.attr("lookup_value", "code").into(),
    );

    let fields_path = path.child("fields");
    let mut fields = Vec::new();
    if let Some(block) = dataset.child("fields") {
        for field in block.children_named("field") {
            let field_code = required(field, "code", &fields_path)?;
            let field_path = fields_path.keyed("field", &[("code", field_code)]);
            let label = c.translate(&field_path, "name", field.attr("name", ""));

            let mut entry = Map::new();
            entry.insert("code".into(), field_code.into());
            entry.insert("label".into(), label);
            if let Some(filter) = field.child("filter") {
                entry.insert(
                    "filter".into(),
                    json!({
                        "value_type": filter.attr("type", ""),
                        "value": typed_value(filter),
                        "operator": filter.attr("operator", ""),
                        "readonly": parse_bool(filter.attr("readonly", "false")).unwrap_or(false),
                    }),
                );
            }
            fields.push(Value::Object(entry));
        }
    }
    definitions.insert("lookup_fields".into(), fields.into());

    if let Some(block) = dataset.child("params") {
        let params: Vec<Value> = block
            .children_named("param")
            .map(|param| {
                json!({
                    "code": param.attr("code", ""),
                    "value_type": param.attr("type", ""),
                    "value": typed_value(param),
                })
            })
            .collect();
        definitions.insert("lookup_params".into(), params.into());
    }

    if let Some(groups) = dataset.child("groups") {
        let groups: Vec<&str> = groups
            .text()
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect();
        definitions.insert("security_groups".into(), groups.into());
    }

    Ok(definitions.into())
}

fn typed_value(element: &Node) -> Value {
    cast_to_value_type(element.attr("value", ""), element.attr("valueType", "string"))
}

/// Cast a filter or parameter value to its declared type.
///
/// `number` and `boolean` are best-effort (0 and false on failure); an
/// unrecognized type yields `null`.
pub fn cast_to_value_type(value: &str, value_type: &str) -> Value {
    match value_type {
        "string" => Value::String(value.to_string()),
        "number" => parse_integer(value).unwrap_or(0).into(),
        "boolean" => parse_bool(value).unwrap_or(false).into(),
        _ => Value::Null,
    }
}

/// Integer literal with an optional sign and base prefix (`0x`, `0o`, `0b`,
/// or a leading `0` for octal).
fn parse_integer(value: &str) -> Option<i64> {
    let (negative, body) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = lower.strip_prefix("0o") {
        (8, d)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits.to_string()
    };
    i64::from_str_radix(&signed, radix).ok()
}
