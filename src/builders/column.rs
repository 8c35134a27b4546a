//! HZ-009: Table columns, emitted as raw DDL for the local database.

use super::{required, Planned};
use crate::core::error::{Error, Result};
use crate::core::parser::Node;
use crate::core::path::ElementPath;
use crate::core::types::ElementKind;
use regex::Regex;
use std::sync::LazyLock;

/// Plain or dot-qualified SQL identifier.
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("identifier pattern compiles")
});

/// `createColumn` → `ALTER TABLE {table} ADD COLUMN {code} {type}` on `local`.
pub fn build(element: &Node, parent: &ElementPath) -> Result<Planned> {
    let table = required(element, "table", parent)?;
    let code = required(element, "code", parent)?;
    let column_type = required(element, "type", parent)?;
    let path = parent.keyed(
        ElementKind::Column.tag(),
        &[("table", table), ("code", code)],
    );

    for (attr, value) in [("table", table), ("code", code)] {
        if !IDENTIFIER.is_match(value) {
            return Err(Error::malformed(format!(
                "{}: '{}' is not a valid SQL identifier for '{}'",
                path, value, attr
            )));
        }
    }

    let statement = format!("ALTER TABLE {} ADD COLUMN {} {}", table, code, column_type);
    Ok(Planned::query(path, statement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExecAction;

    fn column(table: &str, code: &str, ty: &str) -> Node {
        Node::new("createColumn")
            .with_attr("table", table)
            .with_attr("code", code)
            .with_attr("type", ty)
    }

    #[test]
    fn test_hz009_statement() {
        let p = build(&column("orders", "status", "varchar(20) NOT NULL"), &ElementPath::root("/t")).unwrap();
        assert_eq!(p.action, ExecAction::ExecQuery);
        assert_eq!(p.address, "local");
        assert_eq!(
            p.payload.as_query(),
            Some("ALTER TABLE orders ADD COLUMN status varchar(20) NOT NULL")
        );
        assert_eq!(p.path.as_str(), "/t/createColumn[@table='orders'][@code='status']");
    }

    #[test]
    fn test_hz009_qualified_table() {
        let p = build(&column("crm.orders", "total", "numeric"), &ElementPath::root("/t")).unwrap();
        assert_eq!(
            p.payload.as_query(),
            Some("ALTER TABLE crm.orders ADD COLUMN total numeric")
        );
    }

    #[test]
    fn test_hz009_rejects_injection() {
        let err = build(
            &column("orders; DROP TABLE users", "x", "int"),
            &ElementPath::root("/t"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(build(&column("orders", "1st", "int"), &ElementPath::root("/t")).is_err());
    }

    #[test]
    fn test_hz009_type_required() {
        let el = Node::new("createColumn")
            .with_attr("table", "orders")
            .with_attr("code", "x");
        let err = build(&el, &ElementPath::root("/t")).unwrap_err();
        assert!(err.to_string().contains("'type'"));
    }
}
