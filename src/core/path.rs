//! HZ-003: Element path identities.
//!
//! A path is built as traversal descends: `parent/tag[@attr='value']...`.
//! Only the discriminating attributes of an element kind take part, in a fixed
//! order, so the path does not depend on how the source orders its attributes.
//! Single quotes inside values are doubled, so distinct values never collide.

use std::fmt;

/// Stable structural identity of an element occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementPath(String);

impl ElementPath {
    /// Start a path at an absolute location such as `/job/tasks`.
    pub fn root(path: &str) -> Self {
        Self(path.to_string())
    }

    /// Descend into an unkeyed child (e.g. `options`).
    pub fn child(&self, tag: &str) -> Self {
        Self(format!("{}/{}", self.0, tag))
    }

    /// Descend into a child identified by its discriminating attributes.
    pub fn keyed(&self, tag: &str, keys: &[(&str, &str)]) -> Self {
        let mut path = format!("{}/{}", self.0, tag);
        for (attr, value) in keys {
            path.push_str("[@");
            path.push_str(attr);
            path.push_str("='");
            path.push_str(&escape_value(value));
            path.push_str("']");
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Neutralize quotes inside a predicate value (XPath 2.0 doubling).
fn escape_value(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hz003_keyed_single() {
        let p = ElementPath::root("/job/tasks").keyed("createSchema", &[("code", "orders")]);
        assert_eq!(p.as_str(), "/job/tasks/createSchema[@code='orders']");
    }

    #[test]
    fn test_hz003_keyed_nested() {
        let schema = ElementPath::root("/job/tasks").keyed("createSchema", &[("code", "orders")]);
        let field = schema.keyed("createField", &[("schemaCode", "orders"), ("code", "status")]);
        assert_eq!(
            field.to_string(),
            "/job/tasks/createSchema[@code='orders']/createField[@schemaCode='orders'][@code='status']"
        );
    }

    #[test]
    fn test_hz003_child_then_keyed() {
        let ds = ElementPath::root("/job/tasks").keyed("createDataset", &[("code", "colors")]);
        let opt = ds.child("options").keyed("option", &[("code", "red")]);
        assert_eq!(
            opt.as_str(),
            "/job/tasks/createDataset[@code='colors']/options/option[@code='red']"
        );
    }

    #[test]
    fn test_hz003_quotes_escaped() {
        let p = ElementPath::root("").keyed("createSchema", &[("code", "o'brien")]);
        assert_eq!(p.as_str(), "/createSchema[@code='o''brien']");
        // "a'][@code='b" must not forge a second predicate
        let forged = ElementPath::root("").keyed("x", &[("code", "a'][@code='b")]);
        let honest = ElementPath::root("").keyed("x", &[("code", "a"), ("code", "b")]);
        assert_ne!(forged, honest);
    }

    proptest! {
        #[test]
        fn test_hz003_deterministic(parent in ".{0,20}", tag in "[a-zA-Z]{1,12}", a in ".{0,16}", b in ".{0,16}") {
            let p = ElementPath::root(&parent);
            let one = p.keyed(&tag, &[("schemaCode", &a), ("code", &b)]);
            let two = p.keyed(&tag, &[("schemaCode", &a), ("code", &b)]);
            prop_assert_eq!(one, two);
        }

        #[test]
        fn test_hz003_distinct_values_distinct_paths(a in ".{0,16}", b in ".{0,16}") {
            prop_assume!(a != b);
            let p = ElementPath::root("/r");
            prop_assert_ne!(p.keyed("t", &[("code", &a)]), p.keyed("t", &[("code", &b)]));
        }
    }
}
