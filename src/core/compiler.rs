//! HZ-012: Tree compiler. Walks the element tree and accumulates tasks.
//!
//! Sequencing: every element of one sibling batch shares a sequence number,
//! and a nested batch gets its parent's number plus one. The top-level batch
//! is 0. Elements whose tag is not a known kind are skipped with their whole
//! subtree. The first builder error aborts the walk.

use super::codegen;
use super::config::Settings;
use super::error::Result;
use super::parser::Node;
use super::path::ElementPath;
use super::translation::TranslationStore;
use super::types::{ElementKind, Job, Task};

/// Mutable state of one compilation pass, owned by the driver.
#[derive(Debug)]
pub struct Compilation {
    pub job: Job,
    pub translations: TranslationStore,
    pub settings: Settings,
}

impl Compilation {
    pub fn new(job: Job, translations: TranslationStore, settings: Settings) -> Self {
        let mut translations = translations.with_empty_slots(settings.translation.empty_slots);
        translations.ensure_language(&job.language_code);
        Self {
            job,
            translations,
            settings,
        }
    }

    /// Resolve a translatable text in the job's default language.
    pub fn translate(&mut self, path: &ElementPath, code: &str, text: &str) -> serde_json::Value {
        self.translations
            .resolve(path.as_str(), code, &self.job.language_code, text)
    }

    /// Full address for an API endpoint suffix.
    pub fn endpoint(&self, suffix: &str) -> String {
        self.settings.endpoint(suffix)
    }
}

/// Compile a sibling batch. `parent_sequence` is `None` for the top level.
pub fn compile(
    c: &mut Compilation,
    elements: &[Node],
    parent_sequence: Option<u32>,
    path: &ElementPath,
) -> Result<()> {
    let sequence = parent_sequence.map_or(0, |s| s + 1);

    for element in elements {
        let Some(kind) = ElementKind::from_tag(element.tag()) else {
            tracing::debug!(tag = element.tag(), parent = %path, "skipping unrecognized element");
            continue;
        };

        let planned = codegen::plan_element(c, kind, element, path)?;
        tracing::debug!(
            sequence,
            %kind,
            action = %planned.action,
            path = %planned.path,
            "planned task"
        );
        c.job.tasks.push(Task {
            sequence,
            exec_action: planned.action,
            exec_address: planned.address,
            exec_payload: planned.payload,
        });

        compile(c, element.elements(), Some(sequence), &planned.path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::types::ExecAction;

    fn compilation() -> Compilation {
        Compilation::new(
            Job::new("1.0", "en-us", "crm"),
            TranslationStore::new(),
            Settings::default(),
        )
    }

    fn root() -> ElementPath {
        ElementPath::root("/job/tasks")
    }

    fn schema(code: &str) -> Node {
        Node::new("createSchema").with_attr("code", code)
    }

    fn text_field(schema: &str, code: &str) -> Node {
        Node::new("createField")
            .with_attr("schemaCode", schema)
            .with_attr("code", code)
            .with_attr("type", "text")
    }

    #[test]
    fn test_hz012_schema_with_field() {
        let mut c = compilation();
        let tree = vec![schema("orders").with_child(text_field("orders", "status"))];
        compile(&mut c, &tree, None, &root()).unwrap();

        assert_eq!(c.job.tasks.len(), 2);
        let t0 = &c.job.tasks[0];
        assert_eq!(t0.sequence, 0);
        assert_eq!(t0.exec_action, ExecAction::ApiPost);
        assert!(t0.exec_address.ends_with("/schemas"));
        assert_eq!(t0.exec_payload.as_document().unwrap()["code"], "orders");

        let t1 = &c.job.tasks[1];
        assert_eq!(t1.sequence, 1);
        assert!(t1.exec_address.ends_with("/schemas/orders/fields"));
        let doc = t1.exec_payload.as_document().unwrap();
        assert_eq!(doc["field_type"], "text");
        assert_eq!(doc["definitions"], serde_json::json!({"display": "single_line"}));
    }

    #[test]
    fn test_hz012_siblings_share_sequence() {
        let mut c = compilation();
        let tree = vec![
            schema("a")
                .with_child(text_field("a", "x"))
                .with_child(text_field("a", "y"))
                .with_child(text_field("a", "z")),
            schema("b").with_child(text_field("b", "w")),
            schema("c"),
        ];
        compile(&mut c, &tree, None, &root()).unwrap();

        let seqs: Vec<(u32, String)> = c
            .job
            .tasks
            .iter()
            .map(|t| (t.sequence, t.exec_payload.as_document().unwrap()["code"].to_string()))
            .collect();
        assert_eq!(
            seqs,
            vec![
                (0, "\"a\"".to_string()),
                (1, "\"x\"".to_string()),
                (1, "\"y\"".to_string()),
                (1, "\"z\"".to_string()),
                (0, "\"b\"".to_string()),
                (1, "\"w\"".to_string()),
                (0, "\"c\"".to_string()),
            ]
        );
    }

    #[test]
    fn test_hz012_depth_increments_by_one() {
        let mut c = compilation();
        let tree = vec![Node::new("createContent")
            .with_attr("code", "crm")
            .with_child(schema("orders").with_child(text_field("orders", "status")))];
        compile(&mut c, &tree, None, &root()).unwrap();
        let seqs: Vec<u32> = c.job.tasks.iter().map(|t| t.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_hz012_unknown_tag_skipped() {
        let mut c = compilation();
        let tree = vec![
            Node::new("createSchemaa")
                .with_attr("code", "typo")
                .with_child(schema("hidden")),
            schema("orders"),
            Node::new("note").with_text("ignored"),
        ];
        compile(&mut c, &tree, None, &root()).unwrap();
        assert_eq!(c.job.tasks.len(), 1);
        assert_eq!(c.job.tasks[0].exec_payload.as_document().unwrap()["code"], "orders");
    }

    #[test]
    fn test_hz012_fail_fast() {
        let mut c = compilation();
        let tree = vec![
            schema("ok"),
            Node::new("createField").with_attr("code", "no_schema"),
            schema("never"),
        ];
        let err = compile(&mut c, &tree, None, &root()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert_eq!(c.job.tasks.len(), 1);
    }

    #[test]
    fn test_hz012_paths_feed_translations() {
        let mut c = compilation();
        let tree = vec![schema("orders")
            .with_attr("name", "Orders")
            .with_child(text_field("orders", "status").with_attr("name", "Status"))];
        compile(&mut c, &tree, None, &root()).unwrap();
        assert!(c
            .translations
            .get("/job/tasks/createSchema[@code='orders']", "name")
            .is_some());
        assert!(c
            .translations
            .get(
                "/job/tasks/createSchema[@code='orders']/createField[@schemaCode='orders'][@code='status']",
                "name"
            )
            .is_some());
    }

    #[test]
    fn test_hz012_deterministic() {
        let tree = vec![schema("orders")
            .with_attr("name", "Orders")
            .with_child(text_field("orders", "status"))];
        let mut a = compilation();
        let mut b = compilation();
        compile(&mut a, &tree, None, &root()).unwrap();
        compile(&mut b, &tree, None, &root()).unwrap();
        assert_eq!(a.job, b.job);
        assert_eq!(a.translations.render(false).unwrap(), b.translations.render(false).unwrap());
    }

    #[test]
    fn test_hz012_attribute_order_does_not_change_paths() {
        use crate::core::parser::parse_document;

        let compiled = |field: &str| {
            let xml = format!(r#"<createSchema code="orders" name="Orders">{}</createSchema>"#, field);
            let tree = vec![parse_document(&xml).unwrap()];
            let mut c = compilation();
            compile(&mut c, &tree, None, &root()).unwrap();
            c
        };
        let a = compiled(r#"<createField type="text" code="status" schemaCode="orders" name="S"/>"#);
        let b = compiled(r#"<createField schemaCode="orders" name="S" code="status" type="text"/>"#);

        assert_eq!(a.translations.render(false).unwrap(), b.translations.render(false).unwrap());
        assert_eq!(a.job, b.job);
        assert!(a
            .translations
            .get(
                "/job/tasks/createSchema[@code='orders']/createField[@schemaCode='orders'][@code='status']",
                "name"
            )
            .is_some());
    }

    #[test]
    fn test_hz012_api_payloads_are_valid_json() {
        let mut c = compilation();
        let tree = vec![schema("quo\"tes").with_attr("name", "Say \"hi\"\n\\ there")];
        compile(&mut c, &tree, None, &root()).unwrap();
        for task in &c.job.tasks {
            if task.exec_action.is_api() {
                let text = serde_json::to_string(&task.exec_payload).unwrap();
                let back: serde_json::Value = serde_json::from_str(&text).unwrap();
                assert_eq!(&back, task.exec_payload.as_document().unwrap());
            }
        }
        let doc = c.job.tasks[0].exec_payload.as_document().unwrap();
        assert_eq!(doc["name"]["en-us"], "Say \"hi\"\n\\ there");
    }
}
