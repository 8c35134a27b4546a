//! HZ-004: Multilingual translation table.
//!
//! Every translatable text is keyed by `(element path, field code)`. The table
//! persists as CSV: a header `valid,path,code,<lang>...` and one row per entry.
//! Loaded entries start invalid; resolving marks an entry valid, so rows whose
//! source element disappeared stay `false` and can be pruned at write time.
//!
//! Empty language slots are always written as empty cells and read back as
//! empty slots. Whether they appear in resolved objects is an [`EmptySlots`]
//! policy, default omit.

use super::config::EmptySlots;
use super::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::Path;

/// Leading header columns before the language columns.
pub const RESERVED_COLUMNS: [&str; 3] = ["valid", "path", "code"];

/// Texts for one `(path, code)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Touched during the current run
    pub valid: bool,
    pub path: String,
    pub code: String,
    /// Language code → text, in header column order
    texts: IndexMap<String, String>,
}

impl TranslationEntry {
    fn blank(path: &str, code: &str, languages: &[String]) -> Self {
        Self {
            valid: false,
            path: path.to_string(),
            code: code.to_string(),
            texts: languages
                .iter()
                .map(|l| (l.clone(), String::new()))
                .collect(),
        }
    }

    /// Text for a language, `None` when the slot is empty.
    pub fn text(&self, language: &str) -> Option<&str> {
        self.texts
            .get(language)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    /// All language slots in column order, including empty ones.
    pub fn texts(&self) -> &IndexMap<String, String> {
        &self.texts
    }

    fn render(&self, policy: EmptySlots) -> Value {
        let mut object = Map::new();
        for (language, text) in &self.texts {
            if text.is_empty() && policy == EmptySlots::Omit {
                continue;
            }
            object.insert(language.clone(), Value::String(text.clone()));
        }
        Value::Object(object)
    }
}

/// The run's translation table.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    languages: Vec<String>,
    entries: IndexMap<(String, String), TranslationEntry>,
    empty_slots: EmptySlots,
}

impl TranslationStore {
    /// An empty table with no language columns yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_empty_slots(mut self, policy: EmptySlots) -> Self {
        self.empty_slots = policy;
        self
    }

    /// Parse a persisted table. All loaded entries start invalid.
    pub fn parse(csv_text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_text.as_bytes());

        let mut store = Self::new();
        let mut header_len = None;

        for (index, record) in reader.records().enumerate() {
            let row = index + 1;
            let record = record
                .map_err(|e| Error::malformed(format!("translation table row {}: {}", row, e)))?;

            let Some(expected) = header_len else {
                store.read_header(&record)?;
                header_len = Some(record.len());
                continue;
            };

            if record.len() != expected {
                return Err(Error::malformed(format!(
                    "translation table row {} has {} cells, header has {}",
                    row,
                    record.len(),
                    expected
                )));
            }

            let path = &record[1];
            let code = &record[2];
            let mut entry = TranslationEntry::blank(path, code, &store.languages);
            for (language, cell) in store.languages.iter().zip(record.iter().skip(3)) {
                entry.texts.insert(language.clone(), cell.to_string());
            }
            let key = (path.to_string(), code.to_string());
            if store.entries.insert(key, entry).is_some() {
                tracing::warn!(row, path, code, "duplicate translation row, keeping the last");
            }
        }

        if header_len.is_none() {
            return Err(Error::malformed("translation table has no header row"));
        }
        Ok(store)
    }

    fn read_header(&mut self, record: &csv::StringRecord) -> Result<()> {
        let reserved: Vec<&str> = record.iter().take(RESERVED_COLUMNS.len()).collect();
        if reserved != RESERVED_COLUMNS {
            return Err(Error::malformed(format!(
                "translation table header must start with {}, got {}",
                RESERVED_COLUMNS.join(","),
                record.iter().collect::<Vec<_>>().join(",")
            )));
        }
        for language in record.iter().skip(RESERVED_COLUMNS.len()) {
            if language.is_empty() || self.languages.iter().any(|l| l == language) {
                return Err(Error::malformed(format!(
                    "translation table header has an empty or duplicate language column '{}'",
                    language
                )));
            }
            self.languages.push(language.to_string());
        }
        Ok(())
    }

    /// Load a persisted table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&content)
    }

    /// Load a table if the file exists, otherwise start empty.
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Language columns in header order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Full header row.
    pub fn header(&self) -> Vec<String> {
        RESERVED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.languages.iter().cloned())
            .collect()
    }

    /// Append a language column if missing. Returns true when one was added.
    pub fn ensure_language(&mut self, language: &str) -> bool {
        if self.languages.iter().any(|l| l == language) {
            return false;
        }
        if !self.languages.is_empty() {
            tracing::warn!(language, "translation table has no column for language, appending it");
        }
        self.languages.push(language.to_string());
        for entry in self.entries.values_mut() {
            entry.texts.insert(language.to_string(), String::new());
        }
        true
    }

    /// Register a translatable text and return its multilingual object.
    ///
    /// Creates the entry on first sight, marks it valid, and fills the
    /// default-language slot only while it is still empty, so an existing
    /// translation is never overwritten by the document text.
    pub fn resolve(&mut self, path: &str, code: &str, default_language: &str, text: &str) -> Value {
        self.ensure_language(default_language);
        let policy = self.empty_slots;
        let languages = &self.languages;
        let entry = self
            .entries
            .entry((path.to_string(), code.to_string()))
            .or_insert_with(|| TranslationEntry::blank(path, code, languages));

        entry.valid = true;
        let slot = entry.texts.entry(default_language.to_string()).or_default();
        if slot.is_empty() {
            *slot = text.to_string();
        }
        entry.render(policy)
    }

    pub fn get(&self, path: &str, code: &str) -> Option<&TranslationEntry> {
        self.entries.get(&(path.to_string(), code.to_string()))
    }

    /// Entries in persist order.
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries not touched during this run.
    pub fn stale_count(&self) -> usize {
        self.entries.values().filter(|e| !e.valid).count()
    }

    /// Render the table as CSV text.
    pub fn render(&self, prune_stale: bool) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let to_err = |e: csv::Error| Error::Serialization(format!("translation table: {}", e));

        writer.write_record(self.header()).map_err(to_err)?;
        for entry in self.entries.values() {
            if prune_stale && !entry.valid {
                continue;
            }
            let mut row = vec![
                entry.valid.to_string(),
                entry.path.clone(),
                entry.code.clone(),
            ];
            row.extend(
                self.languages
                    .iter()
                    .map(|l| entry.texts.get(l).cloned().unwrap_or_default()),
            );
            writer.write_record(&row).map_err(to_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Serialization(format!("translation table: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Write the table to disk atomically (temp file, then rename).
    pub fn persist(&self, path: &Path, prune_stale: bool) -> Result<()> {
        let content = self.render(prune_stale)?;
        super::job::write_atomic(path, &content)
    }
}
