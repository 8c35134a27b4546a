//! HZ-013: Job assembly. Compiles a definition and writes the artifacts.

use super::compiler::{self, Compilation};
use super::config::Settings;
use super::error::{Error, Result};
use super::parser::{read_definition, Node};
use super::translation::TranslationStore;
use super::types::Job;
use std::path::{Path, PathBuf};

/// Compile a parsed definition into a job, resolving texts through `translations`.
///
/// Nothing is written here; on error the caller gets the first failure and
/// no partial job.
pub fn compile_definition(
    root: &Node,
    translations: TranslationStore,
    settings: Settings,
) -> Result<Compilation> {
    let definition = read_definition(root)?;
    tracing::info!(
        version = %definition.version,
        language = %definition.language_code,
        content = %definition.content_code,
        "compiling definition"
    );

    let job = Job::new(
        &definition.version,
        &definition.language_code,
        &definition.content_code,
    );
    let mut c = Compilation::new(job, translations, settings);
    compiler::compile(&mut c, definition.tasks, None, &definition.tasks_path)?;

    tracing::info!(
        tasks = c.job.tasks.len(),
        translations = c.translations.len(),
        stale = c.translations.stale_count(),
        "compiled definition"
    );
    Ok(c)
}

/// Render the job document as pretty-printed JSON.
pub fn render_job(job: &Job) -> Result<String> {
    let mut text = serde_json::to_string_pretty(job)?;
    text.push('\n');
    Ok(text)
}

/// Write the job document atomically.
pub fn write_job(job: &Job, path: &Path) -> Result<()> {
    write_atomic(path, &render_job(job)?)
}

/// Write `content` to `path` atomically (temp file, then rename).
/// The parent directory must exist.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = temp_path(path);
    std::fs::write(&tmp_path, content).map_err(|e| Error::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        Error::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
