//! HZ-016: CLI subcommands: job, translate, validate, init.

use crate::core::compiler::Compilation;
use crate::core::config::{self, Settings};
use crate::core::error::{Error, Result};
use crate::core::translation::TranslationStore;
use crate::core::{job, parser};
use clap::Subcommand;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a definition into a JSON job document
    Job {
        /// Definition XML file
        #[arg(short, long)]
        source: PathBuf,

        /// Job output (default: source with .json extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Translation table used to resolve texts (read if it exists)
        #[arg(short, long)]
        translations: Option<PathBuf>,

        /// Settings file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Create or extend the translation table of a definition
    Translate {
        /// Definition XML file
        #[arg(short, long)]
        source: PathBuf,

        /// Table output (default: source with .csv extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Existing table to extend (default: the output path)
        #[arg(short, long)]
        translations: Option<PathBuf>,

        /// Settings file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compile a definition without writing anything
    Validate {
        /// Definition XML file
        #[arg(short, long)]
        source: PathBuf,

        /// Settings file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a starter definition
    Init {
        /// Directory to initialize (default: current)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Job {
            source,
            output,
            translations,
            config,
        } => cmd_job(
            &source,
            output.as_deref(),
            translations.as_deref(),
            config.as_deref(),
        ),
        Commands::Translate {
            source,
            output,
            translations,
            config,
        } => cmd_translate(
            &source,
            output.as_deref(),
            translations.as_deref(),
            config.as_deref(),
        ),
        Commands::Validate { source, config } => cmd_validate(&source, config.as_deref()),
        Commands::Init { path } => cmd_init(&path),
    }
}

fn cmd_job(
    source: &Path,
    output: Option<&Path>,
    table: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let translations = match table {
        Some(t) => TranslationStore::load_if_exists(t)?,
        None => TranslationStore::new(),
    };
    let c = compile_source(source, translations, config)?;

    let output = output_path(source, output, "json")?;
    job::write_job(&c.job, &output)?;

    println!("Wrote {} tasks to {}", c.job.tasks.len(), output.display());
    Ok(())
}

fn cmd_translate(
    source: &Path,
    output: Option<&Path>,
    table: Option<&Path>,
    config: Option<&Path>,
) -> Result<()> {
    let output = output_path(source, output, "csv")?;
    let input = table.unwrap_or(output.as_path());
    let translations = TranslationStore::load_if_exists(input)?;

    let c = compile_source(source, translations, config)?;
    let prune = c.settings.translation.prune_stale;
    c.translations.persist(&output, prune)?;

    let stale = c.translations.stale_count();
    println!(
        "Wrote {} translation entries to {}",
        if prune {
            c.translations.len() - stale
        } else {
            c.translations.len()
        },
        output.display()
    );
    if stale > 0 {
        let verb = if prune { "pruned" } else { "kept" };
        println!("  {} stale entries {}", stale, verb);
    }
    Ok(())
}

fn cmd_validate(source: &Path, config: Option<&Path>) -> Result<()> {
    let c = compile_source(source, TranslationStore::new(), config)?;

    println!(
        "OK: {} ({} tasks, {} translation entries)",
        source.display(),
        c.job.tasks.len(),
        c.translations.len()
    );
    let (api_calls, queries) = task_split(&c);
    println!("  api calls: {}, local queries: {}", api_calls, queries);
    for (action, count) in action_counts(&c) {
        println!("  {}: {}", action, count);
    }
    Ok(())
}

/// Output path for an artifact: the given one, or the source with `extension`.
/// Never the source itself.
fn output_path(source: &Path, output: Option<&Path>, extension: &str) -> Result<PathBuf> {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source.with_extension(extension));
    if output.as_path() == source {
        return Err(Error::malformed(format!(
            "output {} would overwrite the definition; pass --output",
            output.display()
        )));
    }
    Ok(output)
}

fn cmd_init(path: &Path) -> Result<()> {
    let definition_path = path.join("definition.xml");
    if definition_path.exists() {
        return Err(Error::malformed(format!(
            "{} already exists",
            definition_path.display()
        )));
    }
    std::fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;

    let template = r#"<?xml version="1.0" encoding="UTF-8"?>
<job version="1.0">
  <definition languageCode="en-us" contentPackage="my_content"/>
  <tasks>
    <createContent code="my_content" name="My content" prefix="my_"/>
    <createSchema code="my_schema" name="My schema" desc="Describe the schema">
      <createField schemaCode="my_schema" code="title" type="text" name="Title"/>
    </createSchema>
  </tasks>
</job>
"#;
    std::fs::write(&definition_path, template).map_err(|e| Error::io(&definition_path, e))?;

    println!("Initialized horizon definition at {}", path.display());
    println!("  Created: {}", definition_path.display());
    Ok(())
}

fn compile_source(
    source: &Path,
    translations: TranslationStore,
    config: Option<&Path>,
) -> Result<Compilation> {
    let settings = load_config(config)?;
    let root = parser::parse_document_file(source)?;
    job::compile_definition(&root, translations, settings)
}

fn load_config(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => config::load_settings(path),
        None => Ok(Settings::default()),
    }
}

/// API calls and local queries among the compiled tasks.
fn task_split(c: &Compilation) -> (usize, usize) {
    let tasks = &c.job.tasks;
    let api_calls = tasks.iter().filter(|t| t.exec_action.is_api()).count();
    let queries = tasks
        .iter()
        .filter_map(|t| t.exec_payload.as_query())
        .count();
    (api_calls, queries)
}

fn action_counts(c: &Compilation) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for task in &c.job.tasks {
        *counts.entry(task.exec_action.to_string()).or_insert(0) += 1;
    }
    counts
}
