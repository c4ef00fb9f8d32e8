//! Pipeline entry point: config → parse → extract → build → validate.
//!
//! Parse failures skip the file with a warning; every later failure aborts
//! the project wholesale. No partial IR is ever produced: the caller either
//! receives a fully-validated bundle or a typed error.

use crate::config::model::PipelineConfig;
use crate::core::diagnostics::Diagnostics;
use crate::core::traits::{AstProvider, SchemaValidator};
use crate::errors::Result;
use crate::extract::{self, FileExtraction};
use crate::ir::build::build_bundle;
use crate::ir::bundle::IrBundle;
use crate::validate::{validate_bundle, BundleValidator};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Run the full pipeline with the built-in validator, stamped with the
/// current time.
pub fn run_pipeline(config: &PipelineConfig, provider: &dyn AstProvider) -> Result<IrBundle> {
    run_pipeline_at(config, provider, &BundleValidator, Utc::now())
}

/// Run the full pipeline with an explicit validator and timestamp. Tests and
/// reproducible builds inject a fixed `created_on`.
pub fn run_pipeline_at(
    config: &PipelineConfig,
    provider: &dyn AstProvider,
    validator: &dyn SchemaValidator,
    created_on: DateTime<Utc>,
) -> Result<IrBundle> {
    info!("pipeline: start -> {}", config.project_name);

    // 1) Config
    config.validate()?;

    // 2) Parse & extract, per file in sorted order
    let mut files = config.source_files.clone();
    files.sort();
    let language = source_language(config);

    let mut diags = Diagnostics::new();
    let mut extractions: Vec<FileExtraction> = Vec::new();
    for path in &files {
        let tree = match provider.parse(path, &language) {
            Ok(tree) => tree,
            Err(err) => {
                warn!("parse: failed for {} -> {err:#}", path.display());
                continue;
            }
        };
        extractions.push(extract::extract_file(&tree, &mut diags)?);
    }
    info!("extract: {} files processed", extractions.len());

    // 3) Build & link
    let bundle = build_bundle(config, &extractions, diags, created_on)?;

    // 4) Validate
    validate_bundle(&bundle, validator)?;

    info!("pipeline: done -> {}", config.project_name);
    Ok(bundle)
}

/// Language hint passed to the provider, derived from the source framework
/// (`selenium-java` → `java`).
fn source_language(config: &PipelineConfig) -> String {
    config
        .source_framework
        .rsplit('-')
        .next()
        .unwrap_or("java")
        .to_string()
}
