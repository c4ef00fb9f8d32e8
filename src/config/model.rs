//! Configuration data structures for the extraction → IR pipeline.
//!
//! Groups:
//! - [`PipelineConfig`]: top-level container, passed explicitly (no globals)
//! - [`EnvironmentConfig`]: base URLs, browsers, timeouts, retry policy
//! - [`DataSetConfig`]: externally supplied data sets tests may bind to
//!
//! All structs are `serde`-friendly so they can be loaded from YAML/JSON by
//! whatever front end drives the pipeline.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration for one project run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Project name, used in `ProjectIR` and error context.
    pub project_name: String,
    /// Framework the sources are written against (e.g. `selenium-java`).
    pub source_framework: String,
    /// Framework downstream generators will emit (e.g. `playwright`).
    pub target_framework: String,
    /// Source architecture (e.g. `page-object-model`).
    pub architecture_pattern: String,
    /// Whether emitted suites may run in parallel.
    pub supports_parallel: bool,
    /// Execution environment description.
    pub environments: EnvironmentConfig,
    /// Source files to process, resolved by the upstream AST provider.
    pub source_files: Vec<PathBuf>,
    /// Data sets tests may bind to via `dataBinding`.
    #[serde(default)]
    pub data_sets: Vec<DataSetConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            source_framework: "selenium-java".into(),
            target_framework: "playwright".into(),
            architecture_pattern: "page-object-model".into(),
            supports_parallel: false,
            environments: EnvironmentConfig::default(),
            source_files: Vec::new(),
            data_sets: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Validate config sanity before stage F runs.
    pub fn validate(&self) -> Result<()> {
        if self.project_name.is_empty() {
            return Err(Error::Config("`project_name` must not be empty".into()));
        }
        if self.source_framework.is_empty() {
            return Err(Error::Config("`source_framework` must not be empty".into()));
        }
        if self.target_framework.is_empty() {
            return Err(Error::Config("`target_framework` must not be empty".into()));
        }
        self.environments.validate()?;
        for ds in &self.data_sets {
            if ds.name.is_empty() {
                return Err(Error::Config("data set with empty name".into()));
            }
        }
        Ok(())
    }
}

/// Execution environment description, normalized into `EnvironmentIR`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name → base URL (`dev` → `https://dev.example.com`).
    pub base_urls: BTreeMap<String, String>,
    /// `sequential` or `parallel`.
    pub execution_mode: String,
    pub browsers: Vec<String>,
    pub timeouts: TimeoutConfig,
    pub retry: RetryConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            base_urls: BTreeMap::new(),
            execution_mode: "sequential".into(),
            browsers: vec!["chromium".into()],
            timeouts: TimeoutConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    fn validate(&self) -> Result<()> {
        if self.timeouts.implicit_ms == 0
            || self.timeouts.explicit_ms == 0
            || self.timeouts.page_load_ms == 0
        {
            return Err(Error::Config("timeouts must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Wait timeouts in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub implicit_ms: u64,
    pub explicit_ms: u64,
    pub page_load_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            implicit_ms: 5_000,
            explicit_ms: 10_000,
            page_load_ms: 30_000,
        }
    }
}

/// Retry policy for flaky-test mitigation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: 0,
        }
    }
}

/// One externally supplied data set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSetConfig {
    /// Symbolic name tests reference from `dataBinding`.
    pub name: String,
    /// `inline`, `csv`, `json`, ...
    pub data_type: String,
    /// Row-oriented records.
    #[serde(default)]
    pub records: Vec<BTreeMap<String, Value>>,
}
