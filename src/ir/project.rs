//! Project-level IR document.

use crate::config::model::PipelineConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// IR format version stamped into every bundle.
pub const IR_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIR {
    pub ir_version: String,
    pub project_name: String,
    pub source_framework: String,
    pub target_framework: String,
    pub architecture_pattern: String,
    pub supports_parallel: bool,
    pub created_on: DateTime<Utc>,
}

impl ProjectIR {
    pub fn from_config(config: &PipelineConfig, created_on: DateTime<Utc>) -> Self {
        Self {
            ir_version: IR_VERSION.into(),
            project_name: config.project_name.clone(),
            source_framework: config.source_framework.clone(),
            target_framework: config.target_framework.clone(),
            architecture_pattern: config.architecture_pattern.clone(),
            supports_parallel: config.supports_parallel,
            created_on,
        }
    }
}
