//! Execution-environment IR document.

use crate::config::model::EnvironmentConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentIR {
    /// Environment name → base URL.
    pub base_urls: BTreeMap<String, String>,
    pub execution_mode: String,
    pub browsers: Vec<String>,
    pub timeouts: Timeouts,
    pub retry_policy: RetryPolicy,
}

/// Wait budgets in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
    pub implicit: u64,
    pub explicit: u64,
    pub page_load: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_retries: u32,
}

impl EnvironmentIR {
    pub fn from_config(env: &EnvironmentConfig) -> Self {
        Self {
            base_urls: env.base_urls.clone(),
            execution_mode: env.execution_mode.clone(),
            browsers: env.browsers.clone(),
            timeouts: Timeouts {
                implicit: env.timeouts.implicit_ms,
                explicit: env.timeouts.explicit_ms,
                page_load: env.timeouts.page_load_ms,
            },
            retry_policy: RetryPolicy {
                enabled: env.retry.enabled,
                max_retries: env.retry.max_retries,
            },
        }
    }
}
