//! Test-data IR document.

use crate::config::model::DataSetConfig;
use crate::core::ids;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDataIR {
    pub data_set_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    /// Row-oriented records; keys are field names tests bind against.
    pub records: Vec<BTreeMap<String, Value>>,
}

impl TestDataIR {
    pub fn from_config(ds: &DataSetConfig) -> Self {
        Self {
            data_set_id: ids::document_id("data", &ds.name),
            name: ds.name.clone(),
            data_type: ds.data_type.clone(),
            records: ds.records.clone(),
        }
    }
}
