//! The per-project IR bundle: every document plus accumulated diagnostics.
//!
//! Produced once by `ir::build`, validated, then handed to the writer.
//! Documents are immutable by convention: the pipeline builds a bundle in one
//! shot and only reads it afterwards.

use crate::core::diagnostics::Diagnostics;
use crate::ir::data::TestDataIR;
use crate::ir::environment::EnvironmentIR;
use crate::ir::project::ProjectIR;
use crate::ir::suite::SuiteIR;
use crate::ir::targets::TargetIR;
use crate::ir::test::TestIR;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrBundle {
    pub project: ProjectIR,
    pub environment: EnvironmentIR,
    /// Sorted by (page, name) for determinism.
    pub targets: Vec<TargetIR>,
    pub suites: Vec<SuiteIR>,
    pub tests: Vec<TestIR>,
    pub data: Vec<TestDataIR>,
    pub diagnostics: Diagnostics,
}

impl IrBundle {
    pub fn target_by_id(&self, target_id: &str) -> Option<&TargetIR> {
        self.targets.iter().find(|t| t.target_id == target_id)
    }

    pub fn suite_by_id(&self, suite_id: &str) -> Option<&SuiteIR> {
        self.suites.iter().find(|s| s.suite_id == suite_id)
    }
}
