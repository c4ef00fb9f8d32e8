//! Per-project diagnostics accumulator.
//!
//! Warnings never abort the pipeline; they collect here and ship with the
//! returned bundle so callers can surface extraction quality. Fatal problems
//! go through [`crate::errors::Error`] instead.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A method invocation could not be classified as action or assertion.
    UnclassifiedInvocation,
    /// A `By.*` constructor outside the supported strategy set.
    UnknownLocatorStrategy,
    /// A page-object method with no inferable target.
    UnresolvedMethodTarget,
    /// A step's symbolic target name missing from the name→id map.
    UnresolvedTargetName,
    /// A page-object call whose qualifier matches no discovered page object.
    UnknownQualifier,
    /// Two targets on different pages share a symbolic name; first wins.
    AmbiguousTargetName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
}

/// Append-only warning list, threaded explicitly through the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: WarningKind, file: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        warn!("diagnostics: {:?} {}", kind, message);
        self.warnings.push(Warning {
            kind,
            file: file.map(str::to_string),
            message,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }
}
