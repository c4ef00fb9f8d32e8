//! Source position model.
//!
//! Lines are 1-based (as commonly reported to users), columns are 0-based.
//! Every field is optional: upstream parsers differ in how much position
//! information they preserve, and the pipeline never depends on it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl SourceLocation {
    /// Location with only a start line, the common case for line-based parsers.
    pub fn at_line(line: usize) -> Self {
        Self {
            start_line: Some(line),
            ..Self::default()
        }
    }

    /// Lines spanned (1-based inclusive); 0 when either bound is missing.
    pub fn line_count(&self) -> usize {
        match (self.start_line, self.end_line) {
            (Some(s), Some(e)) if e >= s => e - s + 1,
            _ => 0,
        }
    }
}
