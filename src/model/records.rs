//! Raw records produced by the extraction stage.
//!
//! These are the producer side of the extraction boundary: per-file, still
//! carrying *symbolic* target names (`target_name_id`) rather than resolved
//! ids. Stage F (ir::build) normalizes them into the typed IR documents and
//! performs the name→id linking. Raw records never leave the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Locator strategy, the closed set of supported `By.*` constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "css")]
    Css,
    #[serde(rename = "xpath")]
    Xpath,
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "className")]
    ClassName,
    #[serde(rename = "tagName")]
    TagName,
    #[serde(rename = "linkText")]
    LinkText,
    #[serde(rename = "partialLinkText")]
    PartialLinkText,
}

impl Strategy {
    /// Map a `By.<member>` constructor to a strategy. Unknown members are
    /// skipped by the locator extractor (with a warning), so this is total
    /// over the supported set only.
    pub fn from_by_member(member: &str) -> Option<Self> {
        use Strategy::*;
        Some(match member {
            "cssSelector" => Css,
            "xpath" => Xpath,
            "id" => Id,
            "name" => Name,
            "className" => ClassName,
            "tagName" => TagName,
            "linkText" => LinkText,
            "partialLinkText" => PartialLinkText,
            _ => return None,
        })
    }

    /// Stable key used in deterministic id hashing and JSON output.
    pub fn as_str(&self) -> &'static str {
        use Strategy::*;
        match self {
            Css => "css",
            Xpath => "xpath",
            Id => "id",
            Name => "name",
            ClassName => "className",
            TagName => "tagName",
            LinkText => "linkText",
            PartialLinkText => "partialLinkText",
        }
    }

    /// Default stability score per strategy kind. Id-based selectors survive
    /// UI churn best; structural XPath and bare tag names worst.
    pub fn default_stability(&self) -> f64 {
        use Strategy::*;
        match self {
            Id => 0.98,
            Css => 0.95,
            Name => 0.90,
            ClassName => 0.85,
            Xpath => 0.80,
            LinkText => 0.75,
            PartialLinkText => 0.70,
            TagName => 0.60,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step discriminator at the raw-record level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Action,
    Assertion,
}

/// Where an assertion operand comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Ui,
    Data,
    Constant,
    Expression,
}

/// One operand of an assertion (or a data-bound step input).
///
/// On the raw side `target_name_id` holds the symbolic name; the linker fills
/// `target_id` while the symbolic form is kept for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub source: SourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
}

impl DataSource {
    pub fn ui(target_name_id: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Ui,
            field: None,
            target_id: None,
            target_name_id: Some(target_name_id.into()),
            value: None,
            masked: None,
        }
    }

    pub fn data(field: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Data,
            field: Some(field.into()),
            target_id: None,
            target_name_id: None,
            value: None,
            masked: None,
        }
    }

    pub fn constant(value: Value) -> Self {
        Self {
            source: SourceKind::Constant,
            field: None,
            target_id: None,
            target_name_id: None,
            value: Some(value),
            masked: None,
        }
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Expression,
            field: None,
            target_id: None,
            target_name_id: None,
            value: Some(Value::String(text.into())),
            masked: None,
        }
    }
}

/// Raw step: an action or assertion with an unresolved symbolic target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStep {
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
    /// Assertion operands; `None` for actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<DataSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<DataSource>,
}

impl RawStep {
    pub fn action(name: impl Into<String>) -> Self {
        Self {
            step_type: StepType::Action,
            name: name.into(),
            target_name_id: None,
            target_node_id: None,
            parameters: BTreeMap::new(),
            actual: None,
            expected: None,
        }
    }

    pub fn assertion(name: impl Into<String>, actual: DataSource, expected: DataSource) -> Self {
        Self {
            step_type: StepType::Assertion,
            name: name.into(),
            target_name_id: None,
            target_node_id: None,
            parameters: BTreeMap::new(),
            actual: Some(actual),
            expected: Some(expected),
        }
    }
}

/// Raw UI target harvested from a locator field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTarget {
    /// Symbolic name, the declarator identifier (`emailInput`).
    pub name: String,
    /// Enclosing class, used as `context.page`.
    pub page: String,
    pub strategy: Strategy,
    pub locator_value: String,
    /// Id of the `By.*` invocation node backing this target.
    pub node_id: String,
}

/// Raw test record: one test method with its ordered steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTest {
    pub name: String,
    /// Enclosing class name; doubles as the suite hint.
    pub suite_hint: String,
    pub steps: Vec<RawStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_set: Option<String>,
}

/// Raw suite record: one test class and the tests it declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSuite {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tests: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_mapping_covers_supported_by_members() {
        assert_eq!(Strategy::from_by_member("cssSelector"), Some(Strategy::Css));
        assert_eq!(Strategy::from_by_member("id"), Some(Strategy::Id));
        assert_eq!(
            Strategy::from_by_member("partialLinkText"),
            Some(Strategy::PartialLinkText)
        );
        assert_eq!(Strategy::from_by_member("javascript"), None);
    }

    #[test]
    fn stability_scores_stay_in_unit_interval() {
        use Strategy::*;
        for s in [Css, Xpath, Id, Name, ClassName, TagName, LinkText, PartialLinkText] {
            let score = s.default_stability();
            assert!((0.0..=1.0).contains(&score), "{s}: {score}");
        }
    }
}
