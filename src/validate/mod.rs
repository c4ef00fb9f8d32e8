//! Built-in bundle validation behind the schema-validator seam.
//!
//! Per-document checks run through the [`SchemaValidator`] trait so a real
//! JSON-schema implementation can be swapped in by the caller; the structural
//! defaults below enforce the IR invariants: reference closure, stability
//! scores within [0, 1], non-empty ids, and an acyclic reference graph.

use crate::core::traits::SchemaValidator;
use crate::errors::{Error, Result};
use crate::ir::bundle::IrBundle;
use crate::ir::refgraph;
use serde_json::Value;
use tracing::info;

/// Structural validator used when no external schema validator is supplied.
#[derive(Debug, Default)]
pub struct BundleValidator;

impl SchemaValidator for BundleValidator {
    /// Document-shape check: a JSON object whose id field (when present by
    /// convention) is a non-empty string.
    fn validate(&self, document_name: &str, doc: &Value) -> Result<()> {
        let Some(object) = doc.as_object() else {
            return Err(Error::SchemaValidation {
                document: document_name.to_string(),
                message: "document is not a JSON object".into(),
            });
        };
        for id_key in ["targetId", "testId", "suiteId", "dataSetId"] {
            if let Some(id) = object.get(id_key) {
                if id.as_str().is_none_or(str::is_empty) {
                    return Err(Error::SchemaValidation {
                        document: document_name.to_string(),
                        message: format!("`{id_key}` must be a non-empty string"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Validate the whole bundle: every document through `validator`, then the
/// cross-document invariants. Fatal on the first violation.
pub fn validate_bundle(bundle: &IrBundle, validator: &dyn SchemaValidator) -> Result<()> {
    validator.validate("project", &serde_json::to_value(&bundle.project)?)?;
    validator.validate("environment", &serde_json::to_value(&bundle.environment)?)?;
    for target in &bundle.targets {
        validator.validate(&target.target_id, &serde_json::to_value(target)?)?;
        for selector in &target.selector_strategies {
            if !(0.0..=1.0).contains(&selector.stability_score) {
                return Err(Error::SchemaValidation {
                    document: target.target_id.clone(),
                    message: format!(
                        "stability score {} outside [0, 1]",
                        selector.stability_score
                    ),
                });
            }
        }
    }
    for suite in &bundle.suites {
        validator.validate(&suite.suite_id, &serde_json::to_value(suite)?)?;
    }
    for test in &bundle.tests {
        validator.validate(&test.test_id, &serde_json::to_value(test)?)?;
    }
    for data in &bundle.data {
        validator.validate(&data.data_set_id, &serde_json::to_value(data)?)?;
    }

    let refs = refgraph::build(bundle);
    if let Some(missing) = refs.missing.first() {
        return Err(Error::Reference {
            kind: missing.kind,
            reference: missing.reference.clone(),
            owner: missing.owner.clone(),
        });
    }
    if refs.has_cycle() {
        return Err(Error::SchemaValidation {
            document: bundle.project.project_name.clone(),
            message: "reference graph contains a cycle".into(),
        });
    }

    info!(
        "validate: bundle `{}` ok ({} documents)",
        bundle.project.project_name,
        2 + bundle.targets.len() + bundle.suites.len() + bundle.tests.len() + bundle.data.len()
    );
    Ok(())
}
