//! Collaborator seams for the pipeline.
//!
//! These traits decouple the upstream parser and the downstream schema
//! validator from the core, making the pipeline easy to test and evolve.
//! The core never parses source text or owns schema files itself.

use crate::model::ast::AstTree;
use std::path::Path;

/// Upstream AST provider: turns one source file into a canonical tree.
///
/// Trees must satisfy the structural invariants of [`crate::model::ast`];
/// any node type outside the canonical set is preserved via
/// [`crate::model::ast::NodeKind::Other`] and treated as opaque downstream.
pub trait AstProvider {
    fn parse(&self, file_path: &Path, language: &str) -> anyhow::Result<AstTree>;
}

/// Downstream schema validator, invoked on every IR document after build.
/// Validation failure is fatal for the project.
pub trait SchemaValidator {
    fn validate(&self, document_name: &str, doc: &serde_json::Value) -> crate::errors::Result<()>;
}
