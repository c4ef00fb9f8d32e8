//! Canonical AST construction layer.
//!
//! Upstream adapters (and the test fixtures) build trees through
//! [`AstBuilder`] so id generation and parent wiring stay in one place.
//! Ids are deterministic within a build run: `<kind-lowercase>_<sequence>`.
//! No global state; one builder per file.

use crate::errors::Result;
use crate::model::ast::{AstNode, AstTree, NodeKind};
use crate::model::location::SourceLocation;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct AstBuilder {
    counter: u64,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node with the next deterministic id.
    pub fn node(&mut self, kind: NodeKind) -> AstNode {
        let id = self.next_id(&kind);
        // `new` only fails on empty id/tag, which next_id cannot produce.
        AstNode::new(id, kind).expect("builder ids are never empty")
    }

    /// Create a node with a name, attributes, and optional location in one go.
    pub fn node_with(
        &mut self,
        kind: NodeKind,
        name: Option<&str>,
        attrs: BTreeMap<String, Value>,
        location: Option<SourceLocation>,
    ) -> AstNode {
        let mut node = self.node(kind);
        node.name = name.map(str::to_string);
        node.attrs = attrs;
        node.location = location;
        node
    }

    /// Finalize a tree, running the structural validation pass.
    pub fn build_tree(&self, root: AstNode, language: &str, file_path: &str) -> Result<AstTree> {
        debug!(
            "ast: finalizing tree root={} language={} file={}",
            root.id, language, file_path
        );
        AstTree::new(root, language, file_path)
    }

    fn next_id(&mut self, kind: &NodeKind) -> String {
        self.counter += 1;
        format!("{}_{}", kind.as_tag().to_lowercase(), self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_kind_tagged() {
        let mut b = AstBuilder::new();
        let a = b.node(NodeKind::ClassDeclaration);
        let c = b.node(NodeKind::Field);
        assert_eq!(a.id, "classdeclaration_1");
        assert_eq!(c.id, "field_2");
    }

    #[test]
    fn build_tree_validates_structure() {
        let mut b = AstBuilder::new();
        let mut root = b.node(NodeKind::CompilationUnit);
        let child = b.node(NodeKind::Import);
        root.attach_child(child).unwrap();
        let tree = b.build_tree(root, "java", "A.java").unwrap();
        assert_eq!(tree.node_count(), 2);
    }
}
