//! Read-only index over an [`AstTree`].
//!
//! Built once per tree, used by the symbol table and extractors for O(1)
//! lookup by id, parent navigation, and by-kind scans. Never mutates the AST.

use crate::errors::{Error, Result};
use crate::model::ast::{AstNode, AstTree, NodeKind};
use std::collections::HashMap;

pub struct AstIndex<'t> {
    id_map: HashMap<&'t str, &'t AstNode>,
    kind_index: HashMap<&'t str, Vec<&'t AstNode>>,
}

impl<'t> AstIndex<'t> {
    /// Index every node of the tree. Duplicate ids are a structural error
    /// (the tree constructor already rejects them; this guards indexes built
    /// over hand-assembled nodes).
    pub fn build(tree: &'t AstTree) -> Result<Self> {
        let mut id_map = HashMap::new();
        let mut kind_index: HashMap<&str, Vec<&AstNode>> = HashMap::new();

        for node in tree.walk() {
            if id_map.insert(node.id.as_str(), node).is_some() {
                return Err(Error::structural(
                    &tree.file_path,
                    format!("duplicate AST node id `{}`", node.id),
                ));
            }
            kind_index.entry(node.kind.as_tag()).or_default().push(node);
        }

        Ok(Self { id_map, kind_index })
    }

    pub fn get(&self, node_id: &str) -> Option<&'t AstNode> {
        self.id_map.get(node_id).copied()
    }

    pub fn parent_of(&self, node: &AstNode) -> Option<&'t AstNode> {
        node.parent_id.as_deref().and_then(|pid| self.get(pid))
    }

    /// All nodes of the given kind, in pre-order.
    pub fn by_kind(&self, kind: &NodeKind) -> &[&'t AstNode] {
        self.kind_index
            .get(kind.as_tag())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Walk ancestors (excluding `node`) until one matches `kind`.
    pub fn enclosing(&self, node: &AstNode, kind: &NodeKind) -> Option<&'t AstNode> {
        let mut current = self.parent_of(node);
        while let Some(n) = current {
            if n.kind == *kind {
                return Some(n);
            }
            current = self.parent_of(n);
        }
        None
    }

    pub fn size(&self) -> usize {
        self.id_map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::AstBuilder;

    fn sample_tree() -> AstTree {
        let mut b = AstBuilder::new();
        let mut root = b.node(NodeKind::CompilationUnit);
        let mut class = b.node(NodeKind::ClassDeclaration);
        class.name = Some("LoginPage".into());
        let field = b.node(NodeKind::Field);
        class.attach_child(field).unwrap();
        root.attach_child(class).unwrap();
        b.build_tree(root, "java", "LoginPage.java").unwrap()
    }

    #[test]
    fn lookup_and_parent_navigation() {
        let tree = sample_tree();
        let index = AstIndex::build(&tree).unwrap();
        assert_eq!(index.size(), 3);

        let field = index.by_kind(&NodeKind::Field)[0];
        let parent = index.parent_of(field).unwrap();
        assert_eq!(parent.kind, NodeKind::ClassDeclaration);

        let class = index.enclosing(field, &NodeKind::ClassDeclaration).unwrap();
        assert_eq!(class.name.as_deref(), Some("LoginPage"));
    }

    #[test]
    fn by_kind_is_empty_for_absent_kinds() {
        let tree = sample_tree();
        let index = AstIndex::build(&tree).unwrap();
        assert!(index.by_kind(&NodeKind::MethodInvocation).is_empty());
    }
}
