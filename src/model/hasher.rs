//! Structural hashing for canonical trees.
//!
//! Bottom-up, order-stable, mutation-free. Two trees hash equal exactly when
//! their kinds, attributes, and child order agree; ids, parent links, and
//! source locations are runtime-only and excluded. Callers use the digest for
//! cheap change detection between pipeline runs.

use crate::core::ids::fnv1a_64;
use crate::model::ast::{AstNode, AstTree};

/// Hash a whole tree (the root's structural digest).
pub fn hash_tree(tree: &AstTree) -> String {
    hash_node(&tree.root)
}

/// Hash one subtree, children first, as 16 lowercase hex chars.
pub fn hash_node(node: &AstNode) -> String {
    format!("{:016x}", node_digest(node))
}

fn node_digest(node: &AstNode) -> u64 {
    let mut payload = String::new();
    payload.push_str(node.kind.as_tag());
    payload.push('|');
    if let Some(name) = &node.name {
        payload.push_str(name);
    }
    // BTreeMap iteration keeps attribute order deterministic.
    for (key, value) in &node.attrs {
        payload.push('|');
        payload.push_str(key);
        payload.push('=');
        payload.push_str(&value.to_string());
    }
    for child in &node.children {
        payload.push('|');
        payload.push_str(&format!("{:016x}", node_digest(child)));
    }
    fnv1a_64(payload.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::PageBuilder;

    #[test]
    fn equal_structures_hash_equal() {
        let a = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .build();
        let b = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .build();
        assert_eq!(hash_tree(&a), hash_tree(&b));
    }

    #[test]
    fn attribute_changes_change_the_hash() {
        let a = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .build();
        let b = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#mail")
            .build();
        assert_ne!(hash_tree(&a), hash_tree(&b));
    }

    #[test]
    fn child_order_matters() {
        let a = PageBuilder::new("LoginPage")
            .locator_field("one", "id", "1")
            .locator_field("two", "id", "2")
            .build();
        let b = PageBuilder::new("LoginPage")
            .locator_field("two", "id", "2")
            .locator_field("one", "id", "1")
            .build();
        assert_ne!(hash_tree(&a), hash_tree(&b));
    }
}
