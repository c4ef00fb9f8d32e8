//! Locator harvesting: every `By.*`-initialized declaration becomes a raw
//! target, keyed by its symbolic name and the enclosing class (the page).
//!
//! Unknown `By.*` constructors and argument-less calls are skipped with a
//! warning; they never abort the file.

use crate::analysis::symbol_table::{find_initializer, is_locator_invocation, SymbolTable};
use crate::core::diagnostics::{Diagnostics, WarningKind};
use crate::model::ast::{AstTree, NodeKind};
use crate::model::records::{RawTarget, Strategy};
use tracing::{debug, info};

/// Harvest raw targets from one tree, in pre-order (deterministic).
pub fn extract_targets(
    tree: &AstTree,
    symbols: &SymbolTable<'_>,
    diags: &mut Diagnostics,
) -> Vec<RawTarget> {
    let mut targets = Vec::new();

    for node in tree.walk() {
        if !node.kind.is_declaration() {
            continue;
        }
        let Some(name) = node.name.as_deref() else {
            continue;
        };
        let Some(init) = find_initializer(node) else {
            continue;
        };
        if !is_locator_invocation(init) {
            continue;
        }

        let by_member = init.member().unwrap_or_default();
        let Some(strategy) = Strategy::from_by_member(by_member) else {
            diags.push(
                WarningKind::UnknownLocatorStrategy,
                Some(&tree.file_path),
                format!("locator `{name}` uses unsupported strategy By.{by_member}"),
            );
            continue;
        };

        let Some(value) = locator_argument(init) else {
            diags.push(
                WarningKind::UnknownLocatorStrategy,
                Some(&tree.file_path),
                format!("locator `{name}` has no literal argument"),
            );
            continue;
        };

        let page = symbols
            .index()
            .enclosing(node, &NodeKind::ClassDeclaration)
            .and_then(|c| c.name.clone())
            .unwrap_or_default();

        debug!(
            "locators: {}#{} {}={:?}",
            page,
            name,
            strategy,
            value
        );
        targets.push(RawTarget {
            name: name.to_string(),
            page,
            strategy,
            locator_value: value,
            node_id: init.id.clone(),
        });
    }

    info!(
        "locators: {} targets harvested from {}",
        targets.len(),
        tree.file_path
    );
    targets
}

/// The first string literal argument of a `By.*` call, quotes stripped.
fn locator_argument(init: &crate::model::ast::AstNode) -> Option<String> {
    init.children
        .iter()
        .find(|c| c.kind == NodeKind::Literal)
        .and_then(|lit| lit.attr_str("value"))
        .map(strip_quotes)
}

fn strip_quotes(raw: &str) -> String {
    raw.trim_matches('"').to_string()
}
