//! Action mapper: classifies method invocations inside test bodies.
//!
//! Classification per invocation, in order:
//! 1. framework utility members are skipped;
//! 2. supported Selenium primitives become action steps;
//! 3. calls qualified by anything outside the framework-qualifier set become
//!    page-object action steps (with a warning when the qualifier matches no
//!    discovered page object);
//! 4. everything else is skipped with an unclassified-invocation warning.

use crate::analysis::symbol_table::{is_locator_invocation, SymbolTable};
use crate::core::diagnostics::{Diagnostics, WarningKind};
use crate::model::ast::{AstNode, NodeKind};
use crate::model::records::RawStep;
use serde_json::Value;
use tracing::debug;

/// Selenium primitives that map 1:1 onto IR actions.
pub const SUPPORTED_ACTIONS: &[&str] = &[
    "click",
    "sendKeys",
    "submit",
    "clear",
    "doubleClick",
    "contextClick",
    "getText",
    "waitForVisible",
    "navigate",
];

/// Plumbing members that never become steps.
pub const UTILITY_METHODS: &[&str] = &[
    "findElement",
    "findElements",
    "manage",
    "timeouts",
    "implicitlyWait",
    "until",
    "presenceOfElementLocated",
    "visibilityOfElementLocated",
    "elementToBeClickable",
    "get",
];

/// Qualifiers that are framework machinery, not page objects. The empty
/// qualifier covers unqualified calls.
pub const FRAMEWORK_QUALIFIERS: &[&str] =
    &["Duration", "ExpectedConditions", "By", "driver", "wait", "System", ""];

pub struct ActionMapper;

impl ActionMapper {
    /// Map every invocation inside one statement, in pre-order.
    pub fn map_statement(
        &self,
        stmt: &AstNode,
        symbols: &SymbolTable<'_>,
        diags: &mut Diagnostics,
    ) -> Vec<RawStep> {
        let mut steps = Vec::new();

        for node in stmt.walk() {
            if node.kind != NodeKind::MethodInvocation {
                continue;
            }
            // Locator constructors are arguments, never steps.
            if is_locator_invocation(node) {
                continue;
            }
            let Some(member) = node.member() else {
                continue;
            };
            let qualifier = node.qualifier().unwrap_or("");

            if UTILITY_METHODS.contains(&member) {
                continue;
            }

            let is_primitive = SUPPORTED_ACTIONS.contains(&member);
            let is_page_call = !is_primitive && !is_framework_qualifier(qualifier);

            if !is_primitive && !is_page_call {
                diags.push(
                    WarningKind::UnclassifiedInvocation,
                    Some(symbols.file_path()),
                    format!("could not classify invocation `{qualifier}.{member}`"),
                );
                continue;
            }

            if is_page_call && symbols.page_object_for(qualifier).is_none() {
                diags.push(
                    WarningKind::UnknownQualifier,
                    Some(symbols.file_path()),
                    format!("`{qualifier}.{member}` matches no discovered page object"),
                );
            }

            let mut step = RawStep::action(member);
            if let Some((target_name, target_node_id)) = symbols.resolve_step_target(stmt) {
                step.target_name_id = Some(target_name);
                step.target_node_id = Some(target_node_id);
            }
            step.parameters = collect_parameters(node);

            debug!(
                "actions: {} -> step `{}` target={:?}",
                node.id, step.name, step.target_name_id
            );
            steps.push(step);
        }

        steps
    }
}

fn is_framework_qualifier(qualifier: &str) -> bool {
    // `System.out` and friends count by their head segment.
    let head = qualifier.split('.').next().unwrap_or("");
    FRAMEWORK_QUALIFIERS.contains(&head)
}

/// Positional literal arguments under `value`, `value2`, ... Literals parse
/// to their JSON form; binary operations and assignments render as source
/// text or `"<expr>"`. References and nested calls are receivers or target
/// arguments, not step parameters.
fn collect_parameters(invocation: &AstNode) -> std::collections::BTreeMap<String, Value> {
    let mut parameters = std::collections::BTreeMap::new();
    let mut ordinal = 0usize;

    for child in &invocation.children {
        let value = match child.kind {
            NodeKind::Literal => Some(literal_value(child)),
            NodeKind::BinaryOperation | NodeKind::Assignment => Some(
                child
                    .attr_str("source_text")
                    .map(|s| Value::String(s.to_string()))
                    .unwrap_or_else(|| Value::String("<expr>".into())),
            ),
            _ => None,
        };
        if let Some(value) = value {
            ordinal += 1;
            parameters.insert(parameter_key(ordinal), value);
        }
    }

    parameters
}

fn parameter_key(ordinal: usize) -> String {
    if ordinal == 1 {
        "value".to_string()
    } else {
        format!("value{ordinal}")
    }
}

/// Parse a raw literal attr into JSON: quoted strings are unwrapped, numbers
/// and booleans take their natural type, anything else stays a string.
pub(crate) fn literal_value(node: &AstNode) -> Value {
    let raw = node.attr_str("value").unwrap_or_default();
    if raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2 {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }
    if raw == "true" || raw == "false" {
        return Value::Bool(raw == "true");
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::AstBuilder;
    use crate::testutil::{
        file, invocation, selenium_chain, statement, string_literal, wait_chain, PageBuilder,
    };

    fn symbols_and_diags(tree: &crate::model::ast::AstTree) -> (SymbolTable<'_>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(tree, &mut diags).unwrap();
        (symbols, diags)
    }

    #[test]
    fn selenium_primitive_emits_action_with_resolved_target() {
        let tree = PageBuilder::new("LoginPage")
            .locator_field("loginButton", "cssSelector", "#login-btn")
            .action_method("clickLogin", "loginButton", "click")
            .build();
        let (symbols, mut diags) = symbols_and_diags(&tree);

        let stmt = tree
            .walk()
            .find(|n| n.kind == NodeKind::StatementExpression)
            .unwrap();
        let steps = ActionMapper.map_statement(stmt, &symbols, &mut diags);

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "click");
        assert_eq!(steps[0].target_name_id.as_deref(), Some("loginButton"));
        assert!(steps[0].target_node_id.is_some());
    }

    #[test]
    fn wait_chains_emit_nothing() {
        let tree = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .build();
        let (symbols, mut diags) = symbols_and_diags(&tree);

        let mut b = AstBuilder::new();
        let stmt = wait_chain(&mut b, "visibilityOfElementLocated", "emailInput");
        let steps = ActionMapper.map_statement(&stmt, &symbols, &mut diags);
        assert!(steps.is_empty());
    }

    #[test]
    fn wait_then_click_emits_only_the_click() {
        let tree = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .build();
        let (symbols, mut diags) = symbols_and_diags(&tree);

        let mut b = AstBuilder::new();
        let wait_stmt = wait_chain(&mut b, "visibilityOfElementLocated", "emailInput");
        let click_stmt = selenium_chain(&mut b, "emailInput", "click");

        let mut steps = ActionMapper.map_statement(&wait_stmt, &symbols, &mut diags);
        steps.extend(ActionMapper.map_statement(&click_stmt, &symbols, &mut diags));

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "click");
    }

    #[test]
    fn page_object_call_carries_literal_parameters() {
        let tree = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .method_referencing("enterEmail", "emailInput")
            .build();
        let (symbols, mut diags) = symbols_and_diags(&tree);

        let mut b = AstBuilder::new();
        let arg = string_literal(&mut b, "john@test.com");
        let call = invocation(&mut b, Some("loginPage"), "enterEmail", vec![arg]);
        let stmt = statement(&mut b, call);

        let steps = ActionMapper.map_statement(&stmt, &symbols, &mut diags);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "enterEmail");
        assert_eq!(steps[0].target_name_id.as_deref(), Some("emailInput"));
        assert_eq!(
            steps[0].parameters.get("value"),
            Some(&Value::String("john@test.com".into()))
        );
    }

    #[test]
    fn unknown_qualifier_still_emits_step_with_warning() {
        let mut b = AstBuilder::new();
        let call = invocation(&mut b, Some("helperLib"), "doMagic", vec![]);
        let stmt = statement(&mut b, call);
        let tree = file(b, "MagicTest.java", vec![]);

        // Tree has no classes; build symbols over it directly.
        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(&tree, &mut diags).unwrap();

        let steps = ActionMapper.map_statement(&stmt, &symbols, &mut diags);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].name, "doMagic");
        assert!(steps[0].target_name_id.is_none());
        assert!(diags
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::UnknownQualifier));
    }

    #[test]
    fn literal_values_parse_naturally() {
        let mut b = AstBuilder::new();
        let quoted = string_literal(&mut b, "hello");
        assert_eq!(literal_value(&quoted), Value::String("hello".into()));

        let number = crate::testutil::literal(&mut b, "42");
        assert_eq!(literal_value(&number), Value::Number(42.into()));

        let boolean = crate::testutil::literal(&mut b, "true");
        assert_eq!(literal_value(&boolean), Value::Bool(true));
    }
}
