//! Assertion mapper: turns `Assert.assert*` invocations into assertion steps
//! whose operands are typed data sources (ui / data / constant / expression).

use crate::analysis::symbol_table::SymbolTable;
use crate::core::diagnostics::Diagnostics;
use crate::extract::actions::literal_value;
use crate::model::ast::{AstNode, NodeKind};
use crate::model::records::{DataSource, RawStep};
use serde_json::Value;
use tracing::debug;

pub struct AssertionMapper;

impl AssertionMapper {
    /// True when the statement subtree contains an `assert*` invocation.
    pub fn claims(&self, stmt: &AstNode) -> bool {
        find_assertion(stmt).is_some()
    }

    pub fn map_statement(
        &self,
        stmt: &AstNode,
        symbols: &SymbolTable<'_>,
        _diags: &mut Diagnostics,
    ) -> Vec<RawStep> {
        let Some(invocation) = find_assertion(stmt) else {
            return Vec::new();
        };
        let kind = invocation.member().unwrap_or("assert");

        let operands: Vec<&AstNode> = invocation
            .children
            .iter()
            .filter(|c| is_operand(c))
            .collect();

        let actual = operands
            .first()
            .copied()
            .map(|arg| classify_operand(arg, symbols))
            .unwrap_or_else(|| DataSource::constant(Value::Null));
        let expected = operands
            .get(1)
            .copied()
            .map(|arg| classify_operand(arg, symbols))
            .unwrap_or_else(|| implied_expectation(kind));

        let mut step = RawStep::assertion(kind, actual, expected);
        if let Some((target_name, target_node_id)) = symbols.resolve_step_target(stmt) {
            step.target_name_id = Some(target_name);
            step.target_node_id = Some(target_node_id);
        }

        debug!("assertions: {} -> `{}`", invocation.id, step.name);
        vec![step]
    }
}

/// First `assert*` invocation in the subtree, pre-order.
fn find_assertion(stmt: &AstNode) -> Option<&AstNode> {
    stmt.walk().find(|n| {
        n.kind == NodeKind::MethodInvocation
            && n.member().is_some_and(|m| m.starts_with("assert"))
    })
}

fn is_operand(node: &AstNode) -> bool {
    matches!(
        node.kind,
        NodeKind::Literal
            | NodeKind::MemberReference
            | NodeKind::MethodInvocation
            | NodeKind::BinaryOperation
    )
}

/// Operand classification:
/// - resolves to a UI target (page-object getter, locator reference) → `ui`;
/// - names a declared parameter → `data` (the value arrives from a data row);
/// - literal → `constant`;
/// - anything else → `expression`, rendered as source text.
fn classify_operand(arg: &AstNode, symbols: &SymbolTable<'_>) -> DataSource {
    if let Some((target_name, _node_id)) = symbols.resolve_step_target(arg) {
        return DataSource::ui(target_name);
    }

    if arg.kind == NodeKind::MemberReference {
        if let Some(name) = arg.member().or(arg.name.as_deref()) {
            if symbols.is_parameter(name) {
                return DataSource::data(name);
            }
        }
    }

    if arg.kind == NodeKind::Literal {
        return DataSource::constant(literal_value(arg));
    }

    let rendered = arg
        .attr_str("source_text")
        .unwrap_or("<expr>")
        .to_string();
    DataSource::expression(rendered)
}

/// Expected operand implied by single-argument assertion kinds.
fn implied_expectation(kind: &str) -> DataSource {
    match kind {
        "assertTrue" => DataSource::constant(Value::Bool(true)),
        "assertFalse" => DataSource::constant(Value::Bool(false)),
        "assertNotNull" => DataSource::constant(Value::String("notNull".into())),
        "assertNull" => DataSource::constant(Value::Null),
        _ => DataSource::constant(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::AstBuilder;
    use crate::model::records::{SourceKind, StepType};
    use crate::testutil::{
        class, file, invocation, member_ref, parameter, statement, string_literal, PageBuilder,
    };

    /// HomePage with a bound getter plus a test class whose method takes an
    /// `expectedMessage` parameter.
    fn scenario_tree() -> crate::model::ast::AstTree {
        let mut b = AstBuilder::new();
        let home = PageBuilder::new("HomePage")
            .locator_field("welcomeMessage", "cssSelector", ".welcome")
            .empty_method("getWelcomeMessage")
            .class_node(&mut b);

        let param = parameter(&mut b, "expectedMessage");
        let getter = invocation(&mut b, Some("homePage"), "getWelcomeMessage", vec![]);
        let reference = member_ref(&mut b, "expectedMessage");
        let assert_call = invocation(&mut b, Some("Assert"), "assertEquals", vec![getter, reference]);
        let stmt = statement(&mut b, assert_call);

        let mut test_method = crate::testutil::method(&mut b, "verifyWelcome", vec![stmt]);
        test_method.children.insert(0, {
            let mut p = param;
            p.parent_id = Some(test_method.id.clone());
            p
        });
        let tests = class(&mut b, "HomeTest", vec![test_method]);

        file(b, "HomeTest.java", vec![home, tests])
    }

    fn map_first_assertion(tree: &crate::model::ast::AstTree) -> RawStep {
        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(tree, &mut diags).unwrap();
        let stmt = tree
            .walk()
            .find(|n| n.kind == NodeKind::StatementExpression)
            .unwrap();
        AssertionMapper
            .map_statement(stmt, &symbols, &mut diags)
            .remove(0)
    }

    #[test]
    fn assert_equals_with_ui_and_data_sources() {
        let tree = scenario_tree();
        let step = map_first_assertion(&tree);

        assert_eq!(step.step_type, StepType::Assertion);
        assert_eq!(step.name, "assertEquals");

        let actual = step.actual.unwrap();
        assert_eq!(actual.source, SourceKind::Ui);
        assert_eq!(actual.target_name_id.as_deref(), Some("welcomeMessage"));

        let expected = step.expected.unwrap();
        assert_eq!(expected.source, SourceKind::Data);
        assert_eq!(expected.field.as_deref(), Some("expectedMessage"));
    }

    #[test]
    fn assert_true_implies_constant_expectation() {
        let mut b = AstBuilder::new();
        let flag = member_ref(&mut b, "visible");
        let assert_call = invocation(&mut b, Some("Assert"), "assertTrue", vec![flag]);
        let stmt = statement(&mut b, assert_call);
        let tree = file(b, "FlagTest.java", vec![]);

        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(&tree, &mut diags).unwrap();
        let steps = AssertionMapper.map_statement(&stmt, &symbols, &mut diags);

        let expected = steps[0].expected.clone().unwrap();
        assert_eq!(expected.source, SourceKind::Constant);
        assert_eq!(expected.value, Some(Value::Bool(true)));
    }

    #[test]
    fn literal_operands_are_constants() {
        let mut b = AstBuilder::new();
        let lhs = member_ref(&mut b, "somethingUnknown");
        let rhs = string_literal(&mut b, "Welcome!");
        let assert_call = invocation(&mut b, Some("Assert"), "assertEquals", vec![lhs, rhs]);
        let stmt = statement(&mut b, assert_call);
        let tree = file(b, "GreetTest.java", vec![]);

        let mut diags = Diagnostics::new();
        let symbols = SymbolTable::build(&tree, &mut diags).unwrap();
        let steps = AssertionMapper.map_statement(&stmt, &symbols, &mut diags);

        let expected = steps[0].expected.clone().unwrap();
        assert_eq!(expected.source, SourceKind::Constant);
        assert_eq!(expected.value, Some(Value::String("Welcome!".into())));
    }

    #[test]
    fn claims_only_assertion_statements() {
        let mut b = AstBuilder::new();
        let call = invocation(&mut b, Some("loginPage"), "enterEmail", vec![]);
        let action_stmt = statement(&mut b, call);
        let assert_call = invocation(&mut b, Some("Assert"), "assertTrue", vec![]);
        let assert_stmt = statement(&mut b, assert_call);

        assert!(!AssertionMapper.claims(&action_stmt));
        assert!(AssertionMapper.claims(&assert_stmt));
    }
}
