//! Extraction orchestrator: walks one tree and produces the raw records for
//! that file (targets, page objects, tests, suites).
//!
//! Statement dispatch is a first-match sequence of (predicate, mapper) pairs:
//! the assertion mapper claims statements containing an `assert*` invocation,
//! the action mapper takes the rest. Step order follows source order;
//! invocations within a statement are visited pre-order.

pub mod actions;
pub mod assertions;
pub mod locators;
pub mod page_objects;

use crate::analysis::symbol_table::SymbolTable;
use crate::core::diagnostics::Diagnostics;
use crate::errors::Result;
use crate::model::ast::{AstNode, AstTree, NodeKind};
use crate::model::records::{RawStep, RawSuite, RawTarget, RawTest};
use actions::ActionMapper;
use assertions::AssertionMapper;
use page_objects::PageObjectInfo;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Everything extracted from one source file.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub targets: Vec<RawTarget>,
    pub page_objects: Vec<PageObjectInfo>,
    pub tests: Vec<RawTest>,
    pub suites: Vec<RawSuite>,
}

/// Convention-based test method names (`testLogin`, `shouldRedirect`, ...).
fn test_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(test|should|verify)[A-Z0-9_]").unwrap())
}

/// Test-class suffixes recognized by the naming convention.
const TEST_CLASS_SUFFIXES: &[&str] = &["Test", "Tests", "IT"];

/// Run the per-file extraction pipeline: symbol table, target harvest,
/// page-object discovery, then test/suite extraction.
pub fn extract_file(tree: &AstTree, diags: &mut Diagnostics) -> Result<FileExtraction> {
    let symbols = SymbolTable::build(tree, diags)?;

    let targets = locators::extract_targets(tree, &symbols, diags);
    let page_objects = page_objects::extract_page_objects(&symbols);

    let mut tests = Vec::new();
    let mut suites = Vec::new();

    for class_node in symbols.index().by_kind(&NodeKind::ClassDeclaration) {
        let Some(class_name) = class_node.name.as_deref() else {
            continue;
        };
        let mut suite_tests = Vec::new();

        for member in &class_node.children {
            if member.kind != NodeKind::MethodDeclaration {
                continue;
            }
            let Some(method_name) = member.name.as_deref() else {
                continue;
            };
            if !is_test_method(member, class_name) {
                continue;
            }

            let steps = map_method_body(member, &symbols, diags);
            debug!(
                "extract: test {}.{} -> {} steps",
                class_name,
                method_name,
                steps.len()
            );
            suite_tests.push(method_name.to_string());
            tests.push(RawTest {
                name: method_name.to_string(),
                suite_hint: class_name.to_string(),
                steps,
                tags: method_tags(member),
                data_set: None,
            });
        }

        if !suite_tests.is_empty() {
            suites.push(RawSuite {
                name: class_name.to_string(),
                description: None,
                tests: suite_tests,
            });
        }
    }

    info!(
        "extract: {} -> targets={} pages={} tests={} suites={}",
        tree.file_path,
        targets.len(),
        page_objects.len(),
        tests.len(),
        suites.len()
    );
    Ok(FileExtraction {
        targets,
        page_objects,
        tests,
        suites,
    })
}

/// Dispatch every statement of the method body to the first matching mapper.
fn map_method_body(
    method: &AstNode,
    symbols: &SymbolTable<'_>,
    diags: &mut Diagnostics,
) -> Vec<RawStep> {
    let assertion_mapper = AssertionMapper;
    let action_mapper = ActionMapper;
    let mut steps = Vec::new();

    for stmt in body_statements(method) {
        if assertion_mapper.claims(stmt) {
            steps.extend(assertion_mapper.map_statement(stmt, symbols, diags));
        } else {
            steps.extend(action_mapper.map_statement(stmt, symbols, diags));
        }
    }
    steps
}

/// The statements of a method body, in source order. Statements nested in
/// control flow surface through their enclosing statement's subtree.
fn body_statements(method: &AstNode) -> impl Iterator<Item = &AstNode> {
    method
        .children
        .iter()
        .filter(|c| c.kind == NodeKind::BlockStatement)
        .flat_map(|body| body.children.iter())
}

/// `@Test`-annotated, or named by convention inside a test class.
fn is_test_method(method: &AstNode, class_name: &str) -> bool {
    if has_annotation(method, "Test") {
        return true;
    }
    let named_like_test = method
        .name
        .as_deref()
        .is_some_and(|n| test_name_pattern().is_match(n));
    named_like_test
        && TEST_CLASS_SUFFIXES
            .iter()
            .any(|suffix| class_name.ends_with(suffix))
}

fn has_annotation(node: &AstNode, name: &str) -> bool {
    if let Some(annotations) = node.attrs.get("annotations").and_then(|v| v.as_array()) {
        if annotations.iter().any(|a| a.as_str() == Some(name)) {
            return true;
        }
    }
    node.children
        .iter()
        .any(|c| c.kind == NodeKind::Annotation && c.name.as_deref() == Some(name))
}

/// Non-`@Test` annotations double as tags (`@Smoke`, `@Regression`, ...).
fn method_tags(method: &AstNode) -> Vec<String> {
    method
        .children
        .iter()
        .filter(|c| c.kind == NodeKind::Annotation)
        .filter_map(|c| c.name.as_deref())
        .filter(|name| *name != "Test")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::AstBuilder;
    use crate::model::records::StepType;
    use crate::testutil::{
        annotation, class, file, invocation, statement, string_literal, test_method, PageBuilder,
    };

    /// One file holding a page object and a test class exercising it.
    fn login_fixture() -> AstTree {
        let mut b = AstBuilder::new();
        let page = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .locator_field("loginButton", "cssSelector", "#login-btn")
            .method_referencing("enterEmail", "emailInput")
            .action_method("clickLogin", "loginButton", "click")
            .class_node(&mut b);

        let arg = string_literal(&mut b, "john@test.com");
        let enter = invocation(&mut b, Some("loginPage"), "enterEmail", vec![arg]);
        let enter_stmt = statement(&mut b, enter);
        let click = invocation(&mut b, Some("loginPage"), "clickLogin", vec![]);
        let click_stmt = statement(&mut b, click);
        let login_test = test_method(&mut b, "testLogin", vec![enter_stmt, click_stmt]);
        let test_class = class(&mut b, "LoginTest", vec![login_test]);

        file(b, "LoginTest.java", vec![page, test_class])
    }

    #[test]
    fn extracts_tests_targets_and_suites_together() {
        let tree = login_fixture();
        let mut diags = Diagnostics::new();
        let out = extract_file(&tree, &mut diags).unwrap();

        assert_eq!(out.targets.len(), 2);
        assert_eq!(out.page_objects.len(), 1);
        assert_eq!(out.suites.len(), 1);
        assert_eq!(out.suites[0].name, "LoginTest");
        assert_eq!(out.tests.len(), 1);

        let test = &out.tests[0];
        assert_eq!(test.name, "testLogin");
        assert_eq!(test.suite_hint, "LoginTest");
        assert_eq!(test.steps.len(), 2);
        assert_eq!(test.steps[0].name, "enterEmail");
        assert_eq!(test.steps[0].target_name_id.as_deref(), Some("emailInput"));
        assert_eq!(test.steps[1].name, "clickLogin");
        assert_eq!(test.steps[1].target_name_id.as_deref(), Some("loginButton"));
    }

    #[test]
    fn step_order_matches_source_order() {
        let tree = login_fixture();
        let mut diags = Diagnostics::new();
        let out = extract_file(&tree, &mut diags).unwrap();
        let names: Vec<&str> = out.tests[0].steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["enterEmail", "clickLogin"]);
    }

    #[test]
    fn annotation_and_convention_both_discover_tests() {
        let mut b = AstBuilder::new();
        let plain = crate::testutil::method(&mut b, "shouldRedirect", vec![]);
        let helper = crate::testutil::method(&mut b, "setupDriver", vec![]);
        let test_class = class(&mut b, "RedirectTests", vec![plain, helper]);
        let tree = file(b, "RedirectTests.java", vec![test_class]);

        let mut diags = Diagnostics::new();
        let out = extract_file(&tree, &mut diags).unwrap();
        let names: Vec<&str> = out.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["shouldRedirect"]);
    }

    #[test]
    fn non_test_classes_yield_no_suites() {
        let tree = PageBuilder::new("LoginPage")
            .locator_field("emailInput", "cssSelector", "#email")
            .build();
        let mut diags = Diagnostics::new();
        let out = extract_file(&tree, &mut diags).unwrap();
        assert!(out.suites.is_empty());
        assert!(out.tests.is_empty());
    }

    #[test]
    fn extra_annotations_become_tags() {
        let mut b = AstBuilder::new();
        let mut m = test_method(&mut b, "testCheckout", vec![]);
        let mut smoke = annotation(&mut b, "Smoke");
        smoke.parent_id = Some(m.id.clone());
        m.children.insert(1, smoke);
        let test_class = class(&mut b, "CheckoutTest", vec![m]);
        let tree = file(b, "CheckoutTest.java", vec![test_class]);

        let mut diags = Diagnostics::new();
        let out = extract_file(&tree, &mut diags).unwrap();
        assert_eq!(out.tests[0].tags, vec!["Smoke".to_string()]);
    }

    #[test]
    fn assertion_statements_do_not_double_emit_actions() {
        let mut b = AstBuilder::new();
        let page = PageBuilder::new("HomePage")
            .locator_field("welcomeMessage", "cssSelector", ".welcome")
            .empty_method("getWelcomeMessage")
            .class_node(&mut b);

        let getter = invocation(&mut b, Some("homePage"), "getWelcomeMessage", vec![]);
        let expected = string_literal(&mut b, "Welcome!");
        let assert_call =
            invocation(&mut b, Some("Assert"), "assertEquals", vec![getter, expected]);
        let stmt = statement(&mut b, assert_call);
        let m = test_method(&mut b, "verifyWelcome", vec![stmt]);
        let test_class = class(&mut b, "HomeTest", vec![m]);
        let tree = file(b, "HomeTest.java", vec![page, test_class]);

        let mut diags = Diagnostics::new();
        let out = extract_file(&tree, &mut diags).unwrap();

        let steps = &out.tests[0].steps;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].step_type, StepType::Assertion);
    }
}
