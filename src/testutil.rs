//! Test-only fixture helpers: hand-assembled canonical trees that mirror what
//! the upstream Java adapter emits for Selenium page objects and tests.

use crate::model::ast::{AstNode, AstTree, NodeKind};
use crate::model::builder::AstBuilder;
use serde_json::{json, Value};

pub fn literal(b: &mut AstBuilder, raw: &str) -> AstNode {
    let mut node = b.node(NodeKind::Literal);
    node.attrs.insert("value".into(), Value::String(raw.into()));
    node
}

pub fn string_literal(b: &mut AstBuilder, text: &str) -> AstNode {
    literal(b, &format!("\"{text}\""))
}

pub fn member_ref(b: &mut AstBuilder, member: &str) -> AstNode {
    let mut node = b.node(NodeKind::MemberReference);
    node.attrs.insert("member".into(), Value::String(member.into()));
    node
}

pub fn invocation(
    b: &mut AstBuilder,
    qualifier: Option<&str>,
    member: &str,
    args: Vec<AstNode>,
) -> AstNode {
    let mut node = b.node(NodeKind::MethodInvocation);
    if let Some(q) = qualifier {
        node.attrs.insert("qualifier".into(), Value::String(q.into()));
    }
    node.attrs.insert("member".into(), Value::String(member.into()));
    for arg in args {
        node.attach_child(arg).unwrap();
    }
    node
}

/// `By.<member>("<value>")`.
pub fn by_call(b: &mut AstBuilder, member: &str, value: &str) -> AstNode {
    let arg = string_literal(b, value);
    invocation(b, Some("By"), member, vec![arg])
}

/// A derived `field` declarator, optionally initialized.
pub fn field(b: &mut AstBuilder, name: &str, init: Option<AstNode>) -> AstNode {
    let mut node = b.node(NodeKind::Field);
    node.name = Some(name.into());
    if let Some(init) = init {
        node.attach_child(init).unwrap();
    }
    node
}

/// A locator field: `private By <name> = By.<member>("<value>");`.
pub fn locator_field(b: &mut AstBuilder, name: &str, by_member: &str, value: &str) -> AstNode {
    let init = by_call(b, by_member, value);
    field(b, name, Some(init))
}

pub fn parameter(b: &mut AstBuilder, name: &str) -> AstNode {
    let mut node = b.node(NodeKind::Parameter);
    node.name = Some(name.into());
    node
}

pub fn statement(b: &mut AstBuilder, expr: AstNode) -> AstNode {
    let mut node = b.node(NodeKind::StatementExpression);
    node.attach_child(expr).unwrap();
    node
}

pub fn annotation(b: &mut AstBuilder, name: &str) -> AstNode {
    let mut node = b.node(NodeKind::Annotation);
    node.name = Some(name.into());
    node
}

/// A method declaration with a block body holding the given statements.
pub fn method(b: &mut AstBuilder, name: &str, statements: Vec<AstNode>) -> AstNode {
    let mut node = b.node(NodeKind::MethodDeclaration);
    node.name = Some(name.into());
    let mut body = b.node(NodeKind::BlockStatement);
    for stmt in statements {
        body.attach_child(stmt).unwrap();
    }
    node.attach_child(body).unwrap();
    node
}

/// A `@Test`-annotated method.
pub fn test_method(b: &mut AstBuilder, name: &str, statements: Vec<AstNode>) -> AstNode {
    let mut node = method(b, name, statements);
    node.attrs.insert("annotations".into(), json!(["Test"]));
    let mut marker = annotation(b, "Test");
    marker.parent_id = Some(node.id.clone());
    // Annotations precede the body in source order.
    node.children.insert(0, marker);
    node
}

pub fn class(b: &mut AstBuilder, name: &str, members: Vec<AstNode>) -> AstNode {
    let mut node = b.node(NodeKind::ClassDeclaration);
    node.name = Some(name.into());
    for member in members {
        node.attach_child(member).unwrap();
    }
    node
}

/// Wrap classes into a compilation unit and validate the tree.
pub fn file(b: AstBuilder, file_path: &str, classes: Vec<AstNode>) -> AstTree {
    let mut b = b;
    let mut root = b.node(NodeKind::CompilationUnit);
    for c in classes {
        root.attach_child(c).unwrap();
    }
    b.build_tree(root, "java", file_path).unwrap()
}

/// Chainable single-class page-object fixture.
pub struct PageBuilder {
    name: String,
    members: Vec<MemberSpec>,
}

enum MemberSpec {
    Locator {
        name: String,
        by_member: String,
        value: String,
    },
    EmptyMethod(String),
    MethodReferencing {
        method: String,
        field: String,
    },
    ActionMethod {
        method: String,
        field: String,
        action: String,
    },
}

impl PageBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn locator_field(mut self, name: &str, by_member: &str, value: &str) -> Self {
        self.members.push(MemberSpec::Locator {
            name: name.into(),
            by_member: by_member.into(),
            value: value.into(),
        });
        self
    }

    pub fn empty_method(mut self, name: &str) -> Self {
        self.members.push(MemberSpec::EmptyMethod(name.into()));
        self
    }

    /// Method whose body dereferences a class field (`element.sendKeys(...)`
    /// elided down to the reference that matters).
    pub fn method_referencing(mut self, method: &str, field: &str) -> Self {
        self.members.push(MemberSpec::MethodReferencing {
            method: method.into(),
            field: field.into(),
        });
        self
    }

    /// Method with the canonical `driver.findElement(<field>).<action>()` body.
    pub fn action_method(mut self, method: &str, field: &str, action: &str) -> Self {
        self.members.push(MemberSpec::ActionMethod {
            method: method.into(),
            field: field.into(),
            action: action.into(),
        });
        self
    }

    pub fn class_node(&self, b: &mut AstBuilder) -> AstNode {
        let mut members = Vec::new();
        for spec in &self.members {
            match spec {
                MemberSpec::Locator {
                    name,
                    by_member,
                    value,
                } => members.push(locator_field(b, name, by_member, value)),
                MemberSpec::EmptyMethod(name) => members.push(method(b, name, vec![])),
                MemberSpec::MethodReferencing {
                    method: method_name,
                    field,
                } => {
                    let reference = member_ref(b, field);
                    let send = invocation(b, Some("element"), "sendKeys", vec![reference]);
                    let stmt = statement(b, send);
                    members.push(method(b, method_name, vec![stmt]));
                }
                MemberSpec::ActionMethod {
                    method: method_name,
                    field,
                    action,
                } => {
                    let stmt = selenium_chain(b, field, action);
                    members.push(method(b, method_name, vec![stmt]));
                }
            }
        }
        class(b, &self.name, members)
    }

    pub fn build(self) -> AstTree {
        let mut b = AstBuilder::new();
        let class_node = self.class_node(&mut b);
        let file_path = format!("{}.java", self.name);
        file(b, &file_path, vec![class_node])
    }
}

/// `driver.findElement(<field>).<action>()` as a statement: the outer
/// invocation carries the action member, the nested one the framework lookup.
pub fn selenium_chain(b: &mut AstBuilder, field_name: &str, action: &str) -> AstNode {
    let reference = member_ref(b, field_name);
    let find = invocation(b, Some("driver"), "findElement", vec![reference]);
    let act = invocation(b, None, action, vec![find]);
    statement(b, act)
}

/// `wait.until(ExpectedConditions.<condition>(<field>))` as a statement.
pub fn wait_chain(b: &mut AstBuilder, condition: &str, field_name: &str) -> AstNode {
    let reference = member_ref(b, field_name);
    let cond = invocation(b, Some("ExpectedConditions"), condition, vec![reference]);
    let until = invocation(b, Some("wait"), "until", vec![cond]);
    statement(b, until)
}
