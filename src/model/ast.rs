//! Canonical AST model shared by every pipeline stage.
//!
//! The tree is language-agnostic: upstream parsers adapt their own node types
//! into [`NodeKind`] (unknown tags survive as [`NodeKind::Other`]) and stash
//! language-specific metadata in the free-form attribute bag. The model is
//! structural only; symbol resolution and extraction live in later stages.
//!
//! Structural invariants, enforced at construction:
//! 1. no node is its own child;
//! 2. a child's `parent_id` equals its parent's id;
//! 3. ids are unique within a tree;
//! 4. the kind tag is non-empty.

use crate::errors::{Error, Result};
use crate::model::location::SourceLocation;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashSet;

/// Canonical node kinds.
///
/// The set mirrors the Java-oriented upstream adapter but is intentionally
/// closed and language-neutral; parsers emitting anything else go through
/// [`NodeKind::Other`] so the extractors can treat the node as opaque.
/// `Field` / `Variable` / `Parameter` are the derived declaration tags the
/// symbol table matches uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    CompilationUnit,
    PackageDeclaration,
    Import,
    ClassDeclaration,
    MethodDeclaration,
    ConstructorDeclaration,
    FieldDeclaration,
    FormalParameter,
    VariableDeclarator,
    LocalVariableDeclaration,
    BlockStatement,
    IfStatement,
    ReturnStatement,
    StatementExpression,
    Assignment,
    BinaryOperation,
    MethodInvocation,
    MemberReference,
    ReferenceType,
    BasicType,
    Literal,
    This,
    Annotation,
    Field,
    Variable,
    Parameter,
    Other(String),
}

impl NodeKind {
    /// The canonical tag string, stable across runs and exports.
    pub fn as_tag(&self) -> &str {
        use NodeKind::*;
        match self {
            CompilationUnit => "CompilationUnit",
            PackageDeclaration => "PackageDeclaration",
            Import => "Import",
            ClassDeclaration => "ClassDeclaration",
            MethodDeclaration => "MethodDeclaration",
            ConstructorDeclaration => "ConstructorDeclaration",
            FieldDeclaration => "FieldDeclaration",
            FormalParameter => "FormalParameter",
            VariableDeclarator => "VariableDeclarator",
            LocalVariableDeclaration => "LocalVariableDeclaration",
            BlockStatement => "BlockStatement",
            IfStatement => "IfStatement",
            ReturnStatement => "ReturnStatement",
            StatementExpression => "StatementExpression",
            Assignment => "Assignment",
            BinaryOperation => "BinaryOperation",
            MethodInvocation => "MethodInvocation",
            MemberReference => "MemberReference",
            ReferenceType => "ReferenceType",
            BasicType => "BasicType",
            Literal => "Literal",
            This => "This",
            Annotation => "Annotation",
            Field => "field",
            Variable => "variable",
            Parameter => "parameter",
            Other(tag) => tag,
        }
    }

    /// Parse a raw tag. Unknown tags are preserved as [`NodeKind::Other`].
    pub fn from_tag(tag: &str) -> Self {
        use NodeKind::*;
        match tag {
            "CompilationUnit" => CompilationUnit,
            "PackageDeclaration" => PackageDeclaration,
            "Import" => Import,
            "ClassDeclaration" => ClassDeclaration,
            "MethodDeclaration" => MethodDeclaration,
            "ConstructorDeclaration" => ConstructorDeclaration,
            "FieldDeclaration" => FieldDeclaration,
            "FormalParameter" => FormalParameter,
            "VariableDeclarator" => VariableDeclarator,
            "LocalVariableDeclaration" => LocalVariableDeclaration,
            "BlockStatement" => BlockStatement,
            "IfStatement" => IfStatement,
            "ReturnStatement" => ReturnStatement,
            "StatementExpression" => StatementExpression,
            "Assignment" => Assignment,
            "BinaryOperation" => BinaryOperation,
            "MethodInvocation" => MethodInvocation,
            "MemberReference" => MemberReference,
            "ReferenceType" => ReferenceType,
            "BasicType" => BasicType,
            "Literal" => Literal,
            "This" => This,
            "Annotation" => Annotation,
            "field" => Field,
            "variable" => Variable,
            "parameter" => Parameter,
            other => Other(other.to_string()),
        }
    }

    /// True for the declaration kinds the symbol table records, either the
    /// derived tags or their canonical counterparts.
    pub fn is_declaration(&self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Field
                | Variable
                | Parameter
                | FieldDeclaration
                | VariableDeclarator
                | LocalVariableDeclaration
                | FormalParameter
        )
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        NodeKind::from_tag(&s)
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.as_tag().to_string()
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// A node in the canonical tree. Children are owned; the parent link is a
/// non-owning id, which is what keeps cycles unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AstNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    /// Language-specific metadata (`member`, `qualifier`, `operator`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, serde_json::Value>,
}

impl AstNode {
    /// Construct a leaf node, validating invariant 4 and the id discipline.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::structural("<unknown>", "AstNode id cannot be empty"));
        }
        if kind.as_tag().is_empty() {
            return Err(Error::structural(
                "<unknown>",
                format!("AstNode {id} has an empty kind tag"),
            ));
        }
        Ok(Self {
            id,
            kind,
            name: None,
            parent_id: None,
            children: Vec::new(),
            location: None,
            attrs: BTreeMap::new(),
        })
    }

    /// Attach a child, wiring its `parent_id`. Rejects self-attachment.
    pub fn attach_child(&mut self, mut child: AstNode) -> Result<()> {
        if child.id == self.id {
            return Err(Error::structural(
                "<unknown>",
                format!("node {} cannot be its own child", self.id),
            ));
        }
        child.parent_id = Some(self.id.clone());
        self.children.push(child);
        Ok(())
    }

    /// String attribute lookup; non-string values yield `None`.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(|v| v.as_str())
    }

    /// The `member` attribute of invocations and member references.
    pub fn member(&self) -> Option<&str> {
        self.attr_str("member")
    }

    /// The `qualifier` attribute of invocations (`By`, `driver`, `loginPage`, ...).
    pub fn qualifier(&self) -> Option<&str> {
        self.attr_str("qualifier")
    }

    /// Depth-first pre-order traversal of this subtree, self first.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Validate invariants 1-3 over the whole subtree rooted here.
    pub(crate) fn validate_subtree(&self, file: &str) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for node in self.walk() {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::structural(
                    file,
                    format!("duplicate node id `{}`", node.id),
                ));
            }
            for child in &node.children {
                if child.id == node.id {
                    return Err(Error::structural(
                        file,
                        format!("node {} is its own child", node.id),
                    ));
                }
                match child.parent_id.as_deref() {
                    Some(pid) if pid == node.id => {}
                    other => {
                        return Err(Error::structural(
                            file,
                            format!(
                                "child {} parent_id mismatch (expected {}, found {:?})",
                                child.id, node.id, other
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pre-order iterator over a borrowed subtree.
pub struct Walk<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so children pop in source order.
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// A full per-file tree: root node plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstTree {
    pub root: AstNode,
    pub language: String,
    pub file_path: String,
}

impl AstTree {
    /// Wrap a root node, validating invariants 1-4 across the tree.
    pub fn new(
        root: AstNode,
        language: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Result<Self> {
        let file_path = file_path.into();
        if file_path.is_empty() {
            return Err(Error::structural(
                "<unknown>",
                "AstTree.file_path cannot be empty",
            ));
        }
        root.validate_subtree(&file_path)?;
        Ok(Self {
            root,
            language: language.into(),
            file_path,
        })
    }

    /// Pre-order traversal of the whole tree.
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }
}
