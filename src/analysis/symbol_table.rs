//! Per-tree symbol table: the "what UI target does this node reference?" oracle.
//!
//! Built in three passes:
//! 1. declarations: record `name -> (declarator, initializer)` for every
//!    field/variable/parameter;
//! 2. class structure: collect each class's field set and tag classes holding
//!    at least one `By.*`-initialized field as page objects;
//! 3. method inference: bind each page-object method to a target field, by
//!    body reference first, by name pattern second.
//!
//! Resolution never fails loudly: missing information yields `None` and the
//! extractor emits the step with a null target.

use crate::core::diagnostics::{Diagnostics, WarningKind};
use crate::core::index::AstIndex;
use crate::errors::Result;
use crate::model::ast::{AstNode, AstTree, NodeKind};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Method-name prefix → inferred target suffix (case-preserving on the stem).
/// `get`/`read` are handled separately: they try `<stem>Label` then the stem
/// verbatim.
const NAME_PATTERNS: &[(&[&str], &str)] = &[
    (&["enter", "type", "set", "fill", "input"], "Input"),
    (&["click", "press", "tap"], "Button"),
    (&["select", "choose"], "Select"),
    (&["check", "uncheck", "toggle"], "Checkbox"),
];

const GETTER_PREFIXES: &[&str] = &["get", "read"];

/// Declaration kind after uniform matching of derived and canonical tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Field,
    Variable,
    Parameter,
}

/// One recorded declaration: the declarator node and its initializer, if any.
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'t> {
    pub kind: DeclKind,
    pub declarator: &'t AstNode,
    pub initializer: Option<&'t AstNode>,
}

/// Per-class structure: fields, locator fields, and inferred method bindings.
#[derive(Debug, Clone)]
pub struct ClassInfo<'t> {
    pub node: &'t AstNode,
    /// Field name → declarator node.
    pub fields: BTreeMap<&'t str, &'t AstNode>,
    /// Field name → backing `By.*` invocation node.
    pub locators: BTreeMap<&'t str, &'t AstNode>,
    pub is_page_object: bool,
    /// Method name → inferred target field name (validated against `fields`).
    pub methods: BTreeMap<&'t str, Option<String>>,
}

pub struct SymbolTable<'t> {
    file_path: &'t str,
    index: AstIndex<'t>,
    declarations: HashMap<&'t str, Declaration<'t>>,
    classes: BTreeMap<&'t str, ClassInfo<'t>>,
    /// `By.*` invocation node id → owning field name.
    locator_owner: HashMap<&'t str, &'t str>,
}

impl<'t> SymbolTable<'t> {
    /// Run all three passes over one tree.
    pub fn build(tree: &'t AstTree, diags: &mut Diagnostics) -> Result<Self> {
        let index = AstIndex::build(tree)?;
        let mut table = Self {
            file_path: &tree.file_path,
            index,
            declarations: HashMap::new(),
            classes: BTreeMap::new(),
            locator_owner: HashMap::new(),
        };

        table.record_declarations(tree);
        table.record_class_structure();
        table.infer_method_targets(diags);

        info!(
            "symbols: {} declarations, {} classes ({} page objects) in {}",
            table.declarations.len(),
            table.classes.len(),
            table.classes.values().filter(|c| c.is_page_object).count(),
            tree.file_path
        );
        Ok(table)
    }

    // ------------------------------------------------------------------
    // Pass 1: declarations
    // ------------------------------------------------------------------

    fn record_declarations(&mut self, tree: &'t AstTree) {
        for node in tree.walk() {
            if !node.kind.is_declaration() {
                continue;
            }
            let Some(name) = node.name.as_deref() else {
                continue;
            };
            let kind = self.classify_declaration(node);
            let initializer = find_initializer(node);
            debug!(
                "symbols: declared {} `{}` init={:?}",
                match kind {
                    DeclKind::Field => "field",
                    DeclKind::Variable => "variable",
                    DeclKind::Parameter => "parameter",
                },
                name,
                initializer.map(|n| n.id.as_str())
            );
            self.declarations.insert(
                name,
                Declaration {
                    kind,
                    declarator: node,
                    initializer,
                },
            );
        }
    }

    fn classify_declaration(&self, node: &'t AstNode) -> DeclKind {
        match node.kind {
            NodeKind::Field | NodeKind::FieldDeclaration => DeclKind::Field,
            NodeKind::Parameter | NodeKind::FormalParameter => DeclKind::Parameter,
            NodeKind::VariableDeclarator => {
                // A declarator directly under a field declaration is a field.
                match self.index.parent_of(node) {
                    Some(p) if p.kind == NodeKind::FieldDeclaration => DeclKind::Field,
                    _ => DeclKind::Variable,
                }
            }
            _ => DeclKind::Variable,
        }
    }

    // ------------------------------------------------------------------
    // Pass 2: class structure
    // ------------------------------------------------------------------

    fn record_class_structure(&mut self) {
        let mut classes: BTreeMap<&'t str, ClassInfo<'t>> = BTreeMap::new();

        for class_node in self.index.by_kind(&NodeKind::ClassDeclaration) {
            let Some(class_name) = class_node.name.as_deref() else {
                continue;
            };
            classes.insert(
                class_name,
                ClassInfo {
                    node: class_node,
                    fields: BTreeMap::new(),
                    locators: BTreeMap::new(),
                    is_page_object: false,
                    methods: BTreeMap::new(),
                },
            );
        }

        // Assign each recorded field to its enclosing class.
        for (&name, decl) in &self.declarations {
            if decl.kind != DeclKind::Field {
                continue;
            }
            let Some(class_node) = self
                .index
                .enclosing(decl.declarator, &NodeKind::ClassDeclaration)
            else {
                continue;
            };
            let Some(class_name) = class_node.name.as_deref() else {
                continue;
            };
            let Some(info) = classes.get_mut(class_name) else {
                continue;
            };
            info.fields.insert(name, decl.declarator);
            if let Some(init) = decl.initializer {
                if is_locator_invocation(init) {
                    info.locators.insert(name, init);
                    info.is_page_object = true;
                    self.locator_owner.insert(init.id.as_str(), name);
                }
            }
        }

        self.classes = classes;
    }

    // ------------------------------------------------------------------
    // Pass 3: method→target inference
    // ------------------------------------------------------------------

    fn infer_method_targets(&mut self, diags: &mut Diagnostics) {
        let mut bindings: Vec<(&'t str, &'t str, Option<String>)> = Vec::new();

        for method_node in self.index.by_kind(&NodeKind::MethodDeclaration) {
            let Some(method_name) = method_node.name.as_deref() else {
                continue;
            };
            let Some(class_node) = self
                .index
                .enclosing(method_node, &NodeKind::ClassDeclaration)
            else {
                continue;
            };
            let Some(class_name) = class_node.name.as_deref() else {
                continue;
            };
            let Some(info) = self.classes.get(class_name) else {
                continue;
            };
            if !info.is_page_object {
                continue;
            }

            let inferred = self
                .bind_by_body_reference(method_node, info)
                .or_else(|| infer_by_name_pattern(method_name, &info.fields));

            if inferred.is_none() {
                diags.push(
                    WarningKind::UnresolvedMethodTarget,
                    Some(self.file_path),
                    format!("page-object method {class_name}.{method_name} has no inferable target"),
                );
            }
            bindings.push((class_name, method_name, inferred));
        }

        for (class_name, method_name, inferred) in bindings {
            if let Some(info) = self.classes.get_mut(class_name) {
                info.methods.insert(method_name, inferred);
            }
        }
    }

    /// (a) of §method inference: first body reference to a locator field wins.
    fn bind_by_body_reference(
        &self,
        method_node: &'t AstNode,
        info: &ClassInfo<'t>,
    ) -> Option<String> {
        for node in method_node.walk() {
            if node.kind != NodeKind::MemberReference {
                continue;
            }
            let referenced = node.member().or(node.name.as_deref());
            if let Some(name) = referenced {
                if info.locators.contains_key(name) {
                    return Some(name.to_string());
                }
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Resolution API
    // ------------------------------------------------------------------

    /// Resolve a node reference (by `name` or `member` attr, or declared name)
    /// to a recorded declaration with an initializer.
    pub fn resolve_reference(&self, node: &AstNode) -> Option<(&'t str, &'t AstNode)> {
        let candidates = [
            node.attr_str("name"),
            node.name.as_deref(),
            node.member(),
        ];
        for candidate in candidates.into_iter().flatten() {
            // get_key_value hands back the key interned in the tree's lifetime.
            if let Some((&key, decl)) = self.declarations.get_key_value(candidate) {
                if let Some(init) = decl.initializer {
                    return Some((key, init));
                }
            }
        }
        None
    }

    /// Best-effort resolution of a step's target from one statement node.
    /// Returns `(target_name, target_node_id)`.
    pub fn resolve_step_target(&self, stmt: &AstNode) -> Option<(String, String)> {
        // 1) page-object call: qualifier names an instance, member a bound method
        for node in stmt.walk() {
            if node.kind != NodeKind::MethodInvocation {
                continue;
            }
            let (Some(qualifier), Some(member)) = (node.qualifier(), node.member()) else {
                continue;
            };
            let Some(info) = self.page_object_for(qualifier) else {
                continue;
            };
            if let Some(Some(field)) = info.methods.get(member) {
                let node_id = info
                    .locators
                    .get(field.as_str())
                    .map(|init| init.id.clone());
                if let Some(node_id) = node_id {
                    return Some((field.clone(), node_id));
                }
            }
        }

        // 2) member reference resolving to a By.*-initialized declaration.
        // Only MemberReference nodes qualify here; matching an invocation's
        // `member` attribute would misattribute calls that happen to share a
        // declared field's name.
        for node in stmt.walk() {
            if node.kind != NodeKind::MemberReference {
                continue;
            }
            if let Some((name, init)) = self.resolve_reference(node) {
                if is_locator_invocation(init) {
                    return Some((name.to_string(), init.id.clone()));
                }
            }
        }

        // 3) inline By.* invocation; prefer the owning field's name
        for node in stmt.walk() {
            if is_locator_invocation(node) {
                let name = self
                    .locator_owner
                    .get(node.id.as_str())
                    .map(|owner| owner.to_string())
                    .or_else(|| node.member().map(str::to_string))?;
                return Some((name, node.id.clone()));
            }
        }

        None
    }

    /// Resolve an invocation qualifier to a page-object class: declared type
    /// first, then the `upperFirst(qualifier)` naming heuristic.
    pub fn page_object_for(&self, qualifier: &str) -> Option<&ClassInfo<'t>> {
        if let Some(decl) = self.declarations.get(qualifier) {
            if let Some(type_name) = declared_type_name(decl.declarator) {
                if let Some(info) = self.classes.get(type_name) {
                    if info.is_page_object {
                        return Some(info);
                    }
                }
            }
        }
        let guess = upper_first(qualifier);
        self.classes
            .get(guess.as_str())
            .filter(|info| info.is_page_object)
    }

    /// True when `name` is a recorded `parameter` declaration.
    pub fn is_parameter(&self, name: &str) -> bool {
        self.declarations
            .get(name)
            .is_some_and(|d| d.kind == DeclKind::Parameter)
    }

    pub fn declarations(&self) -> &HashMap<&'t str, Declaration<'t>> {
        &self.declarations
    }

    pub fn classes(&self) -> &BTreeMap<&'t str, ClassInfo<'t>> {
        &self.classes
    }

    pub fn index(&self) -> &AstIndex<'t> {
        &self.index
    }

    pub fn file_path(&self) -> &'t str {
        self.file_path
    }
}

/// A `By.*` constructor call: qualifier `By`, non-empty member.
pub fn is_locator_invocation(node: &AstNode) -> bool {
    node.kind == NodeKind::MethodInvocation
        && node.qualifier() == Some("By")
        && node.member().is_some_and(|m| !m.is_empty())
}

/// The declarator's initializer: the first `MethodInvocation` or `Literal`
/// directly under it, falling back to the first `By.*` call in its subtree.
pub(crate) fn find_initializer(declarator: &AstNode) -> Option<&AstNode> {
    for child in &declarator.children {
        if matches!(child.kind, NodeKind::MethodInvocation | NodeKind::Literal) {
            return Some(child);
        }
    }
    declarator
        .walk()
        .skip(1)
        .find(|node| is_locator_invocation(node))
}

/// Name-pattern inference (b): strip a known prefix, lowercase the stem's
/// first char, append the table suffix, and validate against declared fields.
fn infer_by_name_pattern(
    method_name: &str,
    fields: &BTreeMap<&str, &AstNode>,
) -> Option<String> {
    for (prefixes, suffix) in NAME_PATTERNS {
        for prefix in *prefixes {
            if let Some(stem) = strip_camel_prefix(method_name, prefix) {
                let candidate = format!("{}{}", lower_first(&stem), suffix);
                if fields.contains_key(candidate.as_str()) {
                    return Some(candidate);
                }
            }
        }
    }
    for prefix in GETTER_PREFIXES {
        if let Some(stem) = strip_camel_prefix(method_name, prefix) {
            let labeled = format!("{}Label", lower_first(&stem));
            if fields.contains_key(labeled.as_str()) {
                return Some(labeled);
            }
            let verbatim = lower_first(&stem);
            if fields.contains_key(verbatim.as_str()) {
                return Some(verbatim);
            }
        }
    }
    None
}

/// Strip `prefix` only at a camelCase boundary (`enterEmail` → `Email`,
/// but `settings` does not match prefix `set`).
fn strip_camel_prefix(name: &str, prefix: &str) -> Option<String> {
    let rest = name.strip_prefix(prefix)?;
    let first = rest.chars().next()?;
    if first.is_uppercase() || first == '_' {
        Some(rest.trim_start_matches('_').to_string())
    } else {
        None
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The type name a declarator was declared with: a `type` attr, a
/// `ReferenceType` child of the declarator, or one on the parent declaration.
fn declared_type_name(declarator: &AstNode) -> Option<&str> {
    if let Some(t) = declarator.attr_str("type") {
        return Some(t);
    }
    declarator
        .walk()
        .find(|n| n.kind == NodeKind::ReferenceType)
        .and_then(|n| n.name.as_deref().or(n.attr_str("name")))
}
