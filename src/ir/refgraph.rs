//! Reference graph over a built bundle.
//!
//! Nodes are document ids (suites, tests, targets, data sets); edges are the
//! references between them. The validator uses it for closure (no dangling
//! reference) and acyclicity checks before anything is written.

use crate::ir::bundle::IrBundle;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// suite → test membership
    Declares,
    /// test → target usage (steps and assertion operands)
    Uses,
    /// test → data set binding
    Binds,
}

/// A reference whose destination id exists nowhere in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRef {
    pub owner: String,
    pub kind: &'static str,
    pub reference: String,
}

pub struct RefGraph {
    pub graph: DiGraph<String, RefKind>,
    pub missing: Vec<MissingRef>,
}

impl RefGraph {
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

pub fn build(bundle: &IrBundle) -> RefGraph {
    let mut graph: DiGraph<String, RefKind> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    let mut missing = Vec::new();

    for id in bundle
        .suites
        .iter()
        .map(|s| s.suite_id.as_str())
        .chain(bundle.tests.iter().map(|t| t.test_id.as_str()))
        .chain(bundle.targets.iter().map(|t| t.target_id.as_str()))
        .chain(bundle.data.iter().map(|d| d.data_set_id.as_str()))
    {
        let node = graph.add_node(id.to_string());
        index.insert(id, node);
    }

    for suite in &bundle.suites {
        for test_id in &suite.tests {
            link(
                &mut graph,
                &mut missing,
                &index,
                &suite.suite_id,
                RefKind::Declares,
                "test",
                test_id,
            );
        }
    }

    for test in &bundle.tests {
        if !index.contains_key(test.suite_id.as_str()) {
            missing.push(MissingRef {
                owner: test.test_id.clone(),
                kind: "suite",
                reference: test.suite_id.clone(),
            });
        }
        for step in &test.steps {
            if let Some(target_id) = step.target_id.as_deref() {
                link(
                    &mut graph,
                    &mut missing,
                    &index,
                    &test.test_id,
                    RefKind::Uses,
                    "target",
                    target_id,
                );
            }
        }
        for assertion in &test.assertions {
            for operand in [&assertion.actual, &assertion.expected] {
                if let Some(target_id) = operand.target_id.as_deref() {
                    link(
                        &mut graph,
                        &mut missing,
                        &index,
                        &test.test_id,
                        RefKind::Uses,
                        "target",
                        target_id,
                    );
                }
            }
        }
        if let Some(binding) = &test.data_binding {
            link(
                &mut graph,
                &mut missing,
                &index,
                &test.test_id,
                RefKind::Binds,
                "data set",
                &binding.data_set_id,
            );
        }
    }

    debug!(
        "refgraph: nodes={} edges={} missing={}",
        graph.node_count(),
        graph.edge_count(),
        missing.len()
    );
    RefGraph { graph, missing }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::PipelineConfig;
    use crate::core::diagnostics::Diagnostics;
    use crate::extract::FileExtraction;
    use crate::ir::build::build_bundle;
    use crate::model::records::{RawStep, RawSuite, RawTarget, RawTest, Strategy};
    use chrono::{DateTime, Utc};

    fn sample_bundle() -> IrBundle {
        let mut step = RawStep::action("click");
        step.target_name_id = Some("loginButton".into());
        let extraction = FileExtraction {
            targets: vec![RawTarget {
                name: "loginButton".into(),
                page: "LoginPage".into(),
                strategy: Strategy::Css,
                locator_value: "#login-btn".into(),
                node_id: "methodinvocation_1".into(),
            }],
            page_objects: vec![],
            tests: vec![RawTest {
                name: "testLogin".into(),
                suite_hint: "LoginTest".into(),
                steps: vec![step],
                tags: vec![],
                data_set: None,
            }],
            suites: vec![RawSuite {
                name: "LoginTest".into(),
                description: None,
                tests: vec!["testLogin".into()],
            }],
        };
        let config = PipelineConfig {
            project_name: "webshop".into(),
            ..PipelineConfig::default()
        };
        let now = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        build_bundle(&config, &[extraction], Diagnostics::new(), now).unwrap()
    }

    #[test]
    fn linked_bundle_has_closed_acyclic_graph() {
        let bundle = sample_bundle();
        let refs = build(&bundle);
        assert!(refs.missing.is_empty());
        assert!(!refs.has_cycle());
        // suite -> test declare edge plus test -> target use edge
        assert_eq!(refs.graph.edge_count(), 2);
    }

    #[test]
    fn dangling_target_is_reported() {
        let mut bundle = sample_bundle();
        bundle.tests[0].steps[0].target_id = Some("000000000000".into());
        let refs = build(&bundle);
        assert_eq!(refs.missing.len(), 1);
        assert_eq!(refs.missing[0].kind, "target");
    }
}

/// Add one edge, or record the dangling reference.
fn link(
    graph: &mut DiGraph<String, RefKind>,
    missing: &mut Vec<MissingRef>,
    index: &HashMap<&str, NodeIndex>,
    owner_id: &str,
    kind: RefKind,
    kind_name: &'static str,
    reference: &str,
) {
    match (index.get(owner_id), index.get(reference)) {
        (Some(&src), Some(&dst)) => {
            graph.add_edge(src, dst, kind);
        }
        _ => missing.push(MissingRef {
            owner: owner_id.to_string(),
            kind: kind_name,
            reference: reference.to_string(),
        }),
    }
}
