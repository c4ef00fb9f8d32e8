//! Stage F: normalize raw records into typed IR and resolve symbolic
//! references.
//!
//! Construction order is load-bearing:
//! 1. project from config;
//! 2. targets normalized across all files, deduplicated by (page, name),
//!    with deterministic ids hashed over the full identity tuple;
//! 3. the name→id map;
//! 4. suites and data sets;
//! 5. tests, with every step's `targetId` resolved through the map.
//!
//! An unresolvable target name is a warning (the step keeps a null id); an
//! unknown suite or data set is fatal; a hash collision between distinct
//! targets is fatal.

use crate::config::model::PipelineConfig;
use crate::core::diagnostics::{Diagnostics, WarningKind};
use crate::core::ids;
use crate::errors::{Error, Result};
use crate::extract::FileExtraction;
use crate::ir::bundle::IrBundle;
use crate::ir::data::TestDataIR;
use crate::ir::environment::EnvironmentIR;
use crate::ir::project::ProjectIR;
use crate::ir::suite::SuiteIR;
use crate::ir::targets::{
    humanize, role_for_name, SelectorStrategy, TargetContext, TargetIR, TargetSemantic,
};
use crate::ir::test::{AssertionIR, DataBinding, StepIR, StepInput, StepTarget, TestIR};
use crate::model::records::{DataSource, RawStep, RawTarget, SourceKind, StepType};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

pub fn build_bundle(
    config: &PipelineConfig,
    extractions: &[FileExtraction],
    mut diags: Diagnostics,
    created_on: DateTime<Utc>,
) -> Result<IrBundle> {
    config.validate()?;

    // 1) project
    let project = ProjectIR::from_config(config, created_on);

    // 2) targets, deduplicated by (page, name) and sorted by the same key
    let (targets, name_to_id) = build_targets(extractions, &mut diags)?;

    // 3) suites (merged across files) and data sets
    let (suites, suite_ids) = build_suites(extractions);
    let data: Vec<TestDataIR> = config.data_sets.iter().map(TestDataIR::from_config).collect();
    let data_ids: HashMap<&str, &str> = data
        .iter()
        .map(|d| (d.name.as_str(), d.data_set_id.as_str()))
        .collect();

    // 4) tests, linking steps through the name→id map
    let mut tests = Vec::new();
    for raw_test in extractions.iter().flat_map(|e| e.tests.iter()) {
        let test = build_test(
            raw_test,
            &suite_ids,
            &data_ids,
            &name_to_id,
            &targets,
            &mut diags,
        )?;
        tests.push(test);
    }

    // 5) environment
    let environment = EnvironmentIR::from_config(&config.environments);

    info!(
        "build: bundle for `{}` targets={} suites={} tests={} warnings={}",
        project.project_name,
        targets.len(),
        suites.len(),
        tests.len(),
        diags.len()
    );
    Ok(IrBundle {
        project,
        environment,
        targets,
        suites,
        tests,
        data,
        diagnostics: diags,
    })
}

/// Normalize raw targets into `TargetIR`s plus the project-wide name→id map.
fn build_targets(
    extractions: &[FileExtraction],
    diags: &mut Diagnostics,
) -> Result<(Vec<TargetIR>, BTreeMap<String, String>)> {
    // Dedupe by (page, name); BTreeMap doubles as the deterministic sort.
    let mut deduped: BTreeMap<(String, String), RawTarget> = BTreeMap::new();
    for raw in extractions.iter().flat_map(|e| e.targets.iter()) {
        deduped
            .entry((raw.page.clone(), raw.name.clone()))
            .or_insert_with(|| raw.clone());
    }

    let mut targets = Vec::with_capacity(deduped.len());
    let mut name_to_id: BTreeMap<String, String> = BTreeMap::new();
    let mut id_owners: HashMap<String, String> = HashMap::new();

    for ((page, name), raw) in &deduped {
        let target_id = ids::target_id(page, name, raw.strategy, &raw.locator_value);
        let identity = format!("{page}|{name}|{}|{}", raw.strategy, raw.locator_value);

        if let Some(existing) = id_owners.get(&target_id) {
            if existing != &identity {
                return Err(Error::IdCollision {
                    id: target_id,
                    first: existing.clone(),
                    second: identity,
                });
            }
        }
        id_owners.insert(target_id.clone(), identity);

        match name_to_id.entry(name.clone()) {
            std::collections::btree_map::Entry::Vacant(entry) => {
                entry.insert(target_id.clone());
            }
            std::collections::btree_map::Entry::Occupied(_) => {
                diags.push(
                    WarningKind::AmbiguousTargetName,
                    None,
                    format!("target name `{name}` appears on multiple pages; first occurrence wins"),
                );
            }
        }

        debug!("build: target {}#{} -> {}", page, name, target_id);
        targets.push(TargetIR {
            target_id,
            target_type: "element".into(),
            context: TargetContext {
                page: page.clone(),
                component: None,
                frame: None,
            },
            semantic: TargetSemantic {
                role: role_for_name(name).into(),
                business_name: humanize(name),
            },
            selector_strategies: vec![SelectorStrategy {
                strategy: raw.strategy,
                value: raw.locator_value.clone(),
                stability_score: raw.strategy.default_stability(),
            }],
            preferred_strategy: raw.strategy,
        });
    }

    Ok((targets, name_to_id))
}

/// Merge raw suites by name across files and assign deterministic ids.
/// Suite membership is stored as test ids.
fn build_suites(extractions: &[FileExtraction]) -> (Vec<SuiteIR>, HashMap<String, String>) {
    let mut merged: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for raw in extractions.iter().flat_map(|e| e.suites.iter()) {
        let tests = merged.entry(raw.name.clone()).or_default();
        for test_name in &raw.tests {
            let test_id = ids::document_id("test", &format!("{}.{}", raw.name, test_name));
            if !tests.contains(&test_id) {
                tests.push(test_id);
            }
        }
    }

    let mut suites = Vec::with_capacity(merged.len());
    let mut suite_ids = HashMap::new();
    for (name, tests) in merged {
        let suite_id = ids::document_id("suite", &name);
        suite_ids.insert(name.clone(), suite_id.clone());
        suites.push(SuiteIR {
            suite_id,
            name,
            description: None,
            tests,
        });
    }
    (suites, suite_ids)
}

fn build_test(
    raw_test: &crate::model::records::RawTest,
    suite_ids: &HashMap<String, String>,
    data_ids: &HashMap<&str, &str>,
    name_to_id: &BTreeMap<String, String>,
    targets: &[TargetIR],
    diags: &mut Diagnostics,
) -> Result<TestIR> {
    let suite_id = suite_ids
        .get(&raw_test.suite_hint)
        .ok_or_else(|| Error::Reference {
            kind: "suite",
            reference: raw_test.suite_hint.clone(),
            owner: raw_test.name.clone(),
        })?
        .clone();

    let data_binding = match raw_test.data_set.as_deref() {
        Some(ds_name) => {
            let data_set_id = data_ids.get(ds_name).ok_or_else(|| Error::Reference {
                kind: "data set",
                reference: ds_name.to_string(),
                owner: raw_test.name.clone(),
            })?;
            Some(DataBinding {
                data_set_id: data_set_id.to_string(),
                iteration_strategy: "perRow".into(),
            })
        }
        None => None,
    };

    let mut steps = Vec::new();
    let mut assertions = Vec::new();
    for raw_step in &raw_test.steps {
        match raw_step.step_type {
            StepType::Action => {
                let step = build_step(raw_step, steps.len() + 1, name_to_id, targets, diags);
                steps.push(step);
            }
            StepType::Assertion => {
                let assertion =
                    build_assertion(raw_step, assertions.len() + 1, name_to_id, diags);
                assertions.push(assertion);
            }
        }
    }

    Ok(TestIR {
        test_id: ids::document_id(
            "test",
            &format!("{}.{}", raw_test.suite_hint, raw_test.name),
        ),
        name: raw_test.name.clone(),
        suite_id,
        priority: "medium".into(),
        severity: "normal".into(),
        data_binding,
        steps,
        assertions,
        tags: raw_test.tags.clone(),
    })
}

fn build_step(
    raw: &RawStep,
    ordinal: usize,
    name_to_id: &BTreeMap<String, String>,
    targets: &[TargetIR],
    diags: &mut Diagnostics,
) -> StepIR {
    let target_id = resolve_target_id(raw.target_name_id.as_deref(), name_to_id, diags);

    let resolved = target_id
        .as_deref()
        .and_then(|id| targets.iter().find(|t| t.target_id == id));

    let mut target = None;
    if raw.name == "navigate" {
        if let Some(Value::String(url)) = raw.parameters.get("value") {
            target = Some(StepTarget {
                url: Some(url.clone()),
                selector: None,
            });
        }
    } else if let Some(doc) = resolved {
        target = Some(StepTarget {
            url: None,
            selector: doc.preferred_selector().map(str::to_string),
        });
    }

    let input = raw.parameters.get("value").map(|_| StepInput {
        source: SourceKind::Constant,
        field: None,
        masked: resolved.is_some_and(|doc| {
            doc.semantic.business_name.to_lowercase().contains("password")
        }),
    });

    StepIR {
        step_id: ids::step_id(ordinal),
        action: raw.name.clone(),
        target_id,
        target,
        input,
        parameters: raw.parameters.clone(),
    }
}

fn build_assertion(
    raw: &RawStep,
    ordinal: usize,
    name_to_id: &BTreeMap<String, String>,
    diags: &mut Diagnostics,
) -> AssertionIR {
    let mut resolve = |source: Option<&DataSource>| -> DataSource {
        let Some(source) = source else {
            return DataSource::constant(Value::Null);
        };
        let mut resolved = source.clone();
        if resolved.target_id.is_none() {
            resolved.target_id =
                resolve_target_id(resolved.target_name_id.as_deref(), name_to_id, diags);
        }
        resolved
    };

    AssertionIR {
        assert_id: ids::assert_id(ordinal),
        kind: raw.name.clone(),
        actual: resolve(raw.actual.as_ref()),
        expected: resolve(raw.expected.as_ref()),
    }
}

/// §4.H.5 lookup: explicit id wins, then the name→id map, else null with a
/// warning. Steps with no symbolic name stay silent (already warned upstream).
fn resolve_target_id(
    target_name_id: Option<&str>,
    name_to_id: &BTreeMap<String, String>,
    diags: &mut Diagnostics,
) -> Option<String> {
    let name = target_name_id?;
    match name_to_id.get(name) {
        Some(id) => Some(id.clone()),
        None => {
            diags.push(
                WarningKind::UnresolvedTargetName,
                None,
                format!("step target `{name}` is not in the target repository"),
            );
            None
        }
    }
}
