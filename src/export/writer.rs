//! Persistence layer: writes a validated bundle as the canonical file layout.
//!
//! ```text
//! <out>/project.json
//! <out>/environment.json
//! <out>/targets.json
//! <out>/suites/<suiteId>.json
//! <out>/tests/<testId>.json
//! <out>/data/<dataSetId>.json
//! ```
//!
//! Documents serialize through `serde_json::Value`, whose object map keeps
//! keys sorted, and every file ends with a trailing newline. The writer is
//! only ever handed a fully-validated bundle; it never partially writes one.

use crate::errors::Result;
use crate::ir::bundle::IrBundle;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Metadata about the written artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct WriteSummary {
    pub out_dir: String,
    pub files_written: usize,
}

pub fn write_bundle(bundle: &IrBundle, out_dir: &Path) -> Result<WriteSummary> {
    fs::create_dir_all(out_dir.join("suites"))?;
    fs::create_dir_all(out_dir.join("tests"))?;
    fs::create_dir_all(out_dir.join("data"))?;

    let mut files = 0usize;

    write_doc(&out_dir.join("project.json"), &bundle.project)?;
    files += 1;
    write_doc(&out_dir.join("environment.json"), &bundle.environment)?;
    files += 1;
    write_doc(&out_dir.join("targets.json"), &bundle.targets)?;
    files += 1;

    for suite in &bundle.suites {
        write_doc(
            &doc_path(out_dir, "suites", &suite.suite_id),
            suite,
        )?;
        files += 1;
    }
    for test in &bundle.tests {
        write_doc(&doc_path(out_dir, "tests", &test.test_id), test)?;
        files += 1;
    }
    for data in &bundle.data {
        write_doc(&doc_path(out_dir, "data", &data.data_set_id), data)?;
        files += 1;
    }

    info!("writer: {} files -> {}", files, out_dir.display());
    Ok(WriteSummary {
        out_dir: out_dir.to_string_lossy().into_owned(),
        files_written: files,
    })
}

fn doc_path(out_dir: &Path, subdir: &str, id: &str) -> PathBuf {
    out_dir.join(subdir).join(format!("{id}.json"))
}

/// Serialize with sorted keys and a trailing newline.
fn write_doc<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    // Round-trip through Value: serde_json's object map is key-sorted.
    let value = serde_json::to_value(doc)?;
    let mut f = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut f, &value)?;
    f.write_all(b"\n")?;
    f.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{DataSetConfig, PipelineConfig};
    use crate::core::diagnostics::Diagnostics;
    use crate::extract::FileExtraction;
    use crate::ir::build::build_bundle;
    use crate::model::records::{RawSuite, RawTest};
    use chrono::{DateTime, Utc};

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sample_bundle() -> IrBundle {
        let extraction = FileExtraction {
            targets: vec![],
            page_objects: vec![],
            tests: vec![RawTest {
                name: "testLogin".into(),
                suite_hint: "LoginTest".into(),
                steps: vec![],
                tags: vec![],
                data_set: Some("users".into()),
            }],
            suites: vec![RawSuite {
                name: "LoginTest".into(),
                description: None,
                tests: vec!["testLogin".into()],
            }],
        };
        let config = PipelineConfig {
            project_name: "webshop".into(),
            data_sets: vec![DataSetConfig {
                name: "users".into(),
                data_type: "inline".into(),
                records: vec![],
            }],
            ..PipelineConfig::default()
        };
        build_bundle(&config, &[extraction], Diagnostics::new(), fixed_now()).unwrap()
    }

    #[test]
    fn writes_the_canonical_layout() {
        let bundle = sample_bundle();
        let dir = tempfile::tempdir().unwrap();
        let summary = write_bundle(&bundle, dir.path()).unwrap();

        assert_eq!(summary.files_written, 6);
        assert!(dir.path().join("project.json").exists());
        assert!(dir.path().join("environment.json").exists());
        assert!(dir.path().join("targets.json").exists());
        let suite_path = dir
            .path()
            .join("suites")
            .join(format!("{}.json", bundle.suites[0].suite_id));
        assert!(suite_path.exists());
        let test_path = dir
            .path()
            .join("tests")
            .join(format!("{}.json", bundle.tests[0].test_id));
        assert!(test_path.exists());
    }

    #[test]
    fn output_ends_with_newline_and_sorted_keys() {
        let bundle = sample_bundle();
        let dir = tempfile::tempdir().unwrap();
        write_bundle(&bundle, dir.path()).unwrap();

        let text = fs::read_to_string(dir.path().join("project.json")).unwrap();
        assert!(text.ends_with('\n'));

        let keys: Vec<&str> = text
            .lines()
            .filter_map(|l| l.trim().strip_prefix('"'))
            .filter_map(|l| l.split('"').next())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn reparse_and_reserialize_is_byte_identical() {
        let bundle = sample_bundle();
        let dir = tempfile::tempdir().unwrap();
        write_bundle(&bundle, dir.path()).unwrap();

        let path = dir.path().join("environment.json");
        let original = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&original).unwrap();
        let mut reserialized = serde_json::to_string_pretty(&parsed).unwrap();
        reserialized.push('\n');
        assert_eq!(original, reserialized);
    }

    #[test]
    fn rewrite_is_byte_identical() {
        let bundle = sample_bundle();
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        write_bundle(&bundle, dir_a.path()).unwrap();
        write_bundle(&bundle, dir_b.path()).unwrap();

        let a = fs::read(dir_a.path().join("targets.json")).unwrap();
        let b = fs::read(dir_b.path().join("targets.json")).unwrap();
        assert_eq!(a, b);
    }
}
