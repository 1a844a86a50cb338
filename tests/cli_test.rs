//! CLI contract tests
//!
//! Runs the built binary against temporary bundle and report files and
//! checks exit codes and the JSON written to stdout or --output.

use std::path::Path;
use std::process::Command;

fn meiliscan_bin() -> String {
    env!("CARGO_BIN_EXE_meiliscan").to_string()
}

const BUNDLE: &str = r#"{
  "source": { "type": "instance", "url": "http://localhost:7700" },
  "instance": { "version": "1.12.0" },
  "indexes": [
    {
      "uid": "movies",
      "primaryKey": "id",
      "stats": { "numberOfDocuments": 3, "fieldDistribution": { "id": 3, "title": 3 } },
      "sampleDocuments": [
        { "id": 1, "title": "Heat" },
        { "id": 2, "title": "Ronin" },
        { "id": 3, "title": "Thief" }
      ]
    }
  ]
}"#;

fn write_bundle(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("snapshot.json");
    std::fs::write(&path, BUNDLE).unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(meiliscan_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run meiliscan");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn test_analyze_prints_report_json() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(dir.path());
    let (code, stdout, _) = run(dir.path(), &["analyze", bundle.to_str().unwrap()]);
    assert_eq!(code, 0);

    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report JSON");
    assert_eq!(report["version"], "1.0.0");
    assert_eq!(report["summary"]["total_indexes"], 1);
    let findings = report["indexes"]["movies"]["findings"].as_array().unwrap();
    assert!(findings.iter().any(|f| f["id"] == "MEILI-S001"));
}

#[test]
fn test_fail_on_critical() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(dir.path());
    let (code, _, stderr) = run(
        dir.path(),
        &["analyze", bundle.to_str().unwrap(), "--fail-on", "critical"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("--fail-on=critical"));
}

#[test]
fn test_missing_bundle_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(dir.path(), &["analyze", "nope.json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("nope.json"));
}

#[test]
fn test_policy_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(dir.path());
    std::fs::write(
        dir.path().join("meiliscan.toml"),
        "[scoring]\ncritical = 50\n",
    )
    .unwrap();
    let (code, stdout, _) = run(dir.path(), &["analyze", bundle.to_str().unwrap()]);
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(report["summary"]["health_score"].as_u64().unwrap() <= 50);
}

#[test]
fn test_analyze_then_compare() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(dir.path());
    let old = dir.path().join("old.json");
    let new = dir.path().join("new.json");

    for out in [&old, &new] {
        let (code, stdout, _) = run(
            dir.path(),
            &["analyze", bundle.to_str().unwrap(), "--compact", "-o", out.to_str().unwrap()],
        );
        assert_eq!(code, 0);
        assert!(stdout.trim().is_empty());
    }

    let (code, stdout, _) = run(
        dir.path(),
        &["compare", old.to_str().unwrap(), new.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    let comparison: serde_json::Value = serde_json::from_str(&stdout).expect("comparison JSON");
    assert_eq!(comparison["summary"]["overall_trend"], "stable");
    assert_eq!(comparison["finding_changes"].as_array().unwrap().len(), 0);
    assert_eq!(comparison["index_changes"]["movies"]["change_type"], "unchanged");
}

#[test]
fn test_compare_rejects_report_without_summary() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(
        &broken,
        r#"{"version": "1.0.0", "generated_at": "2024-01-01T00:00:00Z", "source": {"type": "dump"}}"#,
    )
    .unwrap();
    let path = broken.to_str().unwrap();
    let (code, _, stderr) = run(dir.path(), &["compare", path, path]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid report"));
}

#[test]
fn test_workers_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(dir.path());
    let (code, _, _) = run(
        dir.path(),
        &["--workers", "0", "analyze", bundle.to_str().unwrap()],
    );
    assert_eq!(code, 2);
}
