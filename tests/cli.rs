use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn designsync() -> Command {
    let mut cmd = Command::cargo_bin("designsync").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("DESIGNSYNC_CONFIG");
    cmd
}

#[test]
fn runs() {
    designsync().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = designsync();
    cmd.arg("-V");
    cmd.assert().success().stdout("designsync 0.1.0\n");
}

// Canonicalize subcommand tests

#[test]
fn canonicalize_to_stdout() {
    let mut cmd = designsync();
    cmd.args([
        "canonicalize",
        "tests/fixtures/landing.raw.json",
        "--generated-at",
        "2026-01-01T00:00:00Z",
        "--entry-file",
        "src/Landing.tsx",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Landing/SiteHeader\""))
        .stdout(predicate::str::contains("\"generatedAt\": \"2026-01-01T00:00:00Z\""))
        .stdout(predicate::str::contains("\"nodeCount\": 5"));
}

#[test]
fn canonicalize_writes_document_and_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snapshot.ir.json");
    let mapping = dir.path().join("mapping.json");

    let mut cmd = designsync();
    cmd.arg("canonicalize")
        .arg("tests/fixtures/landing.raw.json")
        .arg("-o")
        .arg(&out)
        .arg("--mapping-out")
        .arg(&mapping)
        .args(["--framework", "react", "--entry-file", "src/Landing.tsx"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Canonicalized 5 node(s)"));

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(doc["source"]["framework"], "react");
    assert_eq!(doc["tree"]["name"], "Landing");
    assert!(!doc["source"]["generatedAt"].as_str().unwrap().is_empty());

    let table: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&mapping).unwrap()).unwrap();
    assert_eq!(
        table["Landing/SiteHeader"]["selector"],
        "header.site-header.px-4"
    );
    assert_eq!(table["Landing/SiteHeader"]["sourceFile"], "src/Landing.tsx");
}

#[test]
fn canonicalize_without_flatten_keeps_wrapper() {
    let mut cmd = designsync();
    cmd.args([
        "canonicalize",
        "tests/fixtures/landing.raw.json",
        "--no-flatten",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"nodeCount\": 6"))
        .stdout(predicate::str::contains("\"name\": \"Landing/div/Image\""));
}

#[test]
fn canonicalize_reads_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("designsync.yaml");
    fs::write(&config, "naming:\n  separator: \"::\"\nsource:\n  styleStrategy: css-modules\n")
        .unwrap();

    let mut cmd = designsync();
    cmd.arg("canonicalize")
        .arg("tests/fixtures/landing.raw.json")
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Landing::HeroTitle\""))
        .stdout(predicate::str::contains("\"styleStrategy\": \"css-modules\""));
}

#[test]
fn canonicalize_bad_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("designsync.json");
    fs::write(&config, "{ not json").unwrap();

    let mut cmd = designsync();
    cmd.arg("canonicalize")
        .arg("tests/fixtures/landing.raw.json")
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn canonicalize_nonexistent_file_fails() {
    let mut cmd = designsync();
    cmd.args(["canonicalize", "nonexistent_file.json"]);
    cmd.assert().failure().stderr(predicate::str::contains("Error:"));
}

// Reverse subcommand tests

#[test]
fn reverse_design_document() {
    let mut cmd = designsync();
    cmd.args(["reverse", "tests/fixtures/landing.design.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Promo\""))
        .stdout(predicate::str::contains("\"_layoutWarning\": \"NO_AUTO_LAYOUT\""))
        .stdout(predicate::str::contains("src/Landing.tsx"))
        .stdout(predicate::str::contains("Hidden").not());
}

#[test]
fn reverse_with_other_namespace_drops_locators() {
    let mut cmd = designsync();
    cmd.args([
        "reverse",
        "tests/fixtures/landing.design.json",
        "--namespace",
        "other-plugin",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("src/Landing.tsx").not());
}

// Diff subcommand tests

fn snapshot_and_pull(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let snapshot = dir.join("snapshot.ir.json");
    let pulled = dir.join("pulled.ir.json");
    designsync()
        .arg("canonicalize")
        .arg("tests/fixtures/landing.raw.json")
        .arg("-o")
        .arg(&snapshot)
        .args(["--entry-file", "src/Landing.tsx"])
        .assert()
        .success();
    designsync()
        .arg("reverse")
        .arg("tests/fixtures/landing.design.json")
        .arg("-o")
        .arg(&pulled)
        .assert()
        .success();
    (snapshot, pulled)
}

#[test]
fn diff_identical_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let (snapshot, _) = snapshot_and_pull(dir.path());

    let mut cmd = designsync();
    cmd.arg("diff").arg(&snapshot).arg(&snapshot);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No changes."));
}

#[test]
fn diff_text_report_and_patch_plan() {
    let dir = tempfile::tempdir().unwrap();
    let (snapshot, pulled) = snapshot_and_pull(dir.path());

    let mut cmd = designsync();
    cmd.arg("diff").arg(&snapshot).arg(&pulled);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CHANGED: Landing/SiteHeader"))
        .stdout(predicate::str::contains(
            "styles.backgroundColor: rgba(255, 0, 0, 1) -> rgba(0, 0, 255, 1)",
        ))
        .stdout(predicate::str::contains("NEW: Landing/Promo"))
        .stdout(predicate::str::contains("Layout integrity warnings: 1"))
        .stdout(predicate::str::contains("Patch targets:"))
        .stdout(predicate::str::contains("selector: header.site-header.px-4"));
}

#[test]
fn diff_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let (snapshot, pulled) = snapshot_and_pull(dir.path());

    let output = designsync()
        .arg("diff")
        .arg(&snapshot)
        .arg(&pulled)
        .args(["--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let changes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(changes["Landing/Promo"]["status"], "added");
    assert_eq!(
        changes["Landing/SiteHeader"]["layout.integrity"]["after"],
        "NO_AUTO_LAYOUT"
    );
}

#[test]
fn diff_strict_fails_on_layout_integrity() {
    let dir = tempfile::tempdir().unwrap();
    let (snapshot, pulled) = snapshot_and_pull(dir.path());

    let mut cmd = designsync();
    cmd.arg("diff").arg(&snapshot).arg(&pulled).arg("--strict");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Layout integrity check failed"));
}

#[test]
fn diff_rejects_unknown_output_format() {
    let dir = tempfile::tempdir().unwrap();
    let (snapshot, pulled) = snapshot_and_pull(dir.path());

    let mut cmd = designsync();
    cmd.arg("diff")
        .arg(&snapshot)
        .arg(&pulled)
        .args(["--output", "xml"]);
    cmd.assert().failure();
}

#[test]
fn diff_invalid_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "[1, 2").unwrap();

    let mut cmd = designsync();
    cmd.arg("diff").arg(&broken).arg(&broken);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse IR JSON"));
}

// Preview subcommand tests

#[test]
fn preview_raw_extraction() {
    let mut cmd = designsync();
    cmd.args(["preview", "tests/fixtures/landing.raw.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("├─ Landing  [AUTO_LAYOUT]  <main>"))
        .stdout(predicate::str::contains("    ├─ Logo  [TEXT]  <span>"));
}

#[test]
fn preview_ir_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (_, pulled) = snapshot_and_pull(dir.path());

    let mut cmd = designsync();
    cmd.arg("preview").arg(&pulled);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("├─ Promo  [RECTANGLE]"));
}
