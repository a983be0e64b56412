//! Binary smoke tests

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

fn repograph(cwd: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("repograph").unwrap();
    cmd.current_dir(cwd)
        .env_remove("REPO_ROOT")
        .env_remove("NEO4J_URI")
        .env_remove("NEO4J_USERNAME")
        .env_remove("NEO4J_USER")
        .env_remove("NEO4J_PASSWORD")
        .env_remove("NEO4J_DATABASE")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("c.js"), "import d from './d';\nd();\n").unwrap();
    fs::write(repo.join("d.js"), "export function d() { helper(); }\n").unwrap();
    dir
}

#[test]
fn dry_run_exports_graph() {
    let dir = fixture();
    let out = dir.path().join("graph.json");

    let output = repograph(dir.path())
        .args(["ingest", "--dry-run", "--json", "--export"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["files_processed"], 2);
    assert_eq!(summary["files_failed"], 0);
    assert_eq!(summary["graph"]["imports"], 1);

    let graph: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert!(graph["relationships"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["type"] == "IMPORTS"));
}

#[test]
fn config_file_sets_root() {
    let dir = fixture();
    fs::rename(dir.path().join("repo"), dir.path().join("src-tree")).unwrap();
    fs::write(
        dir.path().join("repograph.toml"),
        "[source]\nroot = \"src-tree\"\n",
    )
    .unwrap();

    repograph(dir.path())
        .args(["ingest", "--dry-run", "--json"])
        .assert()
        .success();
}

#[test]
fn missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let output = repograph(dir.path())
        .args(["ingest", "--dry-run", "--root", "does-not-exist"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn extract_prints_facts() {
    let dir = fixture();
    let output = repograph(dir.path())
        .args(["extract", "repo/d.js"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let facts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(facts["name"], "d.js");
    assert_eq!(facts["functions"][0]["name"], "d");
    assert_eq!(facts["calls"][0]["caller"], "d");
    assert_eq!(facts["calls"][0]["callee"], "helper");
}
