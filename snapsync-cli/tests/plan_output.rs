use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn snapsync_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("snapsync"));
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write");
}

#[test]
fn plan_prints_new_directory_script() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("out/a/x"), "1");
    fs::create_dir_all(root.path().join("snap")).unwrap();

    snapsync_cmd(root.path())
        .args(["plan", "--pair", "out=snap"])
        .assert()
        .success()
        .stdout("mkdir snap/a\ncp -f out/a/x snap/a/x\nsvn add --depth=empty snap/a snap/a/x\n");
}

#[test]
fn plan_up_to_date_prints_nothing() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("out/shared"), "same");
    write(&root.path().join("snap/shared"), "same");

    snapsync_cmd(root.path())
        .args(["plan", "--pair", "out=snap"])
        .assert()
        .success()
        .stdout("")
        .stderr(contains("up to date"));
}

#[test]
fn plan_conflict_commits_deletions_with_message() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("out/x"), "file now");
    write(&root.path().join("snap/x/inner"), "was a dir");

    snapsync_cmd(root.path())
        .args([
            "plan",
            "--pair",
            "out=snap",
            "--commit-message",
            "drop old layout",
        ])
        .assert()
        .success()
        .stdout(
            "rm snap/x/inner\n\
             rm -r snap/x\n\
             cp -f out/x snap/x\n\
             svn delete snap/x/inner snap/x\n\
             svn commit -m 'drop old layout' snap/x/inner snap/x\n\
             svn add --depth=empty snap/x\n",
        )
        .stderr(contains("type change"));
}

#[test]
fn plan_reads_snapsync_yaml_from_working_directory() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("build/doc/index.html"), "doc");
    write(
        &root.path().join("snapsync.yaml"),
        "pairs:\n  - source: build/doc\n    destination: published/doc\n",
    );

    let output = snapsync_cmd(root.path())
        .args(["plan", "--json"])
        .output()
        .expect("run snapsync plan --json");
    assert!(
        output.status.success(),
        "command failed: status={} stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr),
    );

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let commands = doc["commands"].as_array().expect("commands array");
    assert_eq!(commands[0]["kind"], "mkdir");
    assert_eq!(commands[1]["kind"], "copy");
    assert_eq!(commands[2]["kind"], "vcs_add");
    let line = commands[1]["line"].as_str().expect("line");
    assert!(line.starts_with("cp -f "), "got: {line}");
    assert!(line.ends_with("published/doc/index.html"), "got: {line}");
    assert_eq!(doc["report"]["conflict"], false);
    assert_eq!(doc["report"]["commands"], 3);
}

#[test]
fn plan_with_missing_config_fails() {
    let root = TempDir::new().unwrap();

    snapsync_cmd(root.path())
        .args(["plan", "--config", "nope.yaml"])
        .assert()
        .failure()
        .stderr(contains("config not found"));
}

#[test]
fn plan_rejects_malformed_pair() {
    let root = TempDir::new().unwrap();

    snapsync_cmd(root.path())
        .args(["plan", "--pair", "just-one-side"])
        .assert()
        .failure()
        .stderr(contains("expected SRC=DST"));
}

#[test]
fn verbose_logging_stays_off_stdout() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("out/f"), "1");
    fs::create_dir_all(root.path().join("snap")).unwrap();

    snapsync_cmd(root.path())
        .args(["-v", "plan", "--pair", "out=snap"])
        .assert()
        .success()
        .stdout("cp -f out/f snap/f\nsvn add --depth=empty snap/f\n")
        .stderr(contains("reconciling").and(contains("snap/f")));
}

#[test]
fn plan_does_not_touch_either_tree() {
    let root = TempDir::new().unwrap();
    write(&root.path().join("out/new"), "1");
    write(&root.path().join("snap/old"), "2");

    snapsync_cmd(root.path())
        .args(["plan", "--pair", "out=snap"])
        .assert()
        .success();

    assert!(!root.path().join("snap/new").exists(), "plan must not copy");
    assert!(root.path().join("snap/old").exists(), "plan must not delete");
}
