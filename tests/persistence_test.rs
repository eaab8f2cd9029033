#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run(db_path: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(cargo_bin!("procmap"));
    cmd.args(["--seed", "tests/fixtures/seed.json", "--db-path"])
        .arg(db_path)
        .args(args);
    cmd.output().expect("Failed to execute command")
}

#[test]
fn test_rocksdb_override_survives_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: drop Documents for Nursing
    let output = run(
        &db_path,
        &["edit", "--application-type", "1", "--profession", "10", "--remove", "2"],
    );
    assert!(output.status.success());

    // 2. Second run: the override is read back from disk
    let output = run(
        &db_path,
        &["resolve", "--application-type", "1", "--profession", "10"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1,1,Eligibility"));
    assert!(stdout.contains("2,3,Payment"));
    assert!(!stdout.contains("Documents"));

    let output = run(&db_path, &["overrides", "--application-type", "1"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("10,Nursing"));

    // 3. Reset, then Nursing follows the default again
    let output = run(
        &db_path,
        &["reset", "--application-type", "1", "--profession", "10"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2,2,Documents"));
}

#[test]
fn test_rocksdb_edited_default_is_not_reseeded() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let output = run(
        &db_path,
        &["edit", "--application-type", "2", "--order", "3,1"],
    );
    assert!(output.status.success());

    let output = run(&db_path, &["resolve", "--application-type", "2"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1,3,Payment"));
    assert!(stdout.contains("2,1,Eligibility"));
}
