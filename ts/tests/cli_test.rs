//! CLI tests for the todostore binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(temp: &TempDir) -> Command {
    let db_path = temp.path().join("todo.db");
    let mut cmd = Command::cargo_bin("todostore").expect("binary exists");
    cmd.arg("--db-path").arg(db_path);
    cmd
}

#[test]
fn test_init_creates_database() {
    let temp = TempDir::new().unwrap();

    cmd(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized database"));

    assert!(temp.path().join("todo.db").exists());
}

#[test]
fn test_add_and_list() {
    let temp = TempDir::new().unwrap();

    cmd(&temp)
        .args(["add", "u1", "buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"));

    cmd(&temp)
        .args(["list", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"));

    // Other users see nothing
    cmd(&temp)
        .args(["list", "u2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found"));
}

#[test]
fn test_complete_and_filter() {
    let temp = TempDir::new().unwrap();

    cmd(&temp).args(["add", "u1", "first"]).assert().success();
    cmd(&temp).args(["add", "u1", "second"]).assert().success();
    cmd(&temp).args(["complete", "u1", "1"]).assert().success();

    cmd(&temp)
        .args(["list", "u1", "--status", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first").and(predicate::str::contains("second").not()));

    cmd(&temp)
        .args(["list", "u1", "--status", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("second").and(predicate::str::contains("first").not()));
}

#[test]
fn test_delete_missing_task_fails() {
    let temp = TempDir::new().unwrap();

    cmd(&temp).arg("init").assert().success();

    cmd(&temp).args(["delete", "u1", "99"]).assert().failure();
}
