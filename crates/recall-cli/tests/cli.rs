//! End-to-end tests driving the `recall` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn recall(dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("recall").unwrap();
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

/// Pull the generated id out of the `add` output.
fn added_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    let rest = text.split("id: ").nth(1).unwrap();
    rest.chars().take_while(|c| c.is_ascii_digit()).collect()
}

#[test]
fn add_then_search_then_delete() {
    let dir = tempfile::tempdir().unwrap();

    let output = recall(&dir)
        .args(["add", "u1", "meeting at 3pm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory added"))
        .get_output()
        .stdout
        .clone();
    let id = added_id(&output);

    recall(&dir)
        .args(["search", "u1", "meeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("score: 1.00"))
        .stdout(predicate::str::contains("meeting at 3pm"));

    recall(&dir)
        .args(["delete", "u1", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory deleted"));

    recall(&dir)
        .args(["search", "u1", "meeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no matching memories"));
}

#[test]
fn update_replaces_content() {
    let dir = tempfile::tempdir().unwrap();

    let output = recall(&dir)
        .args(["add", "u1", "old plan"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let id = added_id(&output);

    recall(&dir)
        .args(["update", "u1", &id, "new plan", "--importance", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("memory updated"));

    recall(&dir)
        .args(["export", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("new plan"))
        .stdout(predicate::str::contains("importance: 5"));
}

#[test]
fn missing_id_reports_not_found() {
    let dir = tempfile::tempdir().unwrap();

    recall(&dir)
        .args(["update", "u1", "12345", "whatever"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no memory with id 12345"));

    recall(&dir)
        .args(["delete", "u1", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no memory with id 12345"));
}

#[test]
fn export_empty_and_filtered() {
    let dir = tempfile::tempdir().unwrap();

    recall(&dir)
        .args(["export", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no memories yet"));

    recall(&dir).args(["add", "u1", "buy milk"]).assert().success();
    recall(&dir)
        .args(["add", "u1", "water the plants"])
        .assert()
        .success();

    recall(&dir)
        .args(["export", "u1", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk"))
        .stdout(predicate::str::contains("water the plants").not());

    recall(&dir)
        .args(["export", "u1", "sunshine"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no memories matching 'sunshine'"));
}

#[test]
fn capacity_flag_bounds_collection() {
    let dir = tempfile::tempdir().unwrap();

    for i in 0..4 {
        recall(&dir)
            .args(["--max-memories", "2", "add", "u1", &format!("note {i}")])
            .assert()
            .success();
    }

    let output = recall(&dir)
        .args(["export", "u1"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    let records = text.lines().filter(|l| l.starts_with("ID: ")).count();
    assert_eq!(records, 2);
}
