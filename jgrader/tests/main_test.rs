use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const EXECUTABLE_NAME: &str = "jgrader";

#[test]
fn should_print_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "print('a')").unwrap();

    let mut cmd = Command::cargo_bin(EXECUTABLE_NAME).unwrap();
    cmd.args(["--logging-mode", "silent", "check-files", "--base"])
        .arg(dir.path())
        .args(["a.py", "b.py"]);

    cmd.assert().failure().code(1).stdout("b.py\n");
}

#[test]
fn should_succeed_when_every_file_is_present() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("main.rs"), "fn main() {}").unwrap();

    let mut cmd = Command::cargo_bin(EXECUTABLE_NAME).unwrap();
    cmd.arg("check-files")
        .arg("--base")
        .arg(dir.path())
        .arg("src/main.rs");

    cmd.assert().success().stdout("");
}

#[test]
fn should_require_at_least_one_path() {
    let mut cmd = Command::cargo_bin(EXECUTABLE_NAME).unwrap();
    cmd.arg("check-files");

    cmd.assert().failure().stderr(predicate::str::contains("PATHS"));
}

#[test]
fn should_summarize_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("results.json");
    fs::write(
        &report,
        r#"{
    "tests": [
        {"name": "test_add", "score": 2.0, "max_score": 2.0},
        {"name": "test_div", "score": 0.0, "max_score": 3.0, "visibility": "hidden",
         "output": "Test Failed: AssertionError: 3 != 4\n"}
    ],
    "leaderboard": [{"name": "high_score", "value": 42, "order": null}],
    "execution_time": "0.12",
    "score": 2.0,
    "visibility": "visible"
}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin(EXECUTABLE_NAME).unwrap();
    cmd.arg("summary").arg(&report);

    cmd.assert().success().stdout(
        "test_add: 2/2\ntest_div: 0/3 [hidden]\nleaderboard high_score: 42\nTotal: 2/5 in 0.12s\n",
    );
}

#[test]
fn should_reject_malformed_report() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("results.json");
    fs::write(&report, r#"{"tests": "not a list"}"#).unwrap();

    let mut cmd = Command::cargo_bin(EXECUTABLE_NAME).unwrap();
    cmd.arg("summary").arg(&report);

    cmd.assert().failure();
}
