//! CLI behavior tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn tallyt() -> Command {
    Command::cargo_bin("tallyt").unwrap()
}

fn write_doc(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "{contents}").unwrap();
    path
}

#[test]
fn eval_prints_results() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "2 + 2\n5 km + 200 m to m\n");
    tallyt()
        .arg("eval")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("4"))
        .stdout(predicate::str::contains("5 200 m"));
}

#[test]
fn eval_reads_stdin() {
    tallyt()
        .arg("eval")
        .arg("-")
        .write_stdin("100 °F to °C\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("37.7778 °C"));
}

#[test]
fn eval_numbered_output() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "2 + 2\n");
    tallyt()
        .arg("eval")
        .arg("-n")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 │ 4"));
}

#[test]
fn eval_with_rates_file() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "10 EUR to USD\n");
    let rates = write_doc(&dir, "rates.json", r#"{ "EUR": { "USD": 1.25 } }"#);
    tallyt()
        .arg("eval")
        .arg(&doc)
        .arg("--rates")
        .arg(&rates)
        .assert()
        .success()
        .stdout(predicate::str::contains("12.50 USD"));
}

#[test]
fn eval_reports_problem_summary() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "1 / 0\n");
    tallyt()
        .arg("eval")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: division by zero"))
        .stderr(predicate::str::contains("1 runtime"));
}

#[test]
fn check_passes_clean_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "x = 2\nx * 3\n");
    tallyt()
        .arg("check")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn check_fails_on_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "2 +\n");
    tallyt()
        .arg("check")
        .arg(&doc)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse"));
}

#[test]
fn missing_file_has_read_exit_code() {
    tallyt()
        .arg("eval")
        .arg("definitely-not-here.tally")
        .assert()
        .failure()
        .code(66);
}

#[test]
fn config_file_applies_settings() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_doc(&dir, "doc.tally", "2 + 2\n");
    let config = write_doc(&dir, "tallyt.toml", "[settings]\nprecision = 2\n");
    tallyt()
        .arg("--config")
        .arg(&config)
        .arg("eval")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("4.00"));
}
