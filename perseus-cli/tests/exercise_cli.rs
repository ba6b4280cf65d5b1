use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("demos")
        .join(name)
}

#[test]
fn list_widgets_via_cli() {
    let fixture = fixture_path("simplify-fraction.json");
    let mut cmd = cargo_bin_cmd!("perseus");
    cmd.arg(&fixture).arg("--output").arg("widgets");

    let output_pred = predicate::str::contains("input-number 1")
        .and(predicate::str::contains("radio 1"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn score_a_partially_answered_exercise_via_cli() {
    let fixture = fixture_path("simplify-fraction.json");
    let mut cmd = cargo_bin_cmd!("perseus");
    cmd.arg(&fixture)
        .arg("--input")
        .arg("input-number 1=5/6")
        .arg("--output")
        .arg("score");

    // The radio is untouched, so the aggregate cannot be graded yet.
    let output_pred = predicate::str::contains("\"guess\"")
        .and(predicate::str::contains("invalid"))
        .and(predicate::str::contains("radio 1"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn answering_an_unknown_widget_fails() {
    let fixture = fixture_path("simplify-fraction.json");
    let mut cmd = cargo_bin_cmd!("perseus");
    cmd.arg(&fixture).arg("--input").arg("dropdown 1=2");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No widget 'dropdown 1'"));
}

#[test]
fn unknown_output_mode_fails() {
    let fixture = fixture_path("simplify-fraction.json");
    let mut cmd = cargo_bin_cmd!("perseus");
    cmd.arg(&fixture).arg("--output").arg("bogus");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown output 'bogus'"));
}
