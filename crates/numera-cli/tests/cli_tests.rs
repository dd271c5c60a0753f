//! End-to-end tests for the `numera` binary.

mod common;

use common::{essay, json, record, OutputAssertions, TestContext};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_help_lists_commands() {
    let ctx = TestContext::new();
    ctx.command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("lint"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn test_validate_accepts_clean_record() {
    let ctx = TestContext::new();
    ctx.write_record("six.json", &record(6, 3, 3));

    let output = ctx.command().args(["validate", "six.json"]).output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("six.json: valid");
    output.assert_stdout_contains("1 of 1 record file(s) passed");
}

#[test]
fn test_validate_warnings_pass_unless_strict() {
    let ctx = TestContext::new();
    ctx.write_record("six.json", &record(6, 1, 50));

    let output = ctx.command().args(["validate", "six.json"]).output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("valid with warnings");
    output.assert_stdout_contains("batch_size declares 50");

    let output = ctx.command().args(["validate", "--strict", "six.json"]).output().unwrap();
    output.assert_exit_code(5);
    output.assert_stderr_contains("1 of 1 record file(s) failed validation");
}

#[test]
fn test_validate_rejects_invalid_and_unreadable_files() {
    let ctx = TestContext::new();
    ctx.write_record("thirteen.json", &record(13, 3, 3));
    ctx.write("broken.json", "{ not json");

    let output = ctx
        .command()
        .args(["validate", "thirteen.json", "broken.json", "missing.json"])
        .output()
        .unwrap();
    output.assert_exit_code(5);
    output.assert_stdout_contains("thirteen.json: invalid");
    output.assert_stdout_contains("not valid JSON");
    output.assert_stdout_contains("Failed to read");
    output.assert_stderr_contains("3 of 3 record file(s) failed validation");
}

#[test]
fn test_validate_accepts_extra_scalar_field() {
    let ctx = TestContext::new();
    let mut versioned = record(6, 3, 3);
    versioned["version"] = json!(2);
    ctx.write_record("six.json", &versioned);

    let output = ctx.command().args(["validate", "six.json"]).output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("six.json: valid with warnings");
    output.assert_stdout_contains("version: unrecognized field 'version' holds integer");
}

#[test]
fn test_validate_json_output() {
    let ctx = TestContext::new();
    let mut missing_theme = record(7, 2, 2);
    missing_theme["generation_info"]
        .as_object_mut()
        .unwrap()
        .remove("theme");
    ctx.write_record("seven.json", &missing_theme);

    let output = ctx
        .command()
        .args(["--format", "json", "validate", "seven.json"])
        .output()
        .unwrap();
    output.assert_exit_code(5);

    let report = json::parse_output(&output.stdout);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["files"][0]["status"], "invalid");
    assert_eq!(report["files"][0]["issues"][0]["kind"], "missing_field");
    assert_eq!(report["files"][0]["issues"][0]["field"], "generation_info.theme");

    let error = json::parse_output(&output.stderr);
    json::assert_error(&error, "E004");
}

#[test]
fn test_lint_reports_outline_findings() {
    let ctx = TestContext::new();
    ctx.write("six.md", &essay(6));
    ctx.write(
        "seven.md",
        "## Number 7\n\n### 1. Core Essence\nx\n### 2. Rituals\nx\n### 3. Archetype\nx\n",
    );

    let output = ctx.command().args(["lint", "six.md", "seven.md"]).output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("15 sections, 0 findings");
    output.assert_stdout_contains("section 'Archetype' should come before 'Rituals'");
    output.assert_stdout_contains("2 essay(s) linted, 0 failed");
}

#[test]
fn test_lint_fails_on_untitled_essay() {
    let ctx = TestContext::new();
    ctx.write("notes.md", "no heading here\n");

    let output = ctx.command().args(["lint", "notes.md"]).output().unwrap();
    output.assert_exit_code(5);
    output.assert_stdout_contains("Missing essay title");
}

#[test]
fn test_check_scans_default_content_root() {
    let ctx = TestContext::new();
    ctx.write_record("content/records/6.json", &record(6, 3, 3));
    ctx.write_record("content/records/7.json", &record(7, 1, 50));
    ctx.write("content/essays/6.md", &essay(6));

    let output = ctx.command().arg("check").output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("Records: 2 total, 1 valid, 1 with warnings, 0 invalid, 0 unreadable");
    output.assert_stdout_contains("Essays:  1 total, 1 clean");
    output.assert_stdout_contains("Accepted entries: 48");
    output.assert_stdout_contains("Incomplete: 1, 2, 3, 4, 5, 7, 8, 9, 11, 22, 33, 44");
}

#[test]
fn test_check_fails_on_invalid_record() {
    let ctx = TestContext::new();
    ctx.write_record("corpus/6.json", &record(6, 3, 3));
    ctx.write_record("corpus/13.json", &json!({"number": 13}));

    let output = ctx.command().args(["scan", "corpus"]).output().unwrap();
    output.assert_exit_code(5);
    output.assert_stdout_contains("13.json: invalid");
    output.assert_stderr_contains("1 of 2 record file(s) failed validation");
}

#[test]
fn test_check_json_counts() {
    let ctx = TestContext::new();
    ctx.write_record("corpus/22.json", &record(22, 3, 3));

    let output = ctx
        .command()
        .args(["--format", "json", "check", "corpus"])
        .output()
        .unwrap();
    output.assert_success();

    let report = json::parse_output(&output.stdout);
    assert_eq!(report["records_valid"], 1);
    assert_eq!(report["accepted_entries"], 36);
    assert_eq!(report["coverage"]["22"]["records"], 1);
}

#[test]
fn test_check_missing_directory() {
    let ctx = TestContext::new();
    let output = ctx.command().args(["check", "nowhere"]).output().unwrap();
    output.assert_exit_code(6);
    output.assert_stderr_contains("content directory not found");
}

#[test]
fn test_check_rejects_a_file_root() {
    let ctx = TestContext::new();
    ctx.write_record("six.json", &record(6, 3, 3));

    let output = ctx.command().args(["check", "six.json"]).output().unwrap();
    output.assert_exit_code(1);
    output.assert_stderr_contains("error[E010]: not a directory: six.json");
    output.assert_stderr_contains("hint: Use 'numera validate' or 'numera lint' for single files");
}

#[test]
fn test_content_root_from_environment() {
    let ctx = TestContext::new();
    ctx.write_record("elsewhere/6.json", &record(6, 3, 3));

    let output = ctx
        .command()
        .env("NUMERA_CONTENT_ROOT", ctx.path().join("elsewhere"))
        .arg("check")
        .output()
        .unwrap();
    output.assert_success();
    output.assert_stdout_contains("Records: 1 total, 1 valid");
}

#[test]
fn test_show_lists_entries() {
    let ctx = TestContext::new();
    ctx.write_record("content/6.json", &record(6, 2, 2));

    let output = ctx.command().args(["show", "6"]).output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("Themes: theme of 6");
    output.assert_stdout_contains("6 insight entry 1");

    let output = ctx
        .command()
        .args(["show", "6", "--category", "Physical Practice"])
        .output()
        .unwrap();
    output.assert_success();
    output.assert_stdout_contains("physical_practice (2)");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("insight"));
}

#[test]
fn test_show_skips_invalid_records() {
    let ctx = TestContext::new();
    let mut broken = record(9, 2, 2);
    broken["insight"] = json!([""]);
    ctx.write_record("content/9.json", &broken);
    ctx.write_record("content/6.json", &record(6, 2, 2));

    let output = ctx.command().args(["show", "9"]).output().unwrap();
    output.assert_exit_code(6);
    output.assert_stderr_contains("content for number not found: 9");
}

#[test]
fn test_show_rejects_disallowed_number() {
    let ctx = TestContext::new();
    std::fs::create_dir_all(ctx.path().join("content")).unwrap();

    let output = ctx.command().args(["show", "13"]).output().unwrap();
    output.assert_exit_code(1);
    output.assert_stderr_contains("13 is not an allowed number");
}

#[test]
fn test_config_prints_effective_yaml() {
    let ctx = TestContext::new().with_config("schema:\n  allowed_numbers: [1, 2, 3]\n");

    let output = ctx.command().arg("config").output().unwrap();
    output.assert_success();
    output.assert_stdout_contains("allowed_numbers");
    output.assert_stdout_contains("mental_wellness");

    let output = ctx.command().args(["config", "--path"]).output().unwrap();
    output.assert_success();
    output.assert_stdout_contains(".numera/config.yaml");
}

#[test]
fn test_config_path_json_reports_existence() {
    let ctx = TestContext::new();

    let output = ctx
        .command()
        .args(["--format", "json", "config", "--path"])
        .output()
        .unwrap();
    output.assert_success();
    let report = json::parse_output(&output.stdout);
    assert!(report["path"].as_str().unwrap().ends_with("config.yaml"));
    assert_eq!(report["exists"], false);

    let ctx = ctx.with_config("corpus:\n  root: numbers\n");
    let output = ctx
        .command()
        .args(["--format", "json", "config", "--path"])
        .output()
        .unwrap();
    assert_eq!(json::parse_output(&output.stdout)["exists"], true);

    let output = ctx
        .command()
        .args(["--config", "elsewhere.yaml", "config", "--path"])
        .output()
        .unwrap();
    output.assert_exit_code(2);
}

#[test]
fn test_config_restricts_allowed_numbers() {
    let ctx = TestContext::new().with_config("schema:\n  allowed_numbers: [1, 2, 3]\n");
    ctx.write_record("six.json", &record(6, 3, 3));

    let output = ctx.command().args(["validate", "six.json"]).output().unwrap();
    output.assert_exit_code(5);
    output.assert_stdout_contains("number 6 is not one of the allowed values");
}

#[test]
fn test_bad_config_exits_with_config_status() {
    let ctx = TestContext::new().with_config("schema: [unclosed\n");
    ctx.write_record("six.json", &record(6, 3, 3));

    let output = ctx.command().args(["validate", "six.json"]).output().unwrap();
    output.assert_exit_code(2);
    output.assert_stderr_contains("Configuration error");

    let output = ctx
        .command()
        .args(["--config", "missing.yaml", "config"])
        .output()
        .unwrap();
    output.assert_exit_code(2);
}
