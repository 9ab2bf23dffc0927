//! Scripted runs of the interactive wizard, the catalog listing, and the
//! loading sequence.

mod common;

use common::{run_fcw, run_fcw_in, seed_user_config, StubServer};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[test]
fn scripted_wizard_walks_every_step_and_predicts() {
    let server = StubServer::start(vec![(200, r#"[{"prediction": 21543.7}]"#)]);
    let script = "set Dept 3\nnext\nset Year 2012\nnext\nnext\nnext\nholiday on\npredict\nquit\n";
    let output = run_fcw(
        &["wizard", "--no-splash", "--endpoint", &server.url],
        script,
    );
    let requests = server.finish();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    for step in 1..=5 {
        assert!(stdout.contains(&format!("Step {step} of 5")), "missing step {step}");
    }
    assert!(stdout.contains("[ok] Prediction Complete"));
    assert!(stdout.contains("Predicted Weekly Sales: $21,543.70"));

    let body: Value = serde_json::from_str(&requests[0].body).expect("json body");
    assert_eq!(body[0]["Dept"], Value::from(3.0));
    assert_eq!(body[0]["Year"], Value::from(2012.0));
    assert_eq!(body[0]["IsHoliday"], Value::from(1.0));
}

#[test]
fn wizard_surfaces_failure_and_recovers_after_reset() {
    let server = StubServer::start(vec![(503, ""), (200, r#"[{"prediction": 10}]"#)]);
    let script = "goto 5\npredict\nreset\ngoto 5\npredict\n";
    let output = run_fcw(
        &["wizard", "--no-splash", "--endpoint", &server.url],
        script,
    );
    let requests = server.finish();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[error] Prediction Failed: HTTP error! status: 503"));
    assert!(stdout.contains("Predicted Weekly Sales: $10.00"));
    assert_eq!(requests.len(), 2);
}

#[test]
fn wizard_plays_loading_sequence_before_the_form() {
    let output = run_fcw(&["wizard", "--instant"], "quit\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sales forecast wizard"));
    assert!(stdout.contains("== Store Information (Step 1 of 5) =="));
}

#[test]
fn catalog_json_lists_groups_in_step_order() {
    let output = run_fcw(&["catalog", "--json"], "");
    assert!(output.status.success());
    let groups: Value = serde_json::from_slice(&output.stdout).expect("catalog json");
    let groups = groups.as_array().expect("group array");
    assert_eq!(groups.len(), 5);
    assert_eq!(groups[0]["title"], "Store Information");
    assert_eq!(groups[0]["fields"][0]["name"], "Store");
    assert_eq!(groups[0]["fields"][0]["default"], "1");
    let field_count: usize = groups
        .iter()
        .map(|group| group["fields"].as_array().map_or(0, Vec::len))
        .sum();
    assert_eq!(field_count, 16);
}

#[test]
fn splash_completes_on_virtual_time() {
    let output = run_fcw(&["splash", "--instant", "--seed", "3"], "");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Loading complete"
    );
}

#[test]
fn splash_torn_down_midway_never_hands_off() {
    let output = run_fcw(
        &["-v", "splash", "--instant", "--seed", "3", "--cancel-at", "40"],
        "",
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Loading cancelled"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("loading sequence complete"), "stderr: {stderr}");
}

#[test]
fn splash_reads_timings_from_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"schema_version":1,"tick_ms":1,"hold_ms":1,"exit_ms":1}"#,
    )
    .expect("write config");
    let output = run_fcw(
        &["splash", "--config", path.to_str().expect("utf8 path")],
        "",
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Loading complete"
    );
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"schema_version":1,"retries":2}"#).expect("write config");
    let output = run_fcw(
        &["splash", "--instant", "--config", path.to_str().expect("utf8 path")],
        "",
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("parse config JSON"));
}

#[test]
fn user_config_under_home_is_honoured() {
    let home = TempDir::new().expect("temp home");
    seed_user_config(home.path(), r#"{"schema_version":2}"#);
    let output = run_fcw_in(home.path(), &["splash", "--instant"], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("schema_version 2"));

    let clean = TempDir::new().expect("temp home");
    let output = run_fcw_in(clean.path(), &["splash", "--instant"], "");
    assert!(output.status.success());
}
