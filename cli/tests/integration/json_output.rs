//! JSON report contract tests for fsx CLI.

#[path = "../common/mod.rs"]
mod common;

use common::{TestFixture, fsx};
use serde_json::Value;

fn json_report(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn test_json_success_report() {
    let fx = TestFixture::new();
    let path = fx.path("made");

    let output = fsx()
        .args(["mkdir", "--output", "json"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload = json_report(&output);
    assert_eq!(payload["schema_version"], "1.0");
    assert_eq!(payload["cancelled"], false);
    assert!(payload["errors"].as_array().unwrap().is_empty());

    let items = payload["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["op"], "mkdir");
    assert_eq!(items[0]["destination"], path.display().to_string());
    assert_eq!(items[0]["status"], "done");
    assert_eq!(items[0]["code"], 0);
}

#[test]
fn test_json_failure_report_lists_errors() {
    let fx = TestFixture::new();
    let missing = fx.path("missing");

    let output = fsx()
        .args(["rm", "--output", "json"])
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let payload = json_report(&output);
    assert_eq!(payload["items"][0]["status"], "failed");
    assert_eq!(payload["items"][0]["code"], 1);

    let errors = payload["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["path"], missing.display().to_string());
    assert!(errors[0]["code"]["os"].is_number());
    assert!(!errors[0]["message"].as_str().unwrap().is_empty());
}

#[test]
fn test_json_refusal_code_is_negative() {
    let fx = TestFixture::new();
    let src = fx.write("src", "a");
    let dst = fx.write("dst", "b");

    let output = fsx()
        .args(["cp", "--output", "json"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let payload = json_report(&output);
    assert_eq!(payload["items"][0]["status"], "refused");
    assert_eq!(payload["items"][0]["code"], -1);
    assert_eq!(payload["errors"][0]["path"], src.display().to_string());
}

#[test]
fn test_json_counts_copied_bytes() {
    let fx = TestFixture::new();
    let src = fx.write("src.bin", vec![9u8; 5000]);

    let output = fsx()
        .args(["cp", "--output", "json"])
        .arg(&src)
        .arg(fx.path("dst.bin"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let payload = json_report(&output);
    assert_eq!(payload["bytes"], 5000);
    assert_eq!(payload["items_completed"], 1);
}
