//! Error handling integration tests for fsx CLI.

#[path = "../common/mod.rs"]
mod common;

use common::{TestFixture, fsx};
use predicates::prelude::*;

#[test]
fn test_rm_missing_file_reports_path() {
    let fx = TestFixture::new();
    let missing = fx.path("ghost.txt");

    fsx()
        .arg("rm")
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error[os-"))
        .stderr(predicate::str::contains("ghost.txt"));
}

#[test]
fn test_batch_continues_after_failure() {
    let fx = TestFixture::new();
    let missing = fx.path("missing.txt");
    let present = fx.write("present.txt", "x");

    fsx()
        .arg("rm")
        .arg(&missing)
        .arg(&present)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("1 done, 1 failed"));

    assert!(!present.exists());
}

#[test]
fn test_every_failure_is_reported() {
    let fx = TestFixture::new();

    fsx()
        .arg("rmdir")
        .arg(fx.path("a"))
        .arg(fx.path("b"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 error(s)"));
}

#[test]
fn test_mkfile_existing_is_refused() {
    let fx = TestFixture::new();
    let path = fx.write("taken", "keep");

    fsx().arg("mkfile").arg(&path).assert().failure().code(1);

    fx.assert_file_content(&path, "keep");
}

#[test]
fn test_cp_directory_source_fails() {
    let fx = TestFixture::new();
    let src = fx.mkdir("folder");

    fsx()
        .arg("cp")
        .arg(&src)
        .arg(fx.path("copy"))
        .assert()
        .failure()
        .code(1);

    assert!(!fx.path("copy").exists());
}

#[test]
fn test_cp_multiple_sources_need_directory() {
    let fx = TestFixture::new();
    let a = fx.write("a", "1");
    let b = fx.write("b", "2");

    fsx()
        .arg("cp")
        .arg(&a)
        .arg(&b)
        .arg(fx.path("not-a-dir"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("error[invalid_input]"));
}

#[test]
fn test_invalid_mode_is_rejected() {
    let fx = TestFixture::new();

    fsx()
        .args(["mkdir", "-m", "999"])
        .arg(fx.path("d"))
        .assert()
        .failure()
        .code(2);

    assert!(!fx.path("d").exists());
}

#[test]
fn test_rmdir_non_empty_directory_fails() {
    let fx = TestFixture::new();
    let dir = fx.mkdir("full");
    fx.write("full/child", "x");

    fsx().arg("rmdir").arg(&dir).assert().failure().code(1);

    assert!(dir.exists());
}
