//! Conflict strategy integration tests for fsx CLI.

#[path = "../common/mod.rs"]
mod common;

use common::{TestFixture, fsx};
use predicates::prelude::*;
use rstest::rstest;
use std::fs;

#[rstest]
#[case::fail("fail", false, "new")]
#[case::overwrite("overwrite", true, "new content")]
#[case::append("append", true, "new content")]
fn test_cp_existing_destination(
    #[case] strategy: &str,
    #[case] succeeds: bool,
    #[case] expected: &str,
) {
    let fx = TestFixture::new();
    let src = fx.write("src.txt", "new content");
    // A partial copy: append resumes it, fail keeps it.
    let dst = fx.write("dst.txt", "new");

    let assert = fsx()
        .args(["cp", "-c", strategy])
        .arg(&src)
        .arg(&dst)
        .assert();
    if succeeds {
        assert.success();
    } else {
        assert.failure().code(1);
    }

    fx.assert_file_content(&dst, expected);
}

#[rstest]
#[case::declined("n\n", "old")]
#[case::empty_answer("\n", "old")]
#[case::accepted("y\n", "new")]
fn test_cp_interactive(#[case] answer: &str, #[case] expected: &str) {
    let fx = TestFixture::new();
    let src = fx.write("src.txt", "new");
    let dst = fx.write("dst.txt", "old");

    fsx()
        .args(["cp", "-i", "-c", "overwrite"])
        .arg(&src)
        .arg(&dst)
        .write_stdin(answer)
        .assert()
        .success();

    fx.assert_file_content(&dst, expected);
}

#[test]
fn test_cp_interactive_does_not_ask_for_new_destination() {
    let fx = TestFixture::new();
    let src = fx.write("src.txt", "data");
    let dst = fx.path("fresh.txt");

    fsx()
        .args(["cp", "-i", "-c", "overwrite"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .success()
        .stderr(predicate::str::contains("replace").not());

    fx.assert_file_content(&dst, "data");
}

#[cfg(unix)]
#[rstest]
#[case::fail("fail", "old")]
#[case::overwrite("overwrite", "new")]
fn test_ln_existing_link(#[case] strategy: &str, #[case] expected: &str) {
    let fx = TestFixture::new();
    let link = fx.path("link");
    std::os::unix::fs::symlink("old", &link).unwrap();

    let _ = fsx()
        .args(["ln", "-c", strategy, "new"])
        .arg(&link)
        .assert();

    assert_eq!(
        fs::read_link(&link).unwrap(),
        std::path::Path::new(expected)
    );
}
