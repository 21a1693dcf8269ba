//! Basic functionality integration tests for fsx CLI.

#[path = "../common/mod.rs"]
mod common;

use common::{TestFixture, fsx};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_mkfile_creates_empty_files() {
    let fx = TestFixture::new();

    fsx()
        .arg("mkfile")
        .arg(fx.path("a"))
        .arg(fx.path("b"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 done"));

    assert_eq!(fs::metadata(fx.path("a")).unwrap().len(), 0);
    assert_eq!(fs::metadata(fx.path("b")).unwrap().len(), 0);
}

#[test]
fn test_mkdir_parents() {
    let fx = TestFixture::new();
    let nested = fx.path("one/two/three");

    fsx()
        .args(["mkdir", "-p"])
        .arg(&nested)
        .assert()
        .success();

    assert!(nested.is_dir());
}

#[cfg(unix)]
#[test]
fn test_mkdir_mode() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    let path = fx.path("private/leaf");

    fsx()
        .args(["mkdir", "-p", "-m", "750"])
        .arg(&path)
        .assert()
        .success();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode, 0o750);
}

#[test]
fn test_rm_and_rmdir() {
    let fx = TestFixture::new();
    let file = fx.write("file.txt", "bye");
    let dir = fx.mkdir("empty");

    fsx().arg("rm").arg(&file).assert().success();
    fsx().arg("rmdir").arg(&dir).assert().success();

    assert!(!file.exists());
    assert!(!dir.exists());
}

#[test]
fn test_cp_single_file() {
    let fx = TestFixture::new();
    let src = fx.write("src.txt", "hello world");
    let dst = fx.path("dst.txt");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    fx.assert_file_content(&dst, "hello world");
}

#[test]
fn test_cp_multiple_sources_into_directory() {
    let fx = TestFixture::new();
    let a = fx.write("a.txt", "content a");
    let b = fx.write("b.txt", "content b");
    let dest = fx.mkdir("dest");

    fsx()
        .arg("cp")
        .arg(&a)
        .arg(&b)
        .arg(&dest)
        .assert()
        .success();

    fx.assert_file_content(&dest.join("a.txt"), "content a");
    fx.assert_file_content(&dest.join("b.txt"), "content b");
}

#[test]
fn test_cp_single_source_into_directory() {
    let fx = TestFixture::new();
    let src = fx.write("report.txt", "numbers");
    let dest = fx.mkdir("archive");

    fsx().arg("cp").arg(&src).arg(&dest).assert().success();

    fx.assert_file_content(&dest.join("report.txt"), "numbers");
}

#[cfg(unix)]
#[test]
fn test_ln_creates_symlink() {
    let fx = TestFixture::new();
    let link = fx.path("link");

    fsx()
        .arg("ln")
        .arg("some/target")
        .arg(&link)
        .assert()
        .success();

    assert_eq!(
        fs::read_link(&link).unwrap(),
        std::path::Path::new("some/target")
    );
}

#[test]
fn test_verbose_prints_each_outcome() {
    let fx = TestFixture::new();

    fsx()
        .args(["mkdir", "--verbose"])
        .arg(fx.path("x"))
        .assert()
        .success()
        .stdout(predicate::str::contains("mkdir").and(predicate::str::contains("done")));
}

#[test]
fn test_quiet_prints_nothing_on_success() {
    let fx = TestFixture::new();

    fsx()
        .args(["mkfile", "-q"])
        .arg(fx.path("x"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
