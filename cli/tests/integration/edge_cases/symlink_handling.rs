//! Symbolic links are recreated by cp, never followed.

#![cfg(unix)]

use crate::common::{TestFixture, fsx};
use std::fs;
use std::os::unix::fs::symlink;

#[test]
fn test_cp_dangling_symlink() {
    let fx = TestFixture::new();
    let src = fx.path("dangling");
    symlink("nowhere/at/all", &src).unwrap();
    let dst = fx.path("dangling.copy");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    assert!(fs::symlink_metadata(&dst).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_link(&dst).unwrap(), fs::read_link(&src).unwrap());
}

#[test]
fn test_cp_symlink_to_directory() {
    let fx = TestFixture::new();
    let target = fx.mkdir("real");
    let src = fx.path("to-real");
    symlink(&target, &src).unwrap();
    let dst = fx.path("to-real.copy");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    assert_eq!(fs::read_link(&dst).unwrap(), target);
}

#[test]
fn test_cp_symlink_onto_regular_file_fails() {
    let fx = TestFixture::new();
    let src = fx.path("link");
    symlink("target", &src).unwrap();
    let dst = fx.write("regular", "keep");

    fsx()
        .args(["cp", "-c", "overwrite"])
        .arg(&src)
        .arg(&dst)
        .assert()
        .failure()
        .code(1);

    fx.assert_file_content(&dst, "keep");
}

#[test]
fn test_rm_removes_link_not_target() {
    let fx = TestFixture::new();
    let target = fx.write("target", "data");
    let link = fx.path("link");
    symlink(&target, &link).unwrap();

    fsx().arg("rm").arg(&link).assert().success();

    assert!(fs::symlink_metadata(&link).is_err());
    fx.assert_file_content(&target, "data");
}
