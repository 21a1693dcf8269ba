//! Boundary conditions: sizes, names and repeated calls.

use crate::common::{TestFixture, fsx};
use std::fs;

#[test]
fn test_cp_zero_length_file() {
    let fx = TestFixture::new();
    let src = fx.write("empty", "");
    let dst = fx.path("empty.copy");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
}

#[test]
fn test_cp_multi_block_file() {
    let fx = TestFixture::new();
    let data: Vec<u8> = (0..70 * 1024).map(|i| (i % 251) as u8).collect();
    let src = fx.write("big.bin", &data);
    let dst = fx.path("big.copy");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    assert_eq!(fs::read(&dst).unwrap(), data);
}

#[test]
fn test_mkdir_parents_is_idempotent() {
    let fx = TestFixture::new();
    let path = fx.path("a/b/c");

    for _ in 0..2 {
        fsx().args(["mkdir", "-p"]).arg(&path).assert().success();
    }

    assert!(path.is_dir());
}

#[test]
fn test_mkdir_without_parents_on_existing_fails() {
    let fx = TestFixture::new();
    let path = fx.mkdir("exists");

    fsx().arg("mkdir").arg(&path).assert().failure().code(1);
}

#[test]
fn test_filenames_with_spaces() {
    let fx = TestFixture::new();
    let src = fx.write("my file.txt", "spaced");
    let dst = fx.path("copy of my file.txt");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    fx.assert_file_content(&dst, "spaced");
}

#[cfg(unix)]
#[test]
fn test_cp_preserves_mode() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    let src = fx.write("script.sh", "#!/bin/sh\n");
    fs::set_permissions(&src, fs::Permissions::from_mode(0o751)).unwrap();
    let dst = fx.path("script.copy");

    fsx().arg("cp").arg(&src).arg(&dst).assert().success();

    let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode, 0o751);
}
