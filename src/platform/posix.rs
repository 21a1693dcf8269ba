//! POSIX backend.

use super::{Platform, is_symlink};
use crate::request::Request;
use crate::status::Status;
use std::fs::{self, DirBuilder, File, Metadata, Permissions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt, symlink};
use std::os::unix::io::IntoRawFd;
use std::path::Path;

/// Direct syscalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl Platform for Posix {
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        DirBuilder::new().mode(mode).create(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        fs::set_permissions(path, Permissions::from_mode(mode & 0o7777))
    }

    fn mode_of(&self, metadata: &Metadata) -> u32 {
        metadata.permissions().mode() & 0o7777
    }

    fn applies_modes(&self) -> bool {
        true
    }

    fn close(&self, file: File) -> io::Result<()> {
        let fd = file.into_raw_fd();
        // SAFETY: `fd` was just released by `File`, so it is open and owned
        // exclusively here; it is closed exactly once.
        if unsafe { libc::close(fd) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn create_link(
        &self,
        request: &Request<'_>,
        target: &Path,
        link: &Path,
        overwrite: bool,
    ) -> Status {
        link_with(request, target, link, overwrite, |target, link| symlink(target, link))
    }
}

/// Create `link`, replacing an existing symbolic link once when `overwrite`
/// is set. `make` performs the actual creation.
fn link_with(
    request: &Request<'_>,
    target: &Path,
    link: &Path,
    overwrite: bool,
    make: impl Fn(&Path, &Path) -> io::Result<()>,
) -> Status {
    let error = match make(target, link) {
        Ok(()) => return Status::Done,
        Err(error) => error,
    };

    if error.kind() != io::ErrorKind::AlreadyExists || !overwrite || !is_symlink(link) {
        request.errors.append_io(link, &error);
        return Status::Failed;
    }

    // Only an existing symbolic link is replaced, and only once.
    if let Err(error) = fs::remove_file(link) {
        request.errors.append_io(link, &error);
        return Status::Failed;
    }
    match make(target, link) {
        Ok(()) => Status::Done,
        Err(error) => {
            request.errors.append_io(target, &error);
            Status::Failed
        }
    }
}
