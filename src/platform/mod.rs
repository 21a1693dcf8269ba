//! Platform capability abstraction.
//!
//! Each operation is written once against [`Platform`]. The POSIX backend
//! talks to the syscalls directly; the Windows backend clears read-only
//! attributes before deleting, translates mode bits to the read-only flag and
//! delegates symbolic-link creation to an external helper process.
//!
//! The backend is selected at build time through [`NativePlatform`].

use crate::request::Request;
use crate::status::Status;
use std::fs::{File, Metadata};
use std::io;
use std::path::Path;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod win32;

#[cfg(unix)]
pub use posix::Posix;
#[cfg(windows)]
pub use win32::Windows;

/// Backend used by the free-function API.
#[cfg(unix)]
pub type NativePlatform = Posix;

/// Backend used by the free-function API.
#[cfg(windows)]
pub type NativePlatform = Windows;

/// Filesystem primitives whose behavior differs between platforms.
pub trait Platform {
    /// Create exactly one directory with the given mode bits.
    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Delete a single file (or symbolic link).
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Delete a single empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Apply permission bits (low 12 bits of a POSIX mode) to `path`.
    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Permission bits of an entry, as a POSIX mode.
    fn mode_of(&self, metadata: &Metadata) -> u32;

    /// Whether the platform has a permission-bit model at all.
    ///
    /// Steps that only exist to apply a requested mode are skipped when this
    /// is `false`.
    fn applies_modes(&self) -> bool;

    /// Close a file handle, reporting the failure instead of ignoring it.
    fn close(&self, file: File) -> io::Result<()>;

    /// Create a symbolic link at `link` storing `target`.
    ///
    /// Overwrite policy differs sharply between backends, so the backend owns
    /// it and records its own failures in `request.errors`.
    fn create_link(
        &self,
        request: &Request<'_>,
        target: &Path,
        link: &Path,
        overwrite: bool,
    ) -> Status;
}

/// Whether `path` itself is a symbolic link (never follows it).
pub(crate) fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}
