//! Windows backend.
//!
//! Windows has no permission-bit model: a mode is translated to the
//! read-only attribute (owner-write bit absent means read-only). Deleting a
//! read-only file fails, so the attribute is cleared first.
//!
//! Non-privileged users cannot create arbitrary symbolic links through the
//! native API, so link creation is delegated to the `win_helper` executable
//! installed next to the running program. The helper reports nothing but an
//! exit status, which is why its failures are recorded as
//! [`ErrorCode::Unknown`].

use super::{Platform, is_symlink};
use crate::error::ErrorCode;
use crate::request::Request;
use crate::status::Status;
use crate::utils::path::quote_arg;
use std::fs::{self, File, Metadata};
use std::io;
use std::os::windows::ffi::OsStrExt;
use std::os::windows::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use ::windows::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_NORMAL, FILE_ATTRIBUTE_READONLY, FILE_FLAGS_AND_ATTRIBUTES, GetFileAttributesW,
    SetFileAttributesW,
};

// INVALID_FILE_ATTRIBUTES is ((DWORD)-1); the `windows` crate doesn't export it.
const INVALID_FILE_ATTRIBUTES: u32 = u32::MAX;

/// Name of the link helper, looked up in the running executable's directory.
const HELPER: &str = "win_helper";

/// Attribute clearing plus the external link helper.
#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl Platform for Windows {
    fn create_dir(&self, path: &Path, _mode: u32) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if let Ok(attrs) = get_attributes(path) {
            if attrs & FILE_ATTRIBUTE_READONLY.0 != 0 {
                let _ = set_attributes(path, attrs & !FILE_ATTRIBUTE_READONLY.0);
            }
        }
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn set_mode(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(mode & 0o200 == 0);
        fs::set_permissions(path, permissions)
    }

    fn mode_of(&self, metadata: &Metadata) -> u32 {
        if metadata.permissions().readonly() {
            0o444
        } else {
            0o666
        }
    }

    fn applies_modes(&self) -> bool {
        false
    }

    fn close(&self, file: File) -> io::Result<()> {
        drop(file);
        Ok(())
    }

    fn create_link(
        &self,
        request: &Request<'_>,
        target: &Path,
        link: &Path,
        overwrite: bool,
    ) -> Status {
        // Policy is decided here, the helper only performs the change.
        if fs::symlink_metadata(link).is_ok() {
            if !overwrite {
                request
                    .errors
                    .append_code(link, ErrorCode::already_exists());
                return Status::Refused;
            }
            if !is_symlink(link) {
                request
                    .errors
                    .append(link, ErrorCode::Unknown, "Target is not a symbolic link");
                return Status::Refused;
            }
        }

        let (Some(quoted_target), Some(quoted_link)) = (quote_arg(target), quote_arg(link)) else {
            request
                .errors
                .append(link, ErrorCode::Unknown, "Failed to escape path");
            return Status::Failed;
        };

        let Some(helper) = helper_path() else {
            request
                .errors
                .append(link, ErrorCode::Unknown, "Failed to find win_helper");
            return Status::Failed;
        };

        let succeeded = Command::new(helper)
            .raw_arg("-s")
            .raw_arg(quoted_target)
            .raw_arg(quoted_link)
            .status()
            .is_ok_and(|status| status.success());
        if succeeded {
            Status::Done
        } else {
            request
                .errors
                .append(link, ErrorCode::Unknown, "Running win_helper has failed");
            Status::Failed
        }
    }
}

fn helper_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(HELPER))
}

/// Convert a Path to a null-terminated wide string for Win32 API.
#[inline]
fn path_to_wide(path: &Path) -> Vec<u16> {
    path.as_os_str().encode_wide().chain(Some(0)).collect()
}

/// Get the raw attribute `DWORD` of a path.
fn get_attributes(path: &Path) -> io::Result<u32> {
    let wide = path_to_wide(path);
    // SAFETY: We're passing a valid null-terminated wide string
    let attrs = unsafe { GetFileAttributesW(::windows::core::PCWSTR(wide.as_ptr())) };

    if attrs == INVALID_FILE_ATTRIBUTES {
        Err(io::Error::last_os_error())
    } else {
        Ok(attrs)
    }
}

/// Replace the attributes of a path.
fn set_attributes(path: &Path, attrs: u32) -> io::Result<()> {
    // Windows requires at least one attribute bit set
    let attrs = if attrs == 0 {
        FILE_ATTRIBUTE_NORMAL.0
    } else {
        attrs
    };

    let wide = path_to_wide(path);
    // SAFETY: We're passing a valid null-terminated wide string
    let result = unsafe {
        SetFileAttributesW(
            ::windows::core::PCWSTR(wide.as_ptr()),
            FILE_FLAGS_AND_ATTRIBUTES(attrs),
        )
    };

    if result.is_ok() {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
