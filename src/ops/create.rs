//! Empty-file and directory creation.

use crate::error::ErrorCode;
use crate::platform::Platform;
use crate::request::Request;
use crate::status::Status;
use crate::utils::path::prefixes;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Mode of directories materialized on the way to the requested one.
const INTERMEDIATE_MODE: u32 = 0o700;

pub(crate) fn make_file<P: Platform>(platform: &P, request: &Request<'_>, path: &Path) -> Status {
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "make file");

    if fs::metadata(path).is_ok() {
        request
            .errors
            .append_code(path, ErrorCode::already_exists());
        return Status::Refused;
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(error) => {
            request.errors.append_io(path, &error);
            return Status::Failed;
        }
    };

    match platform.close(file) {
        Ok(()) => Status::Done,
        Err(error) => {
            request.errors.append_io(path, &error);
            Status::Failed
        }
    }
}

pub(crate) fn make_dir<P: Platform>(
    platform: &P,
    request: &Request<'_>,
    path: &Path,
    parents: bool,
    mode: u32,
) -> Status {
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), parents, mode, "make directory");

    if !parents {
        return match platform.create_dir(path, mode) {
            Ok(()) => Status::Done,
            Err(error) => {
                request.errors.append_io(path, &error);
                Status::Failed
            }
        };
    }

    for prefix in prefixes(path) {
        if prefix.is_dir() {
            continue;
        }
        match platform.create_dir(&prefix, INTERMEDIATE_MODE) {
            Ok(()) => {}
            // Someone else won the race; fine as long as it is a directory.
            Err(error) if error.kind() == io::ErrorKind::AlreadyExists && prefix.is_dir() => {}
            Err(error) => {
                request.errors.append_io(&prefix, &error);
                return Status::Failed;
            }
        }
    }

    if platform.applies_modes() {
        if let Err(error) = platform.set_mode(path, mode) {
            request.errors.append_io(path, &error);
            return Status::Failed;
        }
    }
    Status::Done
}
