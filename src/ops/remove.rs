//! Single-entry removal.

use crate::platform::Platform;
use crate::request::Request;
use crate::status::Status;
use std::fs;
use std::io;
use std::path::Path;

pub(crate) fn remove_file<P: Platform>(platform: &P, request: &Request<'_>, path: &Path) -> Status {
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "remove file");

    request.progress.update(Some(path), Some(path), 0, 0);
    let size = fs::symlink_metadata(path).map_or(0, |meta| meta.len());
    finish(request, path, platform.remove_file(path), size)
}

pub(crate) fn remove_dir<P: Platform>(platform: &P, request: &Request<'_>, path: &Path) -> Status {
    #[cfg(feature = "tracing")]
    tracing::debug!(path = %path.display(), "remove directory");

    request.progress.update(Some(path), Some(path), 0, 0);
    finish(request, path, platform.remove_dir(path), 0)
}

fn finish(request: &Request<'_>, path: &Path, result: io::Result<()>, size: u64) -> Status {
    let status = match result {
        Ok(()) => Status::Done,
        Err(error) => {
            request.errors.append_io(path, &error);
            Status::Failed
        }
    };
    request.progress.update(None, None, 1, size);
    status
}
