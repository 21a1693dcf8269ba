//! Single file copy.
//!
//! Bytes are streamed through a fixed-size block straight into the
//! destination. There is no temp file and no rename: an interrupted copy
//! leaves a partial destination behind, which [`ConflictStrategy::AppendToFile`]
//! can later complete.

use super::conflict::{Resolution, resolve};
use super::link;
use crate::error::ErrorCode;
use crate::platform::{Platform, is_symlink};
use crate::request::{ConflictStrategy, Request};
use crate::status::Status;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Size of one streamed block, and the granularity of progress reports and
/// cancellation checks.
pub const BLOCK_SIZE: usize = 32 * 1024;

pub(crate) fn copy_file<P: Platform>(
    platform: &P,
    request: &Request<'_>,
    src: &Path,
    dst: &Path,
    strategy: ConflictStrategy,
) -> Status {
    #[cfg(feature = "tracing")]
    tracing::debug!(src = %src.display(), dst = %dst.display(), ?strategy, "copy file");

    request.progress.update(Some(src), Some(dst), 0, 0);

    // Checked before the directory test: a link to a directory is still a link.
    if is_symlink(src) {
        return copy_symlink(platform, request, src, dst, strategy);
    }

    if fs::metadata(src).is_ok_and(|meta| meta.is_dir()) {
        request
            .errors
            .append_code(src, ErrorCode::is_a_directory());
        return Status::Failed;
    }

    let mut source = match File::open(src) {
        Ok(file) => file,
        Err(error) => {
            request.errors.append_io(src, &error);
            return Status::Failed;
        }
    };

    let exists = fs::metadata(dst).is_ok();
    match resolve(request, strategy, src, dst, exists, src) {
        Resolution::Proceed => {}
        Resolution::Decline => return abandon(platform, request, source, src, Status::Declined),
        Resolution::Refuse => return abandon(platform, request, source, src, Status::Refused),
    }

    let append = strategy == ConflictStrategy::AppendToFile;
    if strategy == ConflictStrategy::Overwrite {
        match platform.remove_file(dst) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                request.errors.append_io(dst, &error);
                return abandon(platform, request, source, src, Status::Failed);
            }
        }
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let mut target = match options.open(dst) {
        Ok(file) => file,
        Err(error) => {
            request.errors.append_io(dst, &error);
            return abandon(platform, request, source, src, Status::Failed);
        }
    };

    let mut status = transfer(request, &mut source, &mut target, src, dst, append);

    // Both handles are closed whatever happened above.
    if let Err(error) = platform.close(source) {
        request.errors.append_io(src, &error);
        status = Status::Failed;
    }
    if let Err(error) = platform.close(target) {
        request.errors.append_io(dst, &error);
        status = Status::Failed;
    }

    if status == Status::Done {
        status = copy_mode(platform, request, src, dst);
    }

    request.progress.update(None, None, 1, 0);
    status
}

/// Close the source on an early exit. A close error is recorded but does not
/// change `status`.
fn abandon<P: Platform>(
    platform: &P,
    request: &Request<'_>,
    source: File,
    src: &Path,
    status: Status,
) -> Status {
    if let Err(error) = platform.close(source) {
        request.errors.append_io(src, &error);
    }
    status
}

/// Recreate the link stored at `src` instead of copying what it points to.
fn copy_symlink<P: Platform>(
    platform: &P,
    request: &Request<'_>,
    src: &Path,
    dst: &Path,
    strategy: ConflictStrategy,
) -> Status {
    let target = match fs::read_link(src) {
        Ok(target) => target,
        Err(_) => {
            request.errors.append(
                src,
                ErrorCode::Unknown,
                "Failed to get symbolic link target",
            );
            return Status::Failed;
        }
    };

    match link::create_link_for(platform, request, &target, dst, strategy, src) {
        Status::Done => {
            request.progress.update(None, None, 1, 0);
            Status::Done
        }
        Status::Declined => Status::Declined,
        status => {
            request
                .errors
                .append(src, ErrorCode::Unknown, "Failed to make symbolic link");
            if status == Status::Refused {
                Status::Refused
            } else {
                Status::Failed
            }
        }
    }
}

fn transfer(
    request: &Request<'_>,
    source: &mut File,
    target: &mut File,
    src: &Path,
    dst: &Path,
    append: bool,
) -> Status {
    if append {
        let offset = match target.seek(SeekFrom::End(0)) {
            Ok(offset) => offset,
            Err(error) => {
                request.errors.append_io(dst, &error);
                return Status::Failed;
            }
        };
        if let Err(error) = source.seek(SeekFrom::Start(offset)) {
            request.errors.append_io(src, &error);
            return Status::Failed;
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(dst = %dst.display(), offset, "appending to existing destination");
        request.progress.update(None, None, 0, offset);
    }

    let mut buffer = vec![0u8; BLOCK_SIZE];
    loop {
        let len = match read_block(source, &mut buffer) {
            Ok(0) => return Status::Done,
            Ok(len) => len,
            Err(error) => {
                request.errors.append_io(src, &error);
                return Status::Failed;
            }
        };

        if request.is_cancelled() {
            #[cfg(feature = "tracing")]
            tracing::info!(dst = %dst.display(), "copy cancelled");
            return Status::Cancelled;
        }

        if let Err(error) = target.write_all(&buffer[..len]) {
            request.errors.append_io(dst, &error);
            return Status::Failed;
        }
        request.progress.update(None, None, 0, len as u64);
    }
}

/// Fill `buffer` until it is full or the reader is exhausted.
fn read_block(reader: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

/// Propagate the source's permission bits. A failure is recorded but the
/// copied bytes stay.
fn copy_mode<P: Platform>(platform: &P, request: &Request<'_>, src: &Path, dst: &Path) -> Status {
    let mode = match fs::metadata(src) {
        Ok(meta) => platform.mode_of(&meta) & 0o7777,
        Err(error) => {
            request.errors.append_io(src, &error);
            return Status::Failed;
        }
    };
    match platform.set_mode(dst, mode) {
        Ok(()) => Status::Done,
        Err(error) => {
            request.errors.append_io(dst, &error);
            Status::Failed
        }
    }
}
