//! Operation contracts.
//!
//! Each contract takes a [`Request`] plus its operands, performs one
//! filesystem change and returns a [`Status`]. Failures never escape as
//! `Err`: they are appended to [`Request::errors`] so a batch driver can keep
//! going and report everything at the end.
//!
//! The contracts are available three ways:
//!
//! - free functions ([`copy_file`], [`make_dir`], ...) on the native platform;
//! - methods of an [`Executor`], which can carry any [`Platform`];
//! - [`Executor::run`], dispatching an [`Operation`] value.
//!
//! # Example
//!
//! ```no_run
//! use fsexec::{ConflictStrategy, ErrorList, Executor, Operation, Request};
//!
//! let errors = ErrorList::new();
//! let executor = Executor::new();
//! let batch = [
//!     Operation::MakeDir { path: "out".into(), parents: true, mode: 0o755 },
//!     Operation::Copy {
//!         src: "notes.txt".into(),
//!         dst: "out/notes.txt".into(),
//!         strategy: ConflictStrategy::Overwrite,
//!     },
//! ];
//!
//! for operation in &batch {
//!     let request = Request::new(&errors);
//!     if !executor.run(&request, operation).is_success() {
//!         break;
//!     }
//! }
//! errors.into_result()?;
//! # Ok::<(), fsexec::Error>(())
//! ```

mod conflict;
mod create;
mod file;
mod link;
mod remove;

pub use file::BLOCK_SIZE;

use crate::platform::{NativePlatform, Platform};
use crate::request::{ConflictStrategy, Request};
use crate::status::Status;
use std::path::{Path, PathBuf};

/// The operands of one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "op", rename_all = "snake_case")
)]
pub enum Operation {
    /// Create an empty file; an existing path is refused.
    MakeFile { path: PathBuf },
    /// Create a directory, optionally with its missing ancestors.
    MakeDir {
        path: PathBuf,
        parents: bool,
        mode: u32,
    },
    /// Remove one file or symbolic link.
    RemoveFile { path: PathBuf },
    /// Remove one empty directory.
    RemoveDir { path: PathBuf },
    /// Copy one file, or recreate the link if `src` is a symbolic link.
    Copy {
        src: PathBuf,
        dst: PathBuf,
        strategy: ConflictStrategy,
    },
    /// Create a symbolic link at `link` storing `target`.
    Link {
        target: PathBuf,
        link: PathBuf,
        strategy: ConflictStrategy,
    },
}

impl Operation {
    /// Short name of the operation kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MakeFile { .. } => "mkfile",
            Self::MakeDir { .. } => "mkdir",
            Self::RemoveFile { .. } => "rm",
            Self::RemoveDir { .. } => "rmdir",
            Self::Copy { .. } => "cp",
            Self::Link { .. } => "ln",
        }
    }

    /// The path the operation changes.
    #[must_use]
    pub fn destination(&self) -> &Path {
        match self {
            Self::MakeFile { path }
            | Self::MakeDir { path, .. }
            | Self::RemoveFile { path }
            | Self::RemoveDir { path } => path,
            Self::Copy { dst, .. } => dst,
            Self::Link { link, .. } => link,
        }
    }
}

/// Runs operation contracts against a [`Platform`].
///
/// `Executor::new()` uses the platform the crate was built for; tests and
/// embedders can supply their own backend with [`Executor::with_platform`].
#[derive(Debug, Clone, Default)]
pub struct Executor<P: Platform = NativePlatform> {
    platform: P,
}

impl Executor {
    /// Executor on the native platform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Platform> Executor<P> {
    /// Executor on a specific platform backend.
    pub fn with_platform(platform: P) -> Self {
        Self { platform }
    }

    /// The backend in use.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Dispatch one [`Operation`].
    pub fn run(&self, request: &Request<'_>, operation: &Operation) -> Status {
        match operation {
            Operation::MakeFile { path } => self.make_file(request, path),
            Operation::MakeDir {
                path,
                parents,
                mode,
            } => self.make_dir(request, path, *parents, *mode),
            Operation::RemoveFile { path } => self.remove_file(request, path),
            Operation::RemoveDir { path } => self.remove_dir(request, path),
            Operation::Copy { src, dst, strategy } => self.copy_file(request, src, dst, *strategy),
            Operation::Link {
                target,
                link,
                strategy,
            } => self.create_link(request, target, link, *strategy),
        }
    }

    /// Create an empty file at `path`.
    ///
    /// Returns [`Status::Refused`] if anything already exists there.
    pub fn make_file(&self, request: &Request<'_>, path: &Path) -> Status {
        create::make_file(&self.platform, request, path)
    }

    /// Create the directory `path` with `mode`.
    ///
    /// With `parents`, missing ancestors are created first with mode `0o700`
    /// and an existing `path` is not an error; `mode` is then applied to
    /// `path` alone. Directories created before a failure are left in place.
    pub fn make_dir(&self, request: &Request<'_>, path: &Path, parents: bool, mode: u32) -> Status {
        create::make_dir(&self.platform, request, path, parents, mode)
    }

    /// Remove a single file (or symbolic link).
    pub fn remove_file(&self, request: &Request<'_>, path: &Path) -> Status {
        remove::remove_file(&self.platform, request, path)
    }

    /// Remove a single empty directory.
    pub fn remove_dir(&self, request: &Request<'_>, path: &Path) -> Status {
        remove::remove_dir(&self.platform, request, path)
    }

    /// Copy the file `src` to `dst` in [`BLOCK_SIZE`] blocks.
    ///
    /// A symbolic link at `src` is recreated at `dst` instead of being
    /// followed. On success the source's permission bits are applied to
    /// the destination.
    ///
    /// | Strategy | `dst` exists |
    /// |----------|--------------|
    /// | [`ConflictStrategy::Fail`] | [`Status::Refused`], nothing written |
    /// | [`ConflictStrategy::Overwrite`] | `dst` is unlinked, then written from scratch |
    /// | [`ConflictStrategy::AppendToFile`] | writing resumes at the end of `dst`, reading at the same offset in `src` |
    ///
    /// With [`Request::cancellable`] set, a pending cancellation stops the
    /// copy before the next block is written and returns
    /// [`Status::Cancelled`] without recording an error. The partial
    /// destination is kept.
    pub fn copy_file(
        &self,
        request: &Request<'_>,
        src: &Path,
        dst: &Path,
        strategy: ConflictStrategy,
    ) -> Status {
        file::copy_file(&self.platform, request, src, dst, strategy)
    }

    /// Create a symbolic link at `link` whose stored text is `target`.
    ///
    /// Only an existing symbolic link can be replaced, and only when
    /// `strategy` allows overwriting.
    pub fn create_link(
        &self,
        request: &Request<'_>,
        target: &Path,
        link: &Path,
        strategy: ConflictStrategy,
    ) -> Status {
        link::create_link(&self.platform, request, target, link, strategy)
    }
}

/// [`Executor::make_file`] on the native platform.
pub fn make_file(request: &Request<'_>, path: &Path) -> Status {
    Executor::new().make_file(request, path)
}

/// [`Executor::make_dir`] on the native platform.
pub fn make_dir(request: &Request<'_>, path: &Path, parents: bool, mode: u32) -> Status {
    Executor::new().make_dir(request, path, parents, mode)
}

/// [`Executor::remove_file`] on the native platform.
pub fn remove_file(request: &Request<'_>, path: &Path) -> Status {
    Executor::new().remove_file(request, path)
}

/// [`Executor::remove_dir`] on the native platform.
pub fn remove_dir(request: &Request<'_>, path: &Path) -> Status {
    Executor::new().remove_dir(request, path)
}

/// [`Executor::copy_file`] on the native platform.
pub fn copy_file(
    request: &Request<'_>,
    src: &Path,
    dst: &Path,
    strategy: ConflictStrategy,
) -> Status {
    Executor::new().copy_file(request, src, dst, strategy)
}

/// [`Executor::create_link`] on the native platform.
pub fn create_link(
    request: &Request<'_>,
    target: &Path,
    link: &Path,
    strategy: ConflictStrategy,
) -> Status {
    Executor::new().create_link(request, target, link, strategy)
}
