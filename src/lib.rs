//! # fsexec
//!
//! Single-step filesystem mutations for batch and background task runners.
//!
//! ## Core Features
//!
//! - **One contract per operation**: make file, make directory (optionally
//!   with parents), remove file, remove directory, copy file, create symbolic
//!   link
//! - **Errors are collected, not thrown**: every failure is appended to a
//!   shared [`ErrorList`] and the call returns a [`Status`], so a batch can
//!   finish and report everything that went wrong
//! - **Streaming copy**: fixed [`BLOCK_SIZE`] blocks, cooperative
//!   cancellation between blocks, permission bits propagated afterwards
//! - **Symlink aware**: copying a symbolic link recreates the link
//! - **Conflict strategies**: fail, overwrite or resume-append, with an
//!   optional confirmation callback
//! - **Platform backends**: direct syscalls on Unix; read-only attribute
//!   handling and a link helper process on Windows
//!
//! ## Quick Start
//!
//! ```no_run
//! use fsexec::{ConflictStrategy, ErrorList, Estimator, Request, copy_file};
//! use std::path::Path;
//!
//! let errors = ErrorList::new();
//! let progress = Estimator::new();
//! let request = Request::new(&errors).with_progress(&progress);
//!
//! let status = copy_file(
//!     &request,
//!     Path::new("report.pdf"),
//!     Path::new("backup/report.pdf"),
//!     ConflictStrategy::Overwrite,
//! );
//! println!("{status}: {} bytes", progress.bytes());
//! errors.into_result()?;
//! # Ok::<(), fsexec::Error>(())
//! ```
//!
//! ## Status Codes
//!
//! | [`Status`] | `code()` | Error recorded |
//! |------------|----------|----------------|
//! | `Done` | `0` | no |
//! | `Declined` | `0` | no |
//! | `Cancelled` | `1` | no |
//! | `Failed` | `1` | yes |
//! | `Refused` | `-1` | yes |
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate (default) |
//! | `progress` | [`Progress`] for indicatif progress bars |
//! | `serde` | Serialize/Deserialize for [`Operation`], [`ConflictStrategy`], [`IoError`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod ops;
mod platform;
mod progress;
mod request;
mod status;
mod utils;

pub use error::{Error, ErrorCode, ErrorList, IoError, Result};
pub use ops::{
    BLOCK_SIZE, Executor, Operation, copy_file, create_link, make_dir, make_file, remove_dir,
    remove_file,
};
pub use platform::{NativePlatform, Platform};
pub use progress::{Estimator, NoProgress, Progress};
pub use request::{CancelToken, Confirm, ConflictStrategy, Request};
pub use status::Status;

#[cfg(unix)]
pub use platform::Posix;
#[cfg(windows)]
pub use platform::Windows;

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_progress_bar;
