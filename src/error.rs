//! Error types for fsexec.
//!
//! Operation contracts never return errors through `Result`. Every failure they
//! hit is recorded as an [`IoError`] in the request's [`ErrorList`], and the
//! contract returns a [`Status`](crate::Status). A caller driving a batch of
//! operations can therefore finish the batch and report everything that went
//! wrong, not just the first problem.
//!
//! # Error Categories
//!
//! | Category | Code | Typical message |
//! |----------|------|-----------------|
//! | Precondition | [`ErrorCode::Os`] (`EEXIST`, `EISDIR`, `ENOENT`) | `File exists` |
//! | I/O | [`ErrorCode::Os`] | whatever the OS reports |
//! | Helper/platform | [`ErrorCode::Unknown`] | fixed description |
//!
//! User-declined conflicts and cancellations are not errors and never produce
//! an entry.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Result type for the non-contract helper API.
pub type Result<T> = std::result::Result<T, Error>;

/// Code attached to every recorded error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ErrorCode {
    /// Raw OS error code (`errno` on Unix, `GetLastError` on Windows).
    Os(i32),
    /// No structured code is available, e.g. the failure happened in a helper
    /// process on the other side of a process boundary.
    Unknown,
}

impl ErrorCode {
    /// Extract the code carried by an IO error.
    pub fn of(error: &io::Error) -> Self {
        error.raw_os_error().map_or(Self::Unknown, Self::Os)
    }

    /// The raw OS code, if any.
    #[must_use]
    pub fn raw(self) -> Option<i32> {
        match self {
            Self::Os(code) => Some(code),
            Self::Unknown => None,
        }
    }

    /// "Already exists" in the native code space.
    pub(crate) fn already_exists() -> Self {
        #[cfg(unix)]
        {
            Self::Os(libc::EEXIST)
        }
        #[cfg(windows)]
        {
            // ERROR_FILE_EXISTS
            Self::Os(80)
        }
        #[cfg(not(any(unix, windows)))]
        {
            Self::Unknown
        }
    }

    /// "Is a directory" in the native code space.
    pub(crate) fn is_a_directory() -> Self {
        #[cfg(unix)]
        {
            Self::Os(libc::EISDIR)
        }
        #[cfg(windows)]
        {
            // ERROR_DIRECTORY_NOT_SUPPORTED
            Self::Os(336)
        }
        #[cfg(not(any(unix, windows)))]
        {
            Self::Unknown
        }
    }

    /// Human-readable description of the code, without the `(os error N)`
    /// suffix std appends.
    pub(crate) fn describe(self) -> String {
        match self {
            Self::Os(code) => describe_os_error(&io::Error::from_raw_os_error(code)),
            Self::Unknown => "Unknown error".to_owned(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Os(code) => write!(f, "os-{code}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

fn describe_os_error(error: &io::Error) -> String {
    let text = error.to_string();
    match error.raw_os_error() {
        Some(code) => text
            .strip_suffix(&format!(" (os error {code})"))
            .map_or_else(|| text.clone(), str::to_owned),
        None => text,
    }
}

/// A single recorded failure: the offending path, its code and a description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{}: {message}", .path.display())]
pub struct IoError {
    /// Path the failure is attributed to
    pub path: PathBuf,
    /// OS code, or [`ErrorCode::Unknown`]
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
}

/// Ordered, append-only collection of recorded failures.
///
/// The list is shared by reference between the caller and every operation it
/// drives, so it uses interior mutability and is `Sync`. Appending never
/// fails: a poisoned lock is recovered and an entry that cannot be allocated
/// is dropped.
///
/// # Example
///
/// ```
/// use fsexec::{ErrorList, Request, remove_file};
/// use std::path::Path;
///
/// let errors = ErrorList::new();
/// let request = Request::new(&errors);
/// let status = remove_file(&request, Path::new("/definitely/not/here"));
///
/// assert!(!status.is_success());
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ErrorList {
    entries: Mutex<Vec<IoError>>,
}

impl ErrorList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn append(&self, path: &Path, code: ErrorCode, message: impl Into<String>) {
        let message = message.into();

        #[cfg(feature = "tracing")]
        tracing::warn!(path = %path.display(), code = %code, "{}", message);

        let mut entries = self.lock();
        if entries.try_reserve(1).is_err() {
            return;
        }
        entries.push(IoError {
            path: path.to_path_buf(),
            code,
            message,
        });
    }

    /// Record an IO error, keeping its OS code when there is one.
    pub fn append_io(&self, path: &Path, error: &io::Error) {
        self.append(path, ErrorCode::of(error), describe_os_error(error));
    }

    /// Record a failure described by its code alone.
    pub(crate) fn append_code(&self, path: &Path, code: ErrorCode) {
        self.append(path, code, code.describe());
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the recorded failures, in recording order.
    pub fn entries(&self) -> Vec<IoError> {
        self.lock().clone()
    }

    /// Consume the list, returning the recorded failures.
    pub fn into_entries(self) -> Vec<IoError> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// `Ok(())` if nothing was recorded, [`Error::Failed`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Failed`] carrying every recorded failure.
    pub fn into_result(self) -> Result<()> {
        let entries = self.into_entries();
        if entries.is_empty() {
            Ok(())
        } else {
            Err(Error::Failed(entries))
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<IoError>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Errors surfaced by the helper API once a batch has finished.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// One or more operations recorded failures
    #[error("{} operation error(s), first: {}", .0.len(), first_message(.0))]
    Failed(Vec<IoError>),

    /// The batch was stopped through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Recorded failures carried by this error.
    pub fn entries(&self) -> &[IoError] {
        match self {
            Self::Failed(entries) => entries,
            Self::Cancelled => &[],
        }
    }
}

fn first_message(entries: &[IoError]) -> String {
    entries
        .first()
        .map_or_else(|| "none".to_owned(), ToString::to_string)
}
