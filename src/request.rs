//! Per-task context passed to every operation contract.
//!
//! This module provides [`Request`], the explicit context an operation runs
//! against, [`ConflictStrategy`] for handling existing destinations and
//! [`CancelToken`] for cooperative cancellation.
//!
//! # Example
//!
//! ```
//! use fsexec::{CancelToken, ErrorList, Estimator, Request};
//!
//! let errors = ErrorList::new();
//! let progress = Estimator::new();
//! let cancel = CancelToken::new();
//!
//! let request = Request::new(&errors)
//!     .with_progress(&progress)
//!     .with_cancel_token(cancel.clone())
//!     .cancellable();
//! assert!(request.cancellable);
//! ```

use crate::error::ErrorList;
use crate::progress::{NoProgress, Progress};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Behavior when a copy or link destination already exists.
///
/// # Default
///
/// The default is [`ConflictStrategy::Fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ConflictStrategy {
    /// Any existing destination is an error.
    #[default]
    Fail,
    /// The destination is removed first, then written from scratch.
    Overwrite,
    /// Bytes are written starting at the destination's current end.
    ///
    /// The source is read from the same offset, so a partially copied
    /// destination is completed rather than duplicated.
    AppendToFile,
}

impl ConflictStrategy {
    /// Whether an existing destination may be replaced.
    ///
    /// This is the boolean the link creator works with: appending has no
    /// meaning for a symbolic link, so it collapses to overwriting.
    #[must_use]
    pub fn allows_overwrite(self) -> bool {
        !matches!(self, Self::Fail)
    }
}

/// Confirmation callback consulted before a destructive overwrite.
///
/// Receives the request, the source and the destination. Returning `false`
/// turns the operation into a no-op success.
pub type Confirm<'a> = dyn Fn(&Request<'_>, &Path, &Path) -> bool + 'a;

static NO_PROGRESS: NoProgress = NoProgress;

/// Context shared by the operation contracts.
///
/// A request is built fresh for each unit of work and consumed by exactly one
/// contract call. The error list and progress sink it points at belong to the
/// caller and outlive it.
#[derive(Clone)]
pub struct Request<'a> {
    /// Whether mid-operation cancellation checks are honored (default: false)
    pub cancellable: bool,

    /// Overwrite confirmation; `None` means overwrite proceeds without asking
    /// whenever the strategy permits it
    pub confirm: Option<&'a Confirm<'a>>,

    /// Progress estimator updated as work is done
    pub progress: &'a dyn Progress,

    /// Accumulator every failure is appended to
    pub errors: &'a ErrorList,

    /// Cancellation signal polled by long-running operations
    pub cancel: CancelToken,
}

impl<'a> Request<'a> {
    /// Create a request recording into `errors`, with no progress reporting,
    /// no confirmation and cancellation checks disabled.
    pub fn new(errors: &'a ErrorList) -> Self {
        Self {
            cancellable: false,
            confirm: None,
            progress: &NO_PROGRESS,
            errors,
            cancel: CancelToken::new(),
        }
    }

    /// Report progress to `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Ask `confirm` before overwriting an existing destination
    #[must_use]
    pub fn with_confirm(mut self, confirm: &'a Confirm<'a>) -> Self {
        self.confirm = Some(confirm);
        self
    }

    /// Poll `token` for cancellation requests
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Honor cancellation requests mid-operation
    #[must_use]
    pub fn cancellable(mut self) -> Self {
        self.cancellable = true;
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellable && self.cancel.is_requested()
    }
}

impl fmt::Debug for Request<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("cancellable", &self.cancellable)
            .field("confirm", &self.confirm.is_some())
            .field("errors", &self.errors)
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

/// Externally-set cancellation signal.
///
/// Clones share the same flag. The executor only ever reads it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that has not been triggered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing flag, e.g. one set from a signal handler.
    #[must_use]
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self(flag)
    }

    /// Request cancellation.
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
