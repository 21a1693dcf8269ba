//! Progress reporting.
//!
//! Operations report `(source label, destination label, items delta, bytes
//! delta)` tuples through the [`Progress`] trait. A `None` label means "keep
//! whatever is currently displayed".

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Sink for incremental progress updates.
pub trait Progress {
    /// Record `items` completed items and `bytes` processed bytes, optionally
    /// switching the displayed source/destination labels.
    fn update(&self, source: Option<&Path>, destination: Option<&Path>, items: u64, bytes: u64);
}

/// Progress sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&self, _: Option<&Path>, _: Option<&Path>, _: u64, _: u64) {}
}

/// Thread-safe counting estimator.
///
/// Accumulates items and bytes and remembers the labels of the item in
/// flight. With totals set, [`Estimator::percentage`] derives completion from
/// bytes, falling back to items when the byte total is unknown.
#[derive(Debug, Default)]
pub struct Estimator {
    items: AtomicU64,
    bytes: AtomicU64,
    total_items: u64,
    total_bytes: u64,
    current: Mutex<(Option<PathBuf>, Option<PathBuf>)>,
}

impl Estimator {
    /// Create an estimator without totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator expecting `items` items totalling `bytes` bytes.
    #[must_use]
    pub fn with_totals(items: u64, bytes: u64) -> Self {
        Self {
            total_items: items,
            total_bytes: bytes,
            ..Self::default()
        }
    }

    /// Items completed so far.
    pub fn items(&self) -> u64 {
        self.items.load(Ordering::Relaxed)
    }

    /// Bytes processed so far.
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Labels of the item currently in flight.
    pub fn current(&self) -> (Option<PathBuf>, Option<PathBuf>) {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Completion percentage (0.0 to 100.0), or 0.0 without totals.
    pub fn percentage(&self) -> f64 {
        if self.total_bytes > 0 {
            (self.bytes() as f64 / self.total_bytes as f64 * 100.0).min(100.0)
        } else if self.total_items > 0 {
            (self.items() as f64 / self.total_items as f64 * 100.0).min(100.0)
        } else {
            0.0
        }
    }
}

impl Progress for Estimator {
    fn update(&self, source: Option<&Path>, destination: Option<&Path>, items: u64, bytes: u64) {
        if source.is_some() || destination.is_some() {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(source) = source {
                current.0 = Some(source.to_path_buf());
            }
            if let Some(destination) = destination {
                current.1 = Some(destination.to_path_buf());
            }
        }
        self.items.fetch_add(items, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
    }
}

/// Progress bar counting bytes, labelled with the current source.
#[cfg(feature = "progress")]
impl Progress for ProgressBar {
    fn update(&self, source: Option<&Path>, _destination: Option<&Path>, _items: u64, bytes: u64) {
        if let Some(source) = source {
            self.set_message(source.display().to_string());
        }
        self.inc(bytes);
    }
}

/// Create a default byte-counting progress bar
#[cfg(feature = "progress")]
#[must_use]
pub fn create_progress_bar(total_bytes: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
