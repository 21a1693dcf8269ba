//! Shared helpers for the library integration tests.

#![allow(dead_code)]

use fsexec::{CancelToken, Progress};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One call to [`Progress::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub items: u64,
    pub bytes: u64,
}

/// Progress sink that keeps every update, optionally requesting
/// cancellation once a number of byte reports have been seen.
#[derive(Default)]
pub struct Recorder {
    updates: Mutex<Vec<Update>>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(reports: usize, token: CancelToken) -> Self {
        Self {
            updates: Mutex::default(),
            cancel_after: Some((reports, token)),
        }
    }

    pub fn updates(&self) -> Vec<Update> {
        self.updates.lock().unwrap().clone()
    }

    /// Byte deltas reported without completing an item.
    pub fn byte_reports(&self) -> Vec<u64> {
        self.updates()
            .iter()
            .filter(|u| u.items == 0 && u.bytes > 0)
            .map(|u| u.bytes)
            .collect()
    }

    /// Number of updates that completed an item.
    pub fn completions(&self) -> usize {
        self.updates().iter().filter(|u| u.items > 0).count()
    }

    pub fn total_bytes(&self) -> u64 {
        self.updates().iter().map(|u| u.bytes).sum()
    }
}

impl Progress for Recorder {
    fn update(&self, source: Option<&Path>, destination: Option<&Path>, items: u64, bytes: u64) {
        let mut updates = self.updates.lock().unwrap();
        updates.push(Update {
            source: source.map(Path::to_path_buf),
            destination: destination.map(Path::to_path_buf),
            items,
            bytes,
        });

        if let Some((limit, token)) = &self.cancel_after {
            let seen = updates.iter().filter(|u| u.items == 0 && u.bytes > 0).count();
            if seen >= *limit {
                token.request();
            }
        }
    }
}

/// Deterministic, non-repeating-per-block content.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
