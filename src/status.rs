//! Outcome of a single operation contract call.

use std::fmt;

/// What an operation contract did.
///
/// Every failing status has already been recorded in the request's
/// [`ErrorList`](crate::ErrorList), except [`Status::Cancelled`], which is a
/// user-initiated stop and never produces an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use = "a failed operation must be checked to decide whether to continue a batch"]
pub enum Status {
    /// The filesystem change was completed.
    Done,
    /// The confirmation callback declined an overwrite; nothing was changed.
    Declined,
    /// Stopped through the cancellation token; partial output is left in place.
    Cancelled,
    /// A failure occurred and was recorded.
    Failed,
    /// Refused up front: the destination already exists under a strict
    /// strategy. Recorded as well.
    Refused,
}

impl Status {
    /// Integer status: `0` success, `>0` recorded failure, `<0` pre-flight
    /// refusal.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Done | Self::Declined => 0,
            Self::Cancelled | Self::Failed => 1,
            Self::Refused => -1,
        }
    }

    /// Whether the batch can treat this unit of work as finished.
    #[must_use]
    pub fn is_success(self) -> bool {
        self.code() == 0
    }

    /// Short lowercase name, used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Refused => "refused",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
