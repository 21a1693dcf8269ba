//! Conflict resolution shared by the copy engine and the link creator.

use crate::error::ErrorCode;
use crate::request::{ConflictStrategy, Request};
use std::path::Path;

/// Decision for an operation whose destination may already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Go ahead with the change.
    Proceed,
    /// The caller declined the overwrite: leave everything as is.
    Decline,
    /// The strategy forbids touching an existing destination. Already recorded.
    Refuse,
}

/// Decide whether to proceed when `dst` may already exist.
///
/// | Strategy | Destination exists | Outcome |
/// |----------|--------------------|---------|
/// | any | no | proceed |
/// | `Fail` | yes | "already exists" recorded against `blame`, refuse |
/// | `Overwrite`, `AppendToFile` | yes | ask `confirm` once if present, otherwise proceed |
pub(crate) fn resolve(
    request: &Request<'_>,
    strategy: ConflictStrategy,
    src: &Path,
    dst: &Path,
    exists: bool,
    blame: &Path,
) -> Resolution {
    if !exists {
        return Resolution::Proceed;
    }

    match strategy {
        ConflictStrategy::Fail => {
            request
                .errors
                .append_code(blame, ErrorCode::already_exists());
            Resolution::Refuse
        }
        ConflictStrategy::Overwrite | ConflictStrategy::AppendToFile => match request.confirm {
            Some(confirm) if !confirm(request, src, dst) => {
                #[cfg(feature = "tracing")]
                tracing::info!(dst = %dst.display(), "overwrite declined");
                Resolution::Decline
            }
            _ => Resolution::Proceed,
        },
    }
}
