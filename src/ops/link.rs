//! Symbolic link creation.

use super::conflict::{Resolution, resolve};
use crate::platform::Platform;
use crate::request::{ConflictStrategy, Request};
use crate::status::Status;
use std::fs;
use std::path::Path;

pub(crate) fn create_link<P: Platform>(
    platform: &P,
    request: &Request<'_>,
    target: &Path,
    link: &Path,
    strategy: ConflictStrategy,
) -> Status {
    create_link_for(platform, request, target, link, strategy, target)
}

/// Like [`create_link`], but the confirmation callback is shown `origin` as
/// the source. The copy engine passes the link it is recreating.
pub(crate) fn create_link_for<P: Platform>(
    platform: &P,
    request: &Request<'_>,
    target: &Path,
    link: &Path,
    strategy: ConflictStrategy,
    origin: &Path,
) -> Status {
    #[cfg(feature = "tracing")]
    tracing::debug!(link = %link.display(), points_to = %target.display(), ?strategy, "create link");

    let exists = fs::symlink_metadata(link).is_ok();
    match resolve(request, strategy, origin, link, exists, link) {
        Resolution::Proceed => {
            platform.create_link(request, target, link, strategy.allows_overwrite())
        }
        Resolution::Decline => Status::Declined,
        Resolution::Refuse => Status::Refused,
    }
}
