//! Path utilities shared by the operations and platform backends.

use std::path::{Component, Path, PathBuf};

/// Every successive prefix of `path` that names a directory entry, shallowest
/// first.
///
/// Platform prefixes (drive designators, UNC shares) and the root never yield
/// a prefix of their own, so `/a/b` gives `/a` then `/a/b`, and `C:\a` gives
/// `C:\a` alone.
pub(crate) fn prefixes(path: &Path) -> Vec<PathBuf> {
    let mut partial = PathBuf::new();
    let mut result = Vec::new();
    for component in path.components() {
        partial.push(component);
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Normal(_) => result.push(partial.clone()),
        }
    }
    result
}

/// Quote `path` as a single command-line argument for a Windows process.
///
/// Returns `None` when the path cannot be represented: it is not valid UTF-8,
/// or it contains a double quote or NUL, neither of which can appear in a
/// Windows file name. Trailing backslashes are doubled so they don't escape
/// the closing quote.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn quote_arg(path: &Path) -> Option<String> {
    let text = path.to_str()?;
    if text.contains(['"', '\0']) {
        return None;
    }

    let trailing = text.len() - text.trim_end_matches('\\').len();
    let mut quoted = String::with_capacity(text.len() + trailing + 2);
    quoted.push('"');
    quoted.push_str(text);
    quoted.extend(std::iter::repeat_n('\\', trailing));
    quoted.push('"');
    Some(quoted)
}
