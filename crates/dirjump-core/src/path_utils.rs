//! Path canonicalization and display helpers.

use crate::error::{Error, Result};
use crate::types::Shortcut;
use std::path::{Path, PathBuf};

/// Canonicalize a path, resolving symlinks and producing an absolute path.
///
/// On Windows, uses `dunce::canonicalize` to avoid the `\\?\` extended-length
/// path prefix that `std::fs::canonicalize` produces.
#[cfg(windows)]
pub fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    dunce::canonicalize(path.as_ref())
        .map_err(|e| Error::Canonicalize(path.as_ref().to_path_buf(), e))
}

#[cfg(not(windows))]
pub fn canonicalize(path: impl AsRef<Path>) -> Result<PathBuf> {
    std::fs::canonicalize(path.as_ref())
        .map_err(|e| Error::Canonicalize(path.as_ref().to_path_buf(), e))
}

/// Replace a leading `$HOME` with `~` for display.
pub fn compress_home(path: &str, home: Option<&str>) -> String {
    let Some(home) = home.filter(|h| !h.is_empty()) else {
        return path.to_string();
    };
    if path == home {
        return "~".to_string();
    }
    match path.strip_prefix(home) {
        Some(rest) if rest.starts_with('/') => format!("~{rest}"),
        _ => path.to_string(),
    }
}

/// Substitute the longest matching shortcut prefix, rendering
/// `/home/u/project/src` with a shortcut `proj -> /home/u/project` as
/// `[proj]/src`. Falls back to `~` compression when no shortcut applies.
pub fn compress_with_shortcuts(path: &str, shortcuts: &[Shortcut], home: Option<&str>) -> String {
    let mut best: Option<&Shortcut> = None;
    for shortcut in shortcuts {
        let covers = path == shortcut.path
            || (path.starts_with(&shortcut.path)
                && path.as_bytes().get(shortcut.path.len()) == Some(&b'/'));
        if covers && best.map_or(true, |b| shortcut.path.len() > b.path.len()) {
            best = Some(shortcut);
        }
    }

    match best {
        Some(shortcut) => format!("[{}]{}", shortcut.name, &path[shortcut.path.len()..]),
        None => compress_home(path, home),
    }
}
