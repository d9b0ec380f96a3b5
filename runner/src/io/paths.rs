//! Path expansion and access checks against the real filesystem.

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use nix::unistd::{AccessFlags, User, access};
use tracing::debug;

/// Expand a leading `~` or `~user` the way a login shell would.
///
/// Paths that do not start with `~`, or whose user cannot be resolved, are
/// returned unchanged.
pub fn expand_user(path: &str) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };

    let (user, tail) = match rest.find(is_separator) {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    let home = if user.is_empty() {
        dirs::home_dir()
    } else {
        User::from_name(user).ok().flatten().map(|u| u.dir)
    };

    let Some(home) = home else {
        return PathBuf::from(path);
    };
    // The tail keeps its leading separator, so a trailing one survives too.
    let home = home.to_string_lossy();
    let home = home.trim_end_matches(is_separator);
    let expanded = if home.is_empty() && tail.is_empty() {
        PathBuf::from(MAIN_SEPARATOR.to_string())
    } else {
        PathBuf::from(format!("{home}{tail}"))
    };
    debug!(from = path, to = %expanded.display(), "expanded home directory");
    expanded
}

/// True when the raw path names a directory rather than a file.
pub fn ends_with_separator(path: &str) -> bool {
    path.ends_with(is_separator)
}

/// Directory a file at `path` would be created in.
///
/// A bare file name resolves to the current directory.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    }
}

/// `access(2)` with `R_OK` for the real user. Missing paths are not readable.
pub fn is_readable(path: &Path) -> bool {
    access(path, AccessFlags::R_OK).is_ok()
}

/// `access(2)` with `W_OK` for the real user.
pub fn is_writable(path: &Path) -> bool {
    access(path, AccessFlags::W_OK).is_ok()
}

fn is_separator(c: char) -> bool {
    c == MAIN_SEPARATOR || c == '/'
}
