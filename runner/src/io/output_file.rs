//! Persistence of captured goss output.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::{Result, RunError};
use crate::io::paths::{ends_with_separator, expand_user, is_writable, parent_dir};

/// Resolve and check an `output_file` parameter.
///
/// The raw value is `~` expanded, must name a file rather than a directory,
/// and must sit in an existing, writable directory. Nothing is created here.
pub fn resolve_output_path(raw: &str) -> Result<PathBuf> {
    let path = expand_user(raw);
    let shown = path.display().to_string();

    if ends_with_separator(&shown) {
        return Err(RunError::configuration(format!(
            "output_file must be a file. Actually : {shown}"
        )));
    }

    let dir = parent_dir(&path);
    if !dir.exists() {
        return Err(RunError::configuration(format!(
            "directory {} does not exists",
            dir.display()
        )));
    }
    if !is_writable(&dir) {
        return Err(RunError::configuration(format!(
            "Destination {} not writable",
            dir.display()
        )));
    }

    Ok(path)
}

/// Truncate-create `path` and write `contents` into it.
///
/// The handle is closed when this function returns, on success or error.
#[instrument(skip(contents), fields(path = %path.display(), bytes = contents.len()))]
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| RunError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    debug!("wrote goss output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_trailing_separator() {
        let temp = tempfile::tempdir().expect("tempdir");
        let raw = format!("{}/", temp.path().display());
        let err = resolve_output_path(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("output_file must be a file. Actually : {raw}")
        );
    }

    #[test]
    fn resolve_rejects_missing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let missing = temp.path().join("nope");
        let raw = missing.join("out.txt");
        let err = resolve_output_path(&raw.display().to_string()).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("directory {} does not exists", missing.display())
        );
    }

    #[cfg(unix)]
    #[test]
    fn resolve_rejects_unwritable_directory() {
        use std::os::unix::fs::PermissionsExt;

        if nix::unistd::geteuid().is_root() {
            return;
        }
        let temp = tempfile::tempdir().expect("tempdir");
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).expect("mkdir");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).expect("chmod");

        let result = resolve_output_path(&locked.join("out.txt").display().to_string());
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).expect("restore");
        assert_eq!(
            result.unwrap_err().to_string(),
            format!("Destination {} not writable", locked.display())
        );
    }

    #[test]
    fn resolve_accepts_existing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let raw = temp.path().join("out.txt");
        let path = resolve_output_path(&raw.display().to_string()).expect("resolve");
        assert_eq!(path, raw);
        assert!(!path.exists());
    }

    #[test]
    fn write_truncates_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("out.txt");
        std::fs::write(&path, "stale content that is longer").expect("seed");
        write_output(&path, "fresh").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "fresh");
    }

    #[test]
    fn write_into_directory_path_is_io_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = write_output(temp.path(), "x").unwrap_err();
        assert!(matches!(err, RunError::Io { .. }));
    }
}
