//! Directory clearing and file copying.

use crate::error::{IntakeError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path};

/// Create `dir` and its parents; an existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        IntakeError::UserError(format!(
            "failed to create directory '{}': {}",
            dir.display(),
            e
        ))
    })
}

/// Recursively remove everything inside `dir`, then make sure it exists.
pub fn clear_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        let entries = fs::read_dir(dir).map_err(|e| {
            IntakeError::UserError(format!(
                "failed to read directory '{}': {}",
                dir.display(),
                e
            ))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| {
                    IntakeError::UserError(format!(
                        "failed to read entry of '{}': {}",
                        dir.display(),
                        e
                    ))
                })?
                .path();

            // symlink_metadata so a link to a directory is unlinked, not followed
            let is_dir = fs::symlink_metadata(&path)
                .map(|m| m.is_dir())
                .unwrap_or(false);
            let removed = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| {
                IntakeError::UserError(format!("failed to remove '{}': {}", path.display(), e))
            })?;
        }
    }

    ensure_dir(dir)
}

/// Remove `dir` and everything in it; a missing directory is fine.
pub fn remove_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(IntakeError::UserError(format!(
            "failed to remove '{}': {}",
            dir.display(),
            e
        ))),
    }
}

/// Remove one file; a missing file is fine.
pub fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(IntakeError::UserError(format!(
            "failed to remove '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Check that `name` is a single plain directory name.
///
/// Rejects empty names, separators, `.`/`..`, absolute paths and a leading
/// `-`, so joining `name` onto a root can never leave that root.
pub fn check_dir_name(what: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if !single || name.contains(['/', '\\']) || name.starts_with('-') {
        return Err(IntakeError::UserError(format!(
            "invalid {} '{}': must be a plain directory name",
            what, name
        )));
    }
    Ok(())
}

/// Copy one file, creating the destination's parent directories.
///
/// A missing source is reported as [`IntakeError::MissingFile`].
pub fn copy_file(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }

    match fs::copy(source, destination) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(IntakeError::MissingFile(source.display().to_string()))
        }
        Err(e) => Err(IntakeError::UserError(format!(
            "failed to copy '{}' to '{}': {}",
            source.display(),
            destination.display(),
            e
        ))),
    }
}
