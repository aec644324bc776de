//! Staff access to repository content.
//!
//! Students upload files with whatever mode their machine gave them. After
//! every intake each top-level repository entry gets group read/write (and
//! search for directories), and is handed to the staff owner/group when one
//! is configured.

use crate::config::Config;
use crate::error::{IntakeError, Result};
use crate::process::{Invocation, ProcessRunner};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Mode bits added to files.
pub const FILE_GROUP_BITS: u32 = 0o660;

/// Mode bits added to directories.
pub const DIR_GROUP_BITS: u32 = 0o770;

/// `owner:group`, `owner` or `:group`, when either is configured.
pub fn ownership_arg(config: &Config) -> Option<String> {
    match (&config.staff_owner, &config.staff_group) {
        (None, None) => None,
        (Some(owner), None) => Some(owner.clone()),
        (None, Some(group)) => Some(format!(":{}", group)),
        (Some(owner), Some(group)) => Some(format!("{}:{}", owner, group)),
    }
}

/// Top-level entries of `repo_path` whose names do not start with `.`.
pub fn visible_entries(repo_path: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |e: std::io::Error| {
        IntakeError::UserError(format!(
            "failed to read repository '{}': {}",
            repo_path.display(),
            e
        ))
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(repo_path).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Apply the staff access policy to every visible top-level entry.
///
/// Returns the entries that were updated.
pub fn grant_staff_access(
    repo_path: &Path,
    config: &Config,
    runner: &dyn ProcessRunner,
) -> Result<Vec<PathBuf>> {
    let entries = visible_entries(repo_path)?;
    let owner = ownership_arg(config);

    for entry in &entries {
        add_group_bits(entry)?;

        if let Some(arg) = &owner {
            let invocation = Invocation::new(
                "chown",
                vec![arg.clone(), entry.to_string_lossy().into_owned()],
                repo_path,
            );
            let output = runner.run(&invocation)?;
            if !output.success() {
                return Err(IntakeError::UserError(format!(
                    "`{}` failed: {}",
                    invocation,
                    output.stderr.trim()
                )));
            }
        }
    }

    Ok(entries)
}

fn add_group_bits(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        IntakeError::UserError(format!("failed to stat '{}': {}", path.display(), e))
    })?;
    if metadata.file_type().is_symlink() {
        return Ok(());
    }

    let bits = if metadata.is_dir() {
        DIR_GROUP_BITS
    } else {
        FILE_GROUP_BITS
    };
    let mut permissions = metadata.permissions();
    permissions.set_mode(permissions.mode() | bits);

    fs::set_permissions(path, permissions).map_err(|e| {
        IntakeError::UserError(format!(
            "failed to set permissions on '{}': {}",
            path.display(),
            e
        ))
    })
}
