use anyhow::Context;
use std::{io::ErrorKind, path::Path};
use walkdir::WalkDir;

/// Version-control metadata directory dropped from freshly cloned templates.
pub const VCS_DIR: &str = ".git";

/// Removes a single path, whatever it is. Symlinks are unlinked, never
/// followed.
///
/// # Errors
///
/// Returns an [`Err`] on any IO error.
pub fn remove_path(path: &Path) -> anyhow::Result<()> {
    let file_type = path.symlink_metadata()?.file_type();

    if file_type.is_symlink() {
        // https://stackoverflow.com/questions/76351822/creating-and-removing-symlinks
        #[cfg(target_os = "windows")]
        {
            if path.is_dir() {
                std::fs::remove_dir(path)?;
                return Ok(());
            }
        }

        std::fs::remove_file(path)?;
    } else if file_type.is_dir() {
        fs_extra::dir::remove(path)?;
    } else {
        std::fs::remove_file(path)?;
    }

    Ok(())
}

/// Clears the read-only flag on `path` and everything below it.
fn make_writable(path: &Path) -> anyhow::Result<()> {
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry?;
        if entry.path_is_symlink() {
            continue;
        }

        let mut perms = entry.metadata()?.permissions();
        if perms.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            perms.set_readonly(false);
            std::fs::set_permissions(entry.path(), perms)?;
        }
    }

    Ok(())
}

fn is_permission_denied(err: &anyhow::Error) -> bool {
    if let Some(e) = err.downcast_ref::<std::io::Error>() {
        e.kind() == ErrorKind::PermissionDenied
    } else if let Some(e) = err.downcast_ref::<fs_extra::error::Error>() {
        matches!(e.kind, fs_extra::error::ErrorKind::PermissionDenied)
    } else {
        false
    }
}

/// Removes `path`, retrying once with write permissions restored if the
/// first attempt is denied.
fn force_remove(path: &Path) -> anyhow::Result<()> {
    match remove_path(path) {
        Err(e) if is_permission_denied(&e) => {
            crate::trace!("Permission denied on {}, retrying", path.display());
            make_writable(path)?;
            remove_path(path)
        }
        res => res,
    }
}

/// Deletes every immediate entry of `dir`, keeping `dir` itself.
///
/// # Errors
///
/// Returns an [`Err`] on the first entry that can not be removed. Entries
/// removed before it stay removed.
pub fn clear_dir(dir: &Path) -> anyhow::Result<()> {
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        crate::trace!("Removing {}", entry.path().display());
        force_remove(entry.path())
            .with_context(|| format!("Failed to remove {}", entry.path().display()))?;
    }

    Ok(())
}

/// Deletes the version-control metadata directory under `dir`, if any.
///
/// # Errors
///
/// Returns an [`Err`] if the directory exists and can not be removed.
pub fn remove_vcs_metadata(dir: &Path) -> anyhow::Result<()> {
    let vcs = dir.join(VCS_DIR);

    if vcs.symlink_metadata().is_err() {
        return Ok(());
    }

    force_remove(&vcs).with_context(|| format!("Failed to remove {}", vcs.display()))
}
