use anyhow::Context;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

/// What [`ensure_entry`] did to the ignore file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreUpdate {
    Created,
    Appended,
    Unchanged,
}

/// Makes sure the ignore file at `path` mentions `entry`.
///
/// A missing file is created holding only `entry`. An existing file that
/// already contains `entry` anywhere (substring match, so `.env.local` also
/// counts) is left untouched. Otherwise `entry` is appended on a new line.
///
/// # Errors
///
/// Returns an [`Err`] if the file can not be read, created or appended to.
pub fn ensure_entry(path: &Path, entry: &str) -> anyhow::Result<IgnoreUpdate> {
    if !path.exists() {
        fs::write(path, format!("{entry}\n"))
            .with_context(|| format!("Could not create {}", path.display()))?;
        return Ok(IgnoreUpdate::Created);
    }

    let existing =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;

    if existing.contains(entry) {
        return Ok(IgnoreUpdate::Unchanged);
    }

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;

    write!(file, "\n{entry}\n").with_context(|| format!("Could not update {}", path.display()))?;

    Ok(IgnoreUpdate::Appended)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_file_with_single_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".gitignore");

        assert_eq!(ensure_entry(&path, ".env").unwrap(), IgnoreUpdate::Created);
        assert_eq!(fs::read_to_string(&path).unwrap(), ".env\n");
    }

    #[test]
    fn existing_entry_is_left_alone_on_repeated_runs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".gitignore");
        fs::write(&path, "node_modules\n.env\n").unwrap();

        for _ in 0..2 {
            assert_eq!(ensure_entry(&path, ".env").unwrap(), IgnoreUpdate::Unchanged);
        }

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "node_modules\n.env\n");
        assert_eq!(contents.matches(".env").count(), 1);
    }

    #[test]
    fn missing_entry_is_appended_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".gitignore");
        fs::write(&path, "node_modules").unwrap();

        assert_eq!(ensure_entry(&path, ".env").unwrap(), IgnoreUpdate::Appended);
        assert_eq!(ensure_entry(&path, ".env").unwrap(), IgnoreUpdate::Unchanged);

        assert_eq!(fs::read_to_string(&path).unwrap(), "node_modules\n.env\n");
    }

    #[test]
    fn substring_counts_as_present() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".gitignore");
        fs::write(&path, ".env.local\n").unwrap();

        assert_eq!(ensure_entry(&path, ".env").unwrap(), IgnoreUpdate::Unchanged);
    }
}
