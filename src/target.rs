use anyhow::{anyhow, ensure, Context};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Sentinel accepted on the command line for "use the current directory".
pub const CURRENT_DIR: &str = ".";

/// Where the new project is materialized and how it is called in messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    path: PathBuf,
    name: String,
}

/// Existing content found at the target path before anything is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    None,
    /// The directory has at least one entry
    NonEmpty,
    /// The project marker file exists
    Marker,
}

impl Conflict {
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Conflict::None)
    }
}

impl Target {
    /// Resolves the destination argument against `cwd`.
    ///
    /// An absent or empty argument, or `.`, selects `cwd` itself and names the project
    /// after its last path segment. Anything else is joined onto `cwd` (an
    /// absolute argument replaces it) and the raw argument becomes the name.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the current directory is selected and `cwd` has
    /// no final segment (e.g. `/`).
    pub fn resolve(arg: Option<&str>, cwd: &Path) -> anyhow::Result<Self> {
        match arg {
            None | Some("" | CURRENT_DIR) => {
                let name = cwd
                    .file_name()
                    .context("Current directory has no name to use as project name")?
                    .to_string_lossy()
                    .into_owned();

                Ok(Target {
                    path: cwd.to_path_buf(),
                    name,
                })
            }
            Some(arg) => Ok(Target {
                path: cwd.join(arg),
                name: arg.to_string(),
            }),
        }
    }

    /// Returns a reference to the absolute path of this [`Target`].
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Returns the display name of this [`Target`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inspects the target path without modifying it.
    ///
    /// A missing path is never a conflict. A directory with any entry is
    /// [`Conflict::NonEmpty`], unless the marker file is among its entries,
    /// which is [`Conflict::Marker`].
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the path exists but is not a directory, or if
    /// it can not be read.
    pub fn conflict(&self, marker: &str) -> anyhow::Result<Conflict> {
        if !self.path.exists() {
            return Ok(Conflict::None);
        }

        ensure!(
            self.path.is_dir(),
            anyhow!("Path {} exists but is not a directory", self.path.display())
        );

        if self.path.join(marker).exists() {
            return Ok(Conflict::Marker);
        }

        let first = WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .next()
            .transpose()
            .with_context(|| format!("Failed to read directory {}", self.path.display()))?;

        Ok(if first.is_some() {
            Conflict::NonEmpty
        } else {
            Conflict::None
        })
    }
}
