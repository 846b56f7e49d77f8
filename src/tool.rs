use anyhow::{anyhow, ensure, Context};
use std::{
    ffi::OsStr,
    path::Path,
    process::{Command, Stdio},
};

fn describe(cmd: &OsStr, args: &[&OsStr]) -> String {
    std::iter::once(cmd)
        .chain(args.iter().copied())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a command with the terminal's stdio, so its own progress shows.
///
/// # Errors
///
/// Returns an [`Err`] if the command can not be spawned or exits non-zero.
pub fn run_interactive(
    cmd: impl AsRef<OsStr>,
    args: &[&OsStr],
    dir: Option<&Path>,
) -> anyhow::Result<()> {
    let cmd = cmd.as_ref();
    let mut command = Command::new(cmd);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    crate::trace!("Running `{}`", describe(cmd, args));

    let status = command
        .status()
        .with_context(|| format!("Failed to run `{}`", cmd.to_string_lossy()))?;

    ensure!(
        status.success(),
        anyhow!("Command `{}` failed with {status}", describe(cmd, args))
    );

    Ok(())
}

/// Runs a command with its output captured. On failure the captured output,
/// folded onto one line, becomes part of the error.
///
/// # Errors
///
/// Returns an [`Err`] if the command can not be spawned or exits non-zero.
pub fn run_quiet(cmd: impl AsRef<OsStr>, args: &[&OsStr], dir: &Path) -> anyhow::Result<()> {
    let cmd = cmd.as_ref();

    crate::trace!("Running `{}` in {}", describe(cmd, args), dir.display());

    let output = Command::new(cmd)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to run `{}`", cmd.to_string_lossy()))?;

    if output.status.success() {
        return Ok(());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = stderr
        .lines()
        .chain(stdout.lines())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("; ");

    if message.is_empty() {
        Err(anyhow!(
            "Command `{}` failed with {}",
            describe(cmd, args),
            output.status
        ))
    } else {
        Err(anyhow!(
            "Command `{}` failed with {}: {message}",
            describe(cmd, args),
            output.status
        ))
    }
}

/// The version-control client.
#[derive(Debug, Clone)]
pub struct Git<'a> {
    program: &'a str,
}

impl Default for Git<'_> {
    fn default() -> Self {
        Git { program: "git" }
    }
}

impl Git<'_> {
    /// Fetches only the latest snapshot of `source` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the clone fails.
    pub fn clone_shallow(&self, source: &str, dest: &Path) -> anyhow::Result<()> {
        run_interactive(
            self.program,
            &[
                OsStr::new("clone"),
                OsStr::new(source),
                dest.as_os_str(),
                OsStr::new("--depth"),
                OsStr::new("1"),
            ],
            None,
        )
    }

    /// Creates a fresh repository in `dir` and commits everything in it.
    /// A failure half way leaves the repository as it is.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] on the first failing step.
    pub fn reinit(&self, dir: &Path, message: &str) -> anyhow::Result<()> {
        run_quiet(self.program, &[OsStr::new("init")], dir)?;
        run_quiet(self.program, &[OsStr::new("add"), OsStr::new(".")], dir)?;
        run_quiet(
            self.program,
            &[OsStr::new("commit"), OsStr::new("-m"), OsStr::new(message)],
            dir,
        )
    }
}

/// The package manager used to install the template's dependencies.
#[derive(Debug, Clone)]
pub struct PackageManager<'a> {
    program: &'a str,
}

impl<'a> PackageManager<'a> {
    #[must_use]
    pub fn new(program: &'a str) -> Self {
        PackageManager { program }
    }

    /// Installs the dependencies declared by `manifest` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the manifest is missing, without running
    /// anything, or if the install command fails.
    pub fn install(&self, dir: &Path, manifest: &str) -> anyhow::Result<()> {
        let manifest_path = dir.join(manifest);

        ensure!(
            manifest_path.is_file(),
            anyhow!(
                "No {manifest} found in {}; the template does not look like a project",
                dir.display()
            )
        );

        run_interactive(self.program, &[OsStr::new("install")], Some(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_joins_program_and_args() {
        assert_eq!(
            describe(
                OsStr::new("git"),
                &[OsStr::new("commit"), OsStr::new("-m"), OsStr::new("hi")]
            ),
            "git commit -m hi"
        );
    }

    #[test]
    fn missing_program_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_quiet("sprout-no-such-program", &[], tmp.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to run `sprout-no-such-program`"));
    }

    #[cfg(unix)]
    #[test]
    fn quiet_failure_carries_the_output() {
        let tmp = tempfile::tempdir().unwrap();
        let err = run_quiet(
            "sh",
            &[OsStr::new("-c"), OsStr::new("echo broken >&2; exit 3")],
            tmp.path(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("broken"), "{err}");
    }

    #[cfg(unix)]
    #[test]
    fn interactive_reports_exit_status() {
        assert!(run_interactive("true", &[], None).is_ok());
        assert!(run_interactive("false", &[], None).is_err());
    }

    #[test]
    fn install_requires_the_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let err = PackageManager::new("sprout-no-such-program")
            .install(tmp.path(), "package.json")
            .unwrap_err();

        assert!(err.to_string().contains("No package.json found"), "{err}");
    }
}
