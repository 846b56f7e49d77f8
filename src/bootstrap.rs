use lazy_format::lazy_format;
use owo_colors::{OwoColorize, Style, Stream};
use std::fmt::Display;

use crate::{
    config::Settings,
    fsops,
    ignore::{self, IgnoreUpdate},
    indicator::Spinner,
    prompt::Prompter,
    report::Guidance,
    styled,
    target::{Conflict, Target},
    tool::{Git, PackageManager},
};

/// How a run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user did not want the existing content cleared
    Declined,
}

fn paint(style: Style, text: impl Display) -> String {
    text.if_supports_color(Stream::Stdout, |s| s.style(style))
        .to_string()
}

/// Turns a [`Target`] into a fresh project, one step after another.
///
/// Any failing step ends the run and leaves the target as the last
/// successful step left it.
pub struct Bootstrap<'a> {
    target: Target,
    settings: &'a Settings,
    git: Git<'a>,
}

impl<'a> Bootstrap<'a> {
    #[must_use]
    pub fn new(target: Target, settings: &'a Settings) -> Self {
        Bootstrap {
            target,
            settings,
            git: Git::default(),
        }
    }

    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Runs every step. `prompter` is only used when the target already has
    /// content.
    ///
    /// # Errors
    ///
    /// Returns the first error of any step.
    pub fn run(&self, prompter: &mut dyn Prompter) -> anyhow::Result<Outcome> {
        let conflict = self.target.conflict(self.settings.manifest())?;
        crate::trace!(
            "Target {} ({}): {conflict:?}",
            self.target.path().display(),
            self.target.name()
        );

        if conflict.is_conflict() {
            if !self.confirm_clear(prompter, conflict)? {
                styled!(Style::new().red(), "Project creation aborted.");
                return Ok(Outcome::Declined);
            }

            self.clear()?;
        }

        self.fetch()?;
        self.strip_history()?;
        self.ignore_secrets()?;
        self.reinit()?;

        if self.settings.skip_install() {
            crate::info!("Skipping dependency installation");
        } else {
            self.install()?;
        }

        Guidance {
            name: self.target.name(),
            package_manager: self.settings.package_manager(),
            start_script: self.settings.start_script(),
            install_pending: self.settings.skip_install(),
        }
        .print();

        Ok(Outcome::Completed)
    }

    fn confirm_clear(&self, prompter: &mut dyn Prompter, conflict: Conflict) -> anyhow::Result<bool> {
        if self.settings.assume_yes() {
            crate::trace!("Clearing without asking ({conflict:?})");
            return Ok(true);
        }

        let question = format!(
            "Directory {} already exists and is not empty. Do you want to clear the directory and continue? (y/n): ",
            self.target.path().display()
        );

        prompter.confirm(&question)
    }

    fn clear(&self) -> anyhow::Result<()> {
        let spinner = Spinner::start(lazy_format!(
            "Clearing directory contents of {}...",
            self.target.path().display()
        ));
        fsops::clear_dir(self.target.path())?;
        spinner.stop();

        Ok(())
    }

    fn fetch(&self) -> anyhow::Result<()> {
        let spinner = Spinner::start(paint(
            Style::new().bright_magenta(),
            lazy_format!("Cloning repository into {}...", self.target.path().display()),
        ));
        spinner.suspend(|| {
            self.git
                .clone_shallow(self.settings.template(), self.target.path())
        })?;
        spinner.stop();

        Ok(())
    }

    fn strip_history(&self) -> anyhow::Result<()> {
        let spinner = Spinner::start(paint(
            Style::new().cyan(),
            lazy_format!("Removing {} folder...", fsops::VCS_DIR),
        ));
        fsops::remove_vcs_metadata(self.target.path())?;
        spinner.stop();

        Ok(())
    }

    fn ignore_secrets(&self) -> anyhow::Result<()> {
        let path = self.target.path().join(self.settings.ignore_file());

        match ignore::ensure_entry(&path, self.settings.secrets_entry())? {
            IgnoreUpdate::Created => crate::trace!("Created {}", path.display()),
            IgnoreUpdate::Appended => crate::trace!("Added entry to {}", path.display()),
            IgnoreUpdate::Unchanged => crate::trace!("{} already ignores secrets", path.display()),
        }

        Ok(())
    }

    fn reinit(&self) -> anyhow::Result<()> {
        let spinner = Spinner::start(paint(
            Style::new().cyan(),
            "Reinitializing Git repository...",
        ));
        self.git
            .reinit(self.target.path(), self.settings.commit_message())?;
        spinner.stop();

        Ok(())
    }

    fn install(&self) -> anyhow::Result<()> {
        let package_manager = PackageManager::new(self.settings.package_manager());

        let spinner = Spinner::start(paint(Style::new().cyan(), "Installing dependencies..."));
        spinner.suspend(|| package_manager.install(self.target.path(), self.settings.manifest()))?;
        spinner.stop();

        Ok(())
    }
}
