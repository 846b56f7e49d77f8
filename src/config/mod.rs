mod parser;
mod token;

use anyhow::{anyhow, bail, ensure, Context};
use derive_builder::Builder;
use directories::ProjectDirs;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use crate::{args::Args, warn};
use parser::{Entry, Value};
use token::Tokens;

pub const DEFAULT_TEMPLATE: &str = "https://github.com/graciegould/super-dynamic-server.git";

/// Name of the optional configuration file inside the user config directory.
pub const CONFIG_FILE: &str = "sprout.conf";

/// Everything a run needs to know besides the destination.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(default, setter(into), derive(Debug))]
pub struct Settings {
    /// Repository cloned as the starting point
    template: String,
    /// Program whose `install` command fetches dependencies
    package_manager: String,
    /// File marking an existing project, required before installing
    manifest: String,
    /// Line that must appear in the ignore file
    secrets_entry: String,
    ignore_file: String,
    commit_message: String,
    /// Script name shown in the completion guidance
    start_script: String,
    skip_install: bool,
    /// Accept the overwrite question without asking
    assume_yes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            template: DEFAULT_TEMPLATE.to_string(),
            package_manager: "npm".to_string(),
            manifest: "package.json".to_string(),
            secrets_entry: ".env".to_string(),
            ignore_file: ".gitignore".to_string(),
            commit_message: "Initial commit".to_string(),
            start_script: "start".to_string(),
            skip_install: false,
            assume_yes: false,
        }
    }
}

impl Settings {
    /// Create a new [`Settings`] builder
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Layers the config file (if any) and then the command line over the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if an explicitly requested config file is missing
    /// or any config file fails to parse.
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut builder = Settings::builder();

        if let Some(path) = config_file(args)? {
            crate::trace!("Reading config: {}", path.display());
            builder.apply_file(&path)?;
        }

        builder
            .apply_args(args)
            .build()
            .map_err(|e| anyhow!("Invalid settings: {e}"))
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn package_manager(&self) -> &str {
        &self.package_manager
    }

    #[must_use]
    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    #[must_use]
    pub fn secrets_entry(&self) -> &str {
        &self.secrets_entry
    }

    #[must_use]
    pub fn ignore_file(&self) -> &str {
        &self.ignore_file
    }

    #[must_use]
    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    #[must_use]
    pub fn start_script(&self) -> &str {
        &self.start_script
    }

    #[must_use]
    pub fn skip_install(&self) -> bool {
        self.skip_install
    }

    #[must_use]
    pub fn assume_yes(&self) -> bool {
        self.assume_yes
    }
}

impl SettingsBuilder {
    /// Applies the statements of a config file.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] if the file can not be read or parsed.
    pub fn apply_file(&mut self, path: &Path) -> anyhow::Result<&mut Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        self.apply_str(&contents, &path.display().to_string())
    }

    /// Applies config statements from `contents`, naming `origin` in errors.
    ///
    /// # Errors
    ///
    /// Returns an [`Err`] on syntax errors or values of the wrong type.
    pub fn apply_str(&mut self, contents: &str, origin: &str) -> anyhow::Result<&mut Self> {
        let mut tokens = Tokens::lex(contents, origin)?;
        let entries = parser::parse_config(&mut tokens)?;
        let mut seen = HashSet::new();

        for entry in entries {
            if !seen.insert(entry.key.clone()) {
                warn!(tokens.error_at(
                    entry.span.clone(),
                    format!("`{}` is already defined, overriding", entry.key)
                ));
            }

            self.apply_entry(&tokens, entry)?;
        }

        Ok(self)
    }

    fn apply_entry(&mut self, tokens: &Tokens<'_>, entry: Entry) -> anyhow::Result<()> {
        let Entry { key, value, span } = entry;

        match (key.as_str(), value) {
            ("template", Value::String(v)) => self.template(v),
            ("package_manager", Value::String(v)) => self.package_manager(v),
            ("manifest", Value::String(v)) => self.manifest(v),
            ("secrets_entry", Value::String(v)) => self.secrets_entry(v),
            ("ignore_file", Value::String(v)) => self.ignore_file(v),
            ("commit_message", Value::String(v)) => self.commit_message(v),
            ("start_script", Value::String(v)) => self.start_script(v),
            ("skip_install", Value::Bool(v)) => self.skip_install(v),
            (
                "template" | "package_manager" | "manifest" | "secrets_entry" | "ignore_file"
                | "commit_message" | "start_script",
                value,
            ) => bail!(tokens.error_at(span, format!("`{key}` expects a string, found {value}"))),
            ("skip_install", value) => {
                bail!(tokens.error_at(span, format!("`{key}` expects a bool, found {value}")))
            }
            (_, _) => {
                warn!(tokens.error_at(span, format!("Unknown setting `{key}`, ignoring")));
                self
            }
        };

        Ok(())
    }

    /// Applies command line overrides. Flags that were not given keep
    /// whatever value is already set.
    pub fn apply_args(&mut self, args: &Args) -> &mut Self {
        if let Some(template) = &args.template {
            self.template(template.clone());
        }

        if let Some(pm) = &args.package_manager {
            self.package_manager(pm.clone());
        }

        if args.skip_install {
            self.skip_install(true);
        }

        if args.yes {
            self.assume_yes(true);
        }

        self
    }
}

/// Returns the path where the config file is looked up by default:
/// `sprout.conf` inside the platform's config directory for `sprout`
/// (e.g. `~/.config/sprout` on Linux).
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "sprout").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Picks the config file for this run, if any.
///
/// # Errors
///
/// Returns an [`Err`] if `--config` names a file that does not exist.
pub fn config_file(args: &Args) -> anyhow::Result<Option<PathBuf>> {
    if args.no_config {
        return Ok(None);
    }

    if let Some(path) = &args.config {
        ensure!(
            path.is_file(),
            anyhow!("Config file {} does not exist", path.display())
        );
        return Ok(Some(path.clone()));
    }

    Ok(default_config_file().filter(|p| p.is_file()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("sprout").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults_match_the_template_project() {
        let settings = Settings::builder().build().unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.template(), DEFAULT_TEMPLATE);
        assert_eq!(settings.package_manager(), "npm");
        assert_eq!(settings.manifest(), "package.json");
        assert_eq!(settings.secrets_entry(), ".env");
        assert_eq!(settings.ignore_file(), ".gitignore");
        assert_eq!(settings.commit_message(), "Initial commit");
        assert!(!settings.skip_install());
        assert!(!settings.assume_yes());
    }

    #[test]
    fn file_values_apply() {
        let settings = Settings::builder()
            .apply_str(
                "template = 'file:///tmp/t'\npackage_manager = \"pnpm\"; skip_install = true",
                "test.conf",
            )
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.template(), "file:///tmp/t");
        assert_eq!(settings.package_manager(), "pnpm");
        assert!(settings.skip_install());
        assert_eq!(settings.start_script(), "start");
    }

    #[test]
    fn later_duplicates_win_and_unknown_keys_are_ignored() {
        let settings = Settings::builder()
            .apply_str("start_script = 'dev'\nstart_script = 'serve'\ncolour = 'red'", "t")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.start_script(), "serve");
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = Settings::builder()
            .apply_str("skip_install = 'yes'", "test.conf")
            .unwrap_err();
        assert!(err.to_string().contains("expects a bool"), "{err}");

        let err = Settings::builder()
            .apply_str("template = true", "test.conf")
            .unwrap_err();
        assert!(err.to_string().contains("expects a string"), "{err}");
    }

    #[test]
    fn command_line_beats_file() {
        let args = args(&["app", "--template", "/tmp/local", "--yes"]);

        let settings = Settings::builder()
            .apply_str("template = 'from-file'\npackage_manager = 'yarn'", "t")
            .unwrap()
            .apply_args(&args)
            .build()
            .unwrap();

        assert_eq!(settings.template(), "/tmp/local");
        assert_eq!(settings.package_manager(), "yarn");
        assert!(settings.assume_yes());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.conf");

        let args = args(&["--config", missing.to_str().unwrap()]);
        assert!(config_file(&args).is_err());

        std::fs::write(&missing, "skip_install = true").unwrap();
        assert_eq!(config_file(&args).unwrap(), Some(missing.clone()));
        assert!(Settings::load(&args).unwrap().skip_install());
    }

    #[test]
    fn no_config_skips_every_file() {
        assert_eq!(config_file(&args(&["--no-config"])).unwrap(), None);
    }
}
