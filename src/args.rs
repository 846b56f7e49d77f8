use std::path::PathBuf;

pub use clap::Parser;

/// Create a new project from the template repository
#[derive(Parser, Debug)]
#[clap(version)]
pub struct Args {
    /// Where to create the project. Omit it or pass `.` to use the current directory
    pub destination: Option<String>,

    /// Repository to clone instead of the default template
    #[clap(long, value_name = "URL")]
    pub template: Option<String>,

    /// Program used to install dependencies [default: npm]
    #[clap(long, value_name = "CMD")]
    pub package_manager: Option<String>,

    /// Do not install dependencies after setting up the repository
    #[clap(long)]
    pub skip_install: bool,

    /// Clear a non-empty destination without asking
    #[clap(long, short)]
    pub yes: bool,

    /// Read settings from this file instead of the user config directory
    #[clap(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore every config file
    #[clap(long)]
    pub no_config: bool,
}
