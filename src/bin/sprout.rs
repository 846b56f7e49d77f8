use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use sprout::{
    args::Args,
    bootstrap::{Bootstrap, Outcome},
    config::Settings,
    error, prompt,
    target::Target,
    trace,
};

fn app(args: &Args) -> Result<Outcome> {
    let settings = Settings::load(args)?;
    trace!("Settings: {settings:?}");

    let cwd = std::env::current_dir().context("Failed to get current dir")?;
    let target = Target::resolve(args.destination.as_deref(), &cwd)?;

    // Released when this function returns, whatever the outcome
    let mut input = prompt::acquire_stdin();

    Bootstrap::new(target, &settings).run(input.as_mut())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match app(&args) {
        Ok(outcome) => {
            trace!("Finished: {outcome:?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("An error occurred: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
