//! Unreacted CLI
//!
//! `unreacted <project-directory>` creates a new project from the starter
//! template. Logging goes through `tracing`; set `RUST_LOG` to change the
//! level (default `info`).

mod scaffold;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::scaffold::scaffold;

/// Template shipped next to this crate.
const DEFAULT_TEMPLATE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/template");

#[derive(Parser, Debug)]
#[command(name = "unreacted")]
#[command(about = "Set up a new Unreacted project", long_about = None)]
#[command(version)]
#[command(after_help = "For example:\n  unreacted my-unreacted-app")]
struct Args {
    /// Directory to create the project in (`.` for the current directory)
    project_directory: PathBuf,

    /// Use a different template directory
    #[arg(long, value_name = "DIR")]
    template: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing();
    info!("setting up your Unreacted project");

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            error!(error = %err, "cannot determine the current directory");
            return ExitCode::FAILURE;
        }
    };
    let template = args.template.unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE));

    match scaffold(&args.project_directory, &template, &cwd) {
        Ok(project) => {
            println!("\n{}", project.next_steps());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
