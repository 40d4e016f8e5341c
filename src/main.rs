// src/main.rs

mod cli;
mod roster;
mod settings;
mod storage;

use clap::Parser;
use cli::{Cli, Commands};
use roster::{RosterError, RosterResult, StorageError};
use settings::AppSettings;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // A missing .env is the normal case.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let loaded = settings::io::load_settings_from_file::<AppSettings>(cli.config.as_deref());
    let configured_filter = loaded
        .as_ref()
        .ok()
        .and_then(|s| s.log_filter.clone());
    init_logging(cli.verbose, configured_filter.as_deref());

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {:?}", path);
    }

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            let err = RosterError::Configuration(format!("could not load settings: {}", e));
            error!("{}", err);
            return ExitCode::from(exit_code_for(&err));
        }
    };

    match dispatch(cli.command, &settings, cli.config.as_deref()) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn dispatch(
    command: Commands,
    settings: &AppSettings,
    config_path: Option<&std::path::Path>,
) -> RosterResult<ExitCode> {
    match command {
        Commands::Create { path, quota, names, sort, force } => {
            cli::create::run(&path, quota, &names, sort, force, settings)?
        }
        Commands::Update { path, name, completed } => cli::update::run(&path, &name, completed)?,
        Commands::Show { path } => cli::show::run(&path)?,
        Commands::Validate { path } => {
            if cli::validate::run(&path)? > 0 {
                return Ok(ExitCode::from(3));
            }
        }
        Commands::Export { path, out } => cli::export::run(&path, &out)?,
        Commands::Config { init } => cli::config::run(settings, config_path, init)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// `-v` wins, then `RUST_LOG`, then the `log_filter` setting, then `info`.
fn init_logging(verbose: bool, configured: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        configured
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code_for(err: &RosterError) -> u8 {
    match err {
        RosterError::MemberNotFound { .. } => 2,
        RosterError::MalformedHeader { .. }
        | RosterError::Storage(StorageError::Layout(_))
        | RosterError::Storage(StorageError::Json(_)) => 3,
        RosterError::Configuration(_) => 4,
        RosterError::Storage(_) => 5,
        RosterError::IndexOutOfRange { .. } => 1,
    }
}
