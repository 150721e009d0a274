//! gobackup-config
//!
//! Resolves a gobackup configuration document and reports the backup models
//! it defines.

use anyhow::{Result, bail};
use clap::Parser;
use gobackup_config::cli::{Cli, Command};
use gobackup_config::config::{ConfigLocator, ResolutionState, ResolveOptions};
use gobackup_config::format::{OutputFormat, render_model, render_models};
use std::fs::OpenOptions;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Level filter from `RUST_LOG`, falling back to the `--verbose` switch.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

fn init_logging(cli: &Cli) -> Result<()> {
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli.verbose))
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli.verbose))
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(env_filter(cli.verbose))
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let options = ResolveOptions {
        legacy_storage: cli.legacy_storage.into(),
        ..ResolveOptions::default()
    };

    let state = match ResolutionState::init_with(
        &ConfigLocator::discover(),
        cli.config.as_deref(),
        &options,
    ) {
        Ok(state) => state,
        Err(e) => {
            // No usable configuration; the process ends here, not in the library
            error!("{}", e);
            return Err(e.into());
        }
    };

    if !state.is_found() {
        bail!("no gobackup configuration loaded");
    }

    let format = OutputFormat::from(cli.format);
    match cli.command.unwrap_or(Command::Check) {
        Command::Check => {
            if let Some(path) = state.source_path() {
                println!("config: {}", path.display());
            }
            println!("models: {}", state.models().len());
        }
        Command::Models => {
            print!("{}", render_models(&state, format)?);
        }
        Command::Show(args) => {
            let Some(model) = state.model_by_name(&args.model) else {
                bail!(
                    "model '{}' not found (available: {})",
                    args.model,
                    state.model_names().join(", ")
                );
            };
            println!("{}", render_model(model, format)?);
            if args.raw {
                let raw = model.tree().get("").cloned().unwrap_or_default();
                print!("{}", serde_yaml::to_string(&raw)?);
            }
        }
    }

    Ok(())
}
