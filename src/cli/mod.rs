//! CLI command definitions for gobackup-config
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod show;

use crate::config::LegacyStoragePolicy;
use crate::format::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use show::ShowArgs;
use std::path::PathBuf;

/// Output format selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// Human-readable markdown (default)
    #[default]
    Markdown,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

/// Handling of the deprecated `store_with` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LegacyStorageArg {
    /// Use `store_with` only when `storages` is absent (default)
    #[default]
    Fallback,
    /// Always ignore `store_with`
    Discard,
}

impl From<LegacyStorageArg> for LegacyStoragePolicy {
    fn from(arg: LegacyStorageArg) -> Self {
        match arg {
            LegacyStorageArg::Fallback => LegacyStoragePolicy::FallbackWhenAbsent,
            LegacyStorageArg::Discard => LegacyStoragePolicy::Discard,
        }
    }
}

/// Inspect how a gobackup configuration resolves into backup models
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (default: search ./, ~/.gobackup/, /etc/gobackup/)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t, global = true)]
    pub format: FormatArg,

    /// Handling of the deprecated `store_with` key
    #[arg(long, value_enum, default_value_t, global = true)]
    pub legacy_storage: LegacyStorageArg,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the configuration and report the result (default if no subcommand given)
    Check,

    /// List resolved model names
    Models,

    /// Show one resolved model
    Show(ShowArgs),
}
