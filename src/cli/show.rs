//! Show subcommand for gobackup-config
//!
//! Prints one resolved model: its working paths, strategies, databases and
//! storages.

use clap::Args;

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Name of the model under `models`
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Also print the model's raw configuration block
    #[arg(long)]
    pub raw: bool,
}
