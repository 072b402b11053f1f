use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::seed::DEFAULT_SEED_COUNT;

/// Sales task tracker with live performance metrics.
/// Hydrates from a JSON task file when one is supplied, otherwise from
/// generated sample data.
#[derive(Parser)]
#[command(name = "st", version, about = "Sales task performance tracker")]
pub struct Cli {
    /// Path to a JSON task file used to hydrate the collection.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Number of generated sample tasks when no usable task file is found.
    #[arg(long, global = true, default_value_t = DEFAULT_SEED_COUNT)]
    pub seed_count: usize,

    /// Subcommand; defaults to the interactive dashboard.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
