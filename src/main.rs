//! # st - Sales Task Tracker
//!
//! A terminal sales-task tracker: an in-memory collection of sales/work
//! tasks, live performance metrics derived from them, and add/update/delete
//! with a one-level undo.
//!
//! ## Key Features
//!
//! - **In-Memory Task Collection**: hydrated once at startup from a JSON task
//!   file, falling back to a generated sample dataset when the file is
//!   missing, malformed, or empty
//! - **Derived Performance Metrics**: per-task ROI plus aggregate revenue,
//!   revenue-per-hour, time efficiency, and a performance grade
//! - **Single-Slot Undo**: the most recent delete can be undone or dismissed;
//!   a second delete replaces the slot
//! - **Interactive Dashboard**: task table, metrics panel, activity log, and
//!   filter controls in a TUI; mutations live for the session
//! - **One-Shot Views**: `list`, `metrics`, and `export` print or export the
//!   derived view without entering the dashboard
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the dashboard on generated sample data
//! st
//!
//! # Generate a task file, then use it
//! st seed -o tasks.json
//! st --db tasks.json
//!
//! # One-shot views
//! st --db tasks.json list --status done --sort roi
//! st --db tasks.json metrics --priority high
//! st --db tasks.json export -o report.csv
//! ```
//!
//! The collection lives only for the process lifetime; nothing is written
//! back to the task file. CSV export and `st seed` are the only file writers.

use chrono::Utc;
use clap::Parser;

pub mod activity;
pub mod cli;
pub mod cmd;
pub mod derive;
pub mod fields;
pub mod filter;
pub mod load;
pub mod metrics;
pub mod seed;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod form;
    pub mod input;
    pub mod run;
}

use cli::Cli;
use cmd::*;
use load::load_tasks;

fn main() {
    let cli = Cli::parse();

    // Commands that don't need a hydrated collection.
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            cmd_completions(*shell);
            return;
        }
        Some(Commands::Seed { count, output }) => {
            cmd_seed(*count, output.clone(), cli.seed_count);
            return;
        }
        _ => {}
    }

    let outcome = load_tasks(cli.db.as_deref(), cli.seed_count, Utc::now().timestamp());

    match cli.command {
        None | Some(Commands::Ui) => cmd_ui(outcome.tasks, outcome.error),
        Some(command) => {
            // One-shot commands report the fallback on stderr and keep going
            // with the generated data.
            if let Some(err) = &outcome.error {
                eprintln!("{err}");
            }
            match command {
                Commands::List {
                    contains,
                    status,
                    priority,
                    sort,
                    limit,
                } => cmd_list(&outcome.tasks, contains, status, priority, sort, limit),

                Commands::Metrics {
                    contains,
                    status,
                    priority,
                } => cmd_metrics(&outcome.tasks, contains, status, priority),

                Commands::Export {
                    output,
                    contains,
                    status,
                    priority,
                } => cmd_export(&outcome.tasks, output, contains, status, priority),

                Commands::Ui | Commands::Seed { .. } | Commands::Completions { .. } => {
                    unreachable!("handled above")
                }
            }
        }
    }
}
