//! Command implementations for the CLI interface.
//!
//! One-shot commands hydrate the collection, run the derivation pipeline over
//! it, and print or export the result. They are read-only views; mutation
//! happens in the interactive dashboard, where it lives for the session.

use std::path::Path;

use chrono::{TimeZone, Utc};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::derive::{derive_all, sort_derived, DerivedTask};
use crate::fields::*;
use crate::filter::TaskFilter;
use crate::metrics::compute_metrics;
use crate::seed::generate_tasks;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard (the default).
    Ui,

    /// List tasks with derived ROI, filtered and sorted.
    List {
        /// Case-insensitive title substring filter.
        #[arg(long)]
        contains: Option<String>,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Roi)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print aggregate performance metrics, optionally over a filtered view.
    Metrics {
        /// Case-insensitive title substring filter.
        #[arg(long)]
        contains: Option<String>,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Export the current derived task list to CSV.
    Export {
        /// Output file path (default: tasks.csv).
        #[arg(long, short)]
        output: Option<String>,
        /// Case-insensitive title substring filter.
        #[arg(long)]
        contains: Option<String>,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Write a generated sample dataset as a JSON task file.
    Seed {
        /// Number of tasks to generate.
        #[arg(long)]
        count: Option<usize>,
        /// Output file path (default: tasks.json).
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal dashboard.
pub fn cmd_ui(tasks: Vec<Task>, load_error: Option<String>) {
    if let Err(e) = run_tui(tasks, load_error) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// List tasks with their derived fields, after filtering and sorting.
pub fn cmd_list(
    tasks: &[Task],
    contains: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let filter = TaskFilter {
        text: contains.unwrap_or_default(),
        status,
        priority,
    };
    let visible = filter.apply(tasks);
    let mut derived = match sort {
        SortKey::Roi => sort_derived(&derive_all(&visible)),
        SortKey::Revenue => {
            let mut d = derive_all(&visible);
            d.sort_by(|a, b| {
                b.task
                    .revenue
                    .total_cmp(&a.task.revenue)
                    .then(a.task.id.cmp(&b.task.id))
            });
            d
        }
        SortKey::Created => {
            let mut d = derive_all(&visible);
            d.sort_by_key(|t| (t.task.created_at_utc, t.task.id));
            d
        }
        SortKey::Id => {
            let mut d = derive_all(&visible);
            d.sort_by_key(|t| t.task.id);
            d
        }
    };

    if let Some(n) = limit {
        derived.truncate(n);
    }

    print_table(&derived);
}

/// Print aggregate metrics for the (optionally filtered) collection.
pub fn cmd_metrics(
    tasks: &[Task],
    contains: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
) {
    let filter = TaskFilter {
        text: contains.unwrap_or_default(),
        status,
        priority,
    };
    let visible = filter.apply(tasks);
    let m = compute_metrics(&visible);

    println!("Tasks:            {}", visible.len());
    println!("Total revenue:    {:.2}", m.total_revenue);
    println!("Total hours:      {:.1}", m.total_time_taken);
    println!("Revenue / hour:   {:.2}", m.revenue_per_hour);
    println!("Average ROI:      {:.2}", m.average_roi);
    println!("Time efficiency:  {:.0}%", m.time_efficiency_pct);
    println!("Grade:            {}", format_grade(m.performance_grade));
}

/// Export the derived, filtered, ROI-sorted task list to a CSV file.
pub fn cmd_export(
    tasks: &[Task],
    output: Option<String>,
    contains: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
) {
    let output_path = output.unwrap_or_else(|| "tasks.csv".to_string());
    let filter = TaskFilter {
        text: contains.unwrap_or_default(),
        status,
        priority,
    };
    let visible = filter.apply(tasks);
    let derived = sort_derived(&derive_all(&visible));

    match std::fs::write(&output_path, tasks_to_csv(&derived)) {
        Ok(_) => println!("Exported {} task(s) to {}", derived.len(), output_path),
        Err(e) => {
            eprintln!("Failed to write CSV file: {e}");
            std::process::exit(1);
        }
    }
}

/// Render a derived task list as CSV, one row per task.
pub fn tasks_to_csv(derived: &[DerivedTask]) -> String {
    let mut csv = String::new();
    csv.push_str("ID,Title,Status,Priority,Revenue,TimeTaken,ROI,CreatedUTC,CompletedUTC\n");

    for d in derived {
        let t = &d.task;
        let created = format_ts(t.created_at_utc);
        let completed = t
            .completed_at_utc
            .map(format_ts)
            .unwrap_or_else(|| "-".to_string());

        // Escape CSV fields that contain commas or quotes.
        let escape_csv = |s: &str| {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.to_string()
            }
        };

        csv.push_str(&format!(
            "{},{},{},{},{:.2},{:.2},{:.2},{},{}\n",
            t.id,
            escape_csv(&t.title),
            format_status(t.status),
            format_priority(t.priority),
            t.revenue,
            t.time_taken,
            d.roi,
            created,
            completed
        ));
    }
    csv
}

/// Write a generated dataset as a JSON task file.
pub fn cmd_seed(count: Option<usize>, output: Option<String>, seed_count_default: usize) {
    let count = count.unwrap_or(seed_count_default);
    let output_path = output.unwrap_or_else(|| "tasks.json".to_string());
    let tasks = generate_tasks(count, Utc::now().timestamp());

    let data = match serde_json::to_string_pretty(&tasks) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to serialise tasks: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(Path::new(&output_path), data) {
        eprintln!("Failed to write {output_path}: {e}");
        std::process::exit(1);
    }
    println!("Wrote {count} task(s) to {output_path}");
}

/// Generate completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}

/// Print derived tasks in a formatted table.
pub fn print_table(derived: &[DerivedTask]) {
    println!(
        "{:<5} {:<12} {:<8} {:>10} {:>7} {:>9} {:<12} {}",
        "ID", "Status", "Pri", "Revenue", "Hours", "ROI", "Completed", "Title"
    );
    for d in derived {
        let t = &d.task;
        let completed = t
            .completed_at_utc
            .map(|ts| {
                Utc.timestamp_opt(ts, 0)
                    .single()
                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string())
            })
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<12} {:<8} {:>10.2} {:>7.1} {:>9.2} {:<12} {}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            t.revenue,
            t.time_taken,
            d.roi,
            completed,
            t.title
        );
    }
}

fn format_ts(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive_all;

    #[test]
    fn csv_has_header_and_one_row_per_task() {
        let tasks = vec![
            Task {
                id: 1,
                title: "Plain title".to_string(),
                status: Status::Done,
                priority: Priority::High,
                revenue: 100.0,
                time_taken: 2.0,
                created_at_utc: 1_700_000_000,
                completed_at_utc: Some(1_700_000_100),
            },
            Task {
                id: 2,
                title: "Comma, needs \"quoting\"".to_string(),
                status: Status::Todo,
                priority: Priority::Low,
                revenue: 0.0,
                time_taken: 1.0,
                created_at_utc: 1_700_000_000,
                completed_at_utc: None,
            },
        ];
        let csv = tasks_to_csv(&derive_all(&tasks));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID,Title,Status"));
        assert!(lines[1].contains("Plain title"));
        assert!(lines[2].starts_with("2,\"Comma, needs \"\"quoting\"\"\""));
    }
}
