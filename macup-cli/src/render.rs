//! Text rendering of a finished run.

use std::fmt::Write as _;
use std::time::Duration;

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use macup_runner::{RunReport, SelectionOrigin, TaskReport};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "update")]
    name: String,
    #[tabled(rename = "result")]
    result: &'static str,
    #[tabled(rename = "time")]
    time: String,
}

/// Per-task output blocks followed by a summary table.
pub fn report(report: &RunReport) -> String {
    let mut out = String::new();

    if report.origin == SelectionOrigin::Reused {
        let _ = writeln!(out, "Using previous selection.");
    }
    for task in &report.tasks {
        out.push_str(&task_block(task));
    }
    for name in &report.unknown {
        let _ = writeln!(
            out,
            "{} skipped '{name}': no such update",
            "!".yellow().bold()
        );
    }

    if report.tasks.is_empty() {
        let _ = writeln!(out, "No updates selected.");
        return out;
    }

    let rows: Vec<SummaryRow> = report
        .tasks
        .iter()
        .map(|t| SummaryRow {
            name: t.name.clone(),
            result: if t.is_success() { "ok" } else { "failed" },
            time: format_elapsed(t.elapsed),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    let _ = writeln!(out, "{table}");

    let failed = report.failed().count();
    let headline = if failed == 0 {
        format!("✓ {} updates finished", report.tasks.len()).green()
    } else {
        format!("✗ {failed} of {} updates failed", report.tasks.len()).red()
    };
    let _ = writeln!(out, "{}", headline.bold());
    out
}

/// `---\nRunning <name> ---\n`, the error (if any), the output, a blank line.
fn task_block(task: &TaskReport) -> String {
    let mut block = format!("---\nRunning {} ---\n", task.name);
    if let Some(err) = &task.error {
        let _ = writeln!(block, "{}", format!("Error: {err}").red());
    }
    block.push_str(&task.output);
    if !task.output.ends_with('\n') {
        block.push('\n');
    }
    block.push('\n');
    block
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
