//! Text rendering for CLI output using console styles

use console::Style;
use logcleanerlib::{CleanReport, CronJob, PruneReport, RejectedFile, Summary};
use std::fmt::Write;
use std::path::Path;

/// Width of the summary title box, not counting the border characters
const BOX_WIDTH: usize = 50;

fn title_style() -> Style {
    Style::new().bold().blue()
}

fn label_style() -> Style {
    Style::new().cyan()
}

/// Convert a path to a relative path from the base directory.
fn make_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| path.to_string_lossy().to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Warning line for a file that was left out of a selection
pub fn rejected_line(file: &RejectedFile) -> String {
    Style::new()
        .yellow()
        .apply_to(format!("Skipping {}: {}", file.path.display(), file.reason))
        .to_string()
}

fn error_line(path: &str, message: &str) -> String {
    Style::new()
        .red()
        .apply_to(format!("Error processing {path}: {message}"))
        .to_string()
}

/// One line per modified file, then one per failed file
pub fn clean_files(report: &CleanReport) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "Would clean" } else { "Cleaned" };
    let green = Style::new().green();

    for file in &report.files {
        let rel = make_relative(&file.path, &report.base_dir);
        let _ = writeln!(
            out,
            "{} {} ({} lines removed)",
            green.apply_to(verb),
            rel,
            file.removals.len()
        );
    }
    for error in &report.errors {
        let rel = make_relative(&error.path, &report.base_dir);
        let _ = writeln!(out, "{}", error_line(&rel, &error.message));
    }
    out
}

/// Closing line of a strip session
pub fn clean_outcome(report: &CleanReport) -> String {
    if report.stats.is_empty() {
        Style::new()
            .yellow()
            .apply_to("No modifications were made to the code files.")
            .to_string()
    } else if report.dry_run {
        Style::new()
            .green()
            .apply_to("Dry run completed, no files were changed.")
            .to_string()
    } else {
        Style::new()
            .green()
            .bold()
            .apply_to("Cleanup completed successfully!")
            .to_string()
    }
}

/// One line per log file, then one per failed file
pub fn prune_files(report: &PruneReport) -> String {
    let mut out = String::new();
    for file in &report.files {
        let name = file_name(&file.path);
        if file.modified() {
            let verb = if report.dry_run { "Would clean" } else { "Cleaned" };
            let _ = writeln!(
                out,
                "{} {} - removed {} lines",
                Style::new().green().apply_to(verb),
                name,
                file.lines_removed
            );
        } else {
            let _ = writeln!(
                out,
                "{}",
                Style::new()
                    .dim()
                    .apply_to(format!("No cleaning needed for {name}"))
            );
        }
    }
    for error in &report.errors {
        let _ = writeln!(out, "{}", error_line(&file_name(&error.path), &error.message));
    }
    out
}

/// Boxed title followed by bulleted sections
pub fn summary(summary: &Summary) -> String {
    let mut out = String::new();
    let border = Style::new().blue();
    let bar = "─".repeat(BOX_WIDTH);

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", border.apply_to(format!("┌{bar}┐")));
    let _ = writeln!(
        out,
        "{}{}{}",
        border.apply_to("│"),
        title_style().apply_to(format!("{:^width$}", summary.title, width = BOX_WIDTH)),
        border.apply_to("│")
    );
    let _ = writeln!(out, "{}", border.apply_to(format!("└{bar}┘")));

    for section in &summary.sections {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", title_style().apply_to(&section.title));
        for row in &section.rows {
            let _ = writeln!(
                out,
                "  • {}: {}",
                label_style().apply_to(&row.label),
                row.value
            );
        }
    }
    let _ = writeln!(out);
    out
}

/// Informational line
pub fn note(message: &str) -> String {
    Style::new().yellow().apply_to(message).to_string()
}

/// Confirmation line
pub fn success(message: &str) -> String {
    Style::new().green().apply_to(message).to_string()
}

/// Scheduled jobs, one block per job
pub fn jobs(jobs: &[CronJob]) -> String {
    let mut out = String::new();
    for job in jobs {
        let _ = writeln!(out, "{}", title_style().apply_to(&job.comment));
        let _ = writeln!(
            out,
            "  • {}: {}",
            label_style().apply_to("Schedule"),
            job.schedule
        );
        let _ = writeln!(
            out,
            "  • {}: {}",
            label_style().apply_to("Command"),
            job.command
        );
    }
    out
}
