use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::grading::{Category, GradeReport};

/// Rounding and threshold settings for display
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    pub decimals: usize,
    /// Final score (0-10) at or above which the result counts as passing
    pub passing_score: f64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            decimals: crate::config::DEFAULT_DECIMALS,
            passing_score: crate::config::DEFAULT_PASSING_SCORE,
        }
    }
}

/// A report together with the weight checks the caller ran on its input
pub struct ReportView<'a> {
    pub report: &'a GradeReport,
    /// Category weights sum to exactly 100; gates the final score
    pub weights_valid: bool,
    /// Human-readable weight problems, gating one first
    pub issues: &'a [String],
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Round for display. Negative zero is shown as zero.
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Width of the name column: the longest name, capped by the terminal
fn name_column_width<'a>(names: impl Iterator<Item = &'a str>, fixed_width: usize) -> usize {
    let longest = names.map(|n| n.chars().count()).max().unwrap_or(0);
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    }
}

/// Final score line, or the blocking weight message when weights are invalid
pub fn format_final_score(view: &ReportView, options: &DisplayOptions, use_colors: bool) -> String {
    if !view.weights_valid {
        let message = view
            .issues
            .first()
            .cloned()
            .unwrap_or_else(|| "Category weights must sum to exactly 100".to_string());
        return if use_colors {
            message.red().to_string()
        } else {
            message
        };
    }

    let score = format_number(view.report.total_points, options.decimals);
    let line = format!("Final: {} / 10", score);
    if !use_colors {
        return line;
    }
    if view.report.total_points >= options.passing_score {
        line.green().bold().to_string()
    } else {
        line.red().bold().to_string()
    }
}

/// Format results as a table with columns: Index, Category, Weight, Average,
/// Points, Base-10 points. No headers.
///
/// Followed by the final score (or the weight message that replaces it) and
/// any informational activity-weight warnings.
pub fn format_results_table(view: &ReportView, options: &DisplayOptions, use_colors: bool) -> String {
    if view.report.results.is_empty() {
        return "No categories yet.".to_string();
    }

    let d = options.decimals;
    let number_width = 4 + d;
    // index + weight + average + points + base10 columns with labels
    let fixed_width = 4 + 2 + 7 + 6 + number_width + 2 + number_width + 6 + number_width + 3;
    let name_width = name_column_width(
        view.report.results.iter().map(|r| r.category_name.as_str()),
        fixed_width,
    );

    let mut lines: Vec<String> = view
        .report
        .results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = truncate_name(&result.category_name, name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);
            let weight = format!("{:>6}%", result.category_weight);
            let average = format!(
                "avg {:>width$}",
                format_number(result.average, d),
                width = number_width
            );
            let points = format!(
                "{:>width$} pts",
                format_number(result.points, d),
                width = number_width
            );
            let base10 = format!(
                "{:>width$}/10",
                format_number(result.base10_points, d),
                width = number_width
            );

            if use_colors {
                format!(
                    "{} {}  {}  {}  {}  {}",
                    index_str.dimmed(),
                    name_padded.bold(),
                    weight.cyan(),
                    average,
                    points,
                    base10.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}  {}",
                    index_str, name_padded, weight, average, points, base10
                )
            }
        })
        .collect();

    lines.push(String::new());
    lines.push(format_final_score(view, options, use_colors));

    let warnings = if view.weights_valid {
        view.issues
    } else {
        view.issues.get(1..).unwrap_or(&[])
    };
    for warning in warnings {
        let line = format!("  ! {}", warning);
        lines.push(if use_colors {
            line.yellow().to_string()
        } else {
            line
        });
    }

    lines.join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: name, weight, average, points, base10 (no headers, no colors).
/// A trailing `total` row is present only when the weights are valid.
pub fn format_tsv(view: &ReportView, options: &DisplayOptions) -> String {
    let d = options.decimals;
    let mut lines: Vec<String> = view
        .report
        .results
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                r.category_name,
                format_number(r.category_weight, d),
                format_number(r.average, d),
                format_number(r.points, d),
                format_number(r.base10_points, d)
            )
        })
        .collect();

    if view.weights_valid {
        lines.push(format!("total\t{}", format_number(view.report.total_points, d)));
    }

    lines.join("\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a GradeReport,
    weights_valid: bool,
    issues: &'a [String],
}

/// Format results as pretty JSON at full precision
pub fn format_json(view: &ReportView) -> Result<String> {
    let json = JsonReport {
        report: view.report,
        weights_valid: view.weights_valid,
        issues: view.issues,
    };
    serde_json::to_string_pretty(&json).context("Failed to serialize report")
}

/// One line per category: index, name, weight, activity count, id
pub fn format_category_list(categories: &[Category], use_colors: bool) -> String {
    if categories.is_empty() {
        return "No categories yet.".to_string();
    }

    let name_width = name_column_width(categories.iter().map(|c| c.name.as_str()), 60);

    categories
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = format!(
                "{:<width$}",
                truncate_name(&category.name, name_width),
                width = name_width
            );
            let weight = format!("{:>6}%", category.weight);
            let count = match category.activities.len() {
                1 => "1 activity".to_string(),
                n => format!("{} activities", n),
            };
            if use_colors {
                format!(
                    "{} {}  {}  {:<14}  {}",
                    index_str.dimmed(),
                    name.bold(),
                    weight.cyan(),
                    count,
                    category.id.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}  {:<14}  {}",
                    index_str, name, weight, count, category.id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per activity: index, name, weight, grade (`-` when ungraded), id
pub fn format_activity_list(category: &Category, options: &DisplayOptions, use_colors: bool) -> String {
    if category.activities.is_empty() {
        return format!("No activities in {}.", category.name);
    }

    let name_width = name_column_width(category.activities.iter().map(|a| a.name.as_str()), 60);

    category
        .activities
        .iter()
        .enumerate()
        .map(|(idx, activity)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = format!(
                "{:<width$}",
                truncate_name(&activity.name, name_width),
                width = name_width
            );
            let weight = format!("{:>6}%", activity.weight);
            let grade = match activity.grade {
                Some(g) => format_number(g, options.decimals),
                None => "-".to_string(),
            };
            let grade = format!("{:>width$}", grade, width = 4 + options.decimals);
            if use_colors {
                format!(
                    "{} {}  {}  {}  {}",
                    index_str.dimmed(),
                    name.bold(),
                    weight.cyan(),
                    grade,
                    activity.id.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}  {}  {}",
                    index_str, name, weight, grade, activity.id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
