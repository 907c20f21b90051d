use std::fmt::Write;

use colored::{ColoredString, Colorize};

use crate::domain::entities::report::{MetricStatus, SampleReport};

#[must_use]
pub fn colorize_status(status: MetricStatus) -> ColoredString {
    match status {
        MetricStatus::Ok => status.to_string().green(),
        MetricStatus::Alert => status.to_string().red().bold(),
    }
}

/// Render a report for display. With `color` the status words are coloured;
/// without it the output is exactly [`SampleReport::render`].
#[must_use]
pub fn format_report(report: &SampleReport, color: bool) -> String {
    if !color {
        return report.render();
    }

    let rule = SampleReport::rule();
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.header().bold());
    let _ = writeln!(out, "{}", rule.dimmed());
    for line in &report.lines {
        let _ = writeln!(out, "{} - {}", line.describe(), colorize_status(line.status));
    }
    let _ = write!(out, "{}", rule.dimmed());
    out
}
