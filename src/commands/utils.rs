use crate::loader::Platform;
use crate::output::read_report;
use crate::pipeline::SovReport;
use crate::utils::config::{OTHER_LABEL, REPORT_VERSION};
use anyhow::Result;
use colored::*;
use std::fmt::Write;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("{} Valid report JSON", "✓".green());
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Metrics: {}", report.tracked_metrics.join(", "));
    println!("  Entities: {}", report.aggregates.len());
    println!(
        "  Rollup: top {} by '{}'",
        report.rollup.top_n, report.rollup.rank_metric
    );

    Ok(())
}

/// Display platform presets
pub fn display_platforms(show_details: bool) {
    println!("Supported platforms");
    println!();

    for platform in Platform::ALL {
        println!("  {}", platform.name().bold());
        if !show_details {
            continue;
        }

        let schema = platform.schema();
        let or_none = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
        println!("    timestamp column: {}", or_none(schema.timestamp_column.clone()));
        println!("    entity column:    {}", or_none(schema.entity_column.clone()));
        println!(
            "    metrics:          {}",
            schema
                .metric_columns
                .clone()
                .map(|m| m.join(", "))
                .unwrap_or_else(|| "every numeric column".to_string())
        );
        println!("    count metric:     {}", or_none(schema.count_metric));
    }

    if !show_details {
        println!();
        println!("Use --show for column details");
    }
}

/// Display version information
pub fn display_version() {
    println!("SoV Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("Share-of-Voice aggregation for social engagement metrics.");
}

/// Text table of the rollup for the terminal
pub fn render_summary(report: &SovReport) -> String {
    let mut out = String::new();
    let rule = "=".repeat(80);
    let metric = &report.rollup.rank_metric;

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "{}", "SHARE OF VOICE SUMMARY".bold());
    let _ = writeln!(out, "{}", rule);

    if let Some(window) = &report.window {
        let _ = writeln!(out, "Window:   {}", window.describe());
    }
    let _ = writeln!(
        out,
        "Records:  {} kept of {} loaded",
        report.diagnostics.records_kept, report.diagnostics.records_loaded
    );
    let _ = writeln!(out, "Entities: {}", report.aggregates.len());
    let _ = writeln!(out, "Ranked by '{}' (top {})", metric, report.rollup.top_n);
    let _ = writeln!(out);

    for (i, row) in report.rollup.rows().enumerate() {
        let is_other = row.entity == OTHER_LABEL && i == report.rollup.kept.len();
        let _ = writeln!(
            out,
            "  {} {:>16} {:>7.2}%",
            summary_label(&row.entity, is_other),
            row.metric(metric),
            row.share(metric)
        );
    }

    for warning in &report.diagnostics.warnings {
        let _ = writeln!(out, "{} {}", "warning:".yellow(), warning);
    }

    let _ = write!(out, "{}", rule);
    out
}

/// Pad before colouring; escape codes would otherwise count toward the width
fn summary_label(entity: &str, is_other: bool) -> String {
    let padded = format!("{:<40}", entity);
    if is_other {
        padded.dimmed().to_string()
    } else {
        padded.cyan().to_string()
    }
}
