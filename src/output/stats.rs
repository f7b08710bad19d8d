//! Harvest run report formatting
//!
//! This module turns a [`HarvestReport`] into the summary printed at the end
//! of a run.

use crate::crawler::HarvestReport;
use std::fmt::Write;

/// Formats a run report as plain text
pub fn format_report(report: &HarvestReport) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Harvest Report: '{}' ===\n", report.keyword);

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Result pages: {}", report.pages.len());
    let _ = writeln!(out, "  Records extracted: {}", report.records_extracted);
    let _ = writeln!(out, "  Unique products: {}", report.dataset.len());
    let _ = writeln!(out, "  Replaced by later listings: {}", report.records_replaced);
    let _ = writeln!(out, "  Malformed entries skipped: {}", report.entries_skipped);
    let _ = writeln!(out);

    let enriched = report
        .dataset
        .iter()
        .filter(|(_, record)| record.description.is_some())
        .count();
    if enriched > 0 {
        let _ = writeln!(out, "Enriched products: {}", enriched);
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "Started: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "Duration: {:.1}s", report.duration_seconds());

    out
}

/// Prints a run report to stdout
pub fn print_report(report: &HarvestReport) {
    print!("{}", format_report(report));
}
