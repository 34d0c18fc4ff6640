use crate::modules::ScanReport;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

const MAX_CELL: usize = 60;

/// Print an aligned text table. Column widths are computed from the widest
/// cell, with long cells truncated to keep terminals readable. Widths and
/// truncation count characters, not bytes; banners and snippets routinely
/// carry multi-byte UTF-8.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count().min(MAX_CELL));
            }
        }
    }

    let mut line = String::new();
    for (h, w) in headers.iter().zip(widths.iter().copied()) {
        line.push_str(&format!("{:<w$}  ", h, w = w));
    }
    println!("{}", line.trim_end());

    let mut rule = String::new();
    for w in widths.iter().copied() {
        rule.push_str(&format!("{:-<w$}  ", "", w = w));
    }
    println!("{}", rule.trim_end());

    for row in rows {
        let mut line = String::new();
        for (cell, w) in row.iter().zip(widths.iter().copied()) {
            line.push_str(&format!("{:<w$}  ", fit_cell(cell, MAX_CELL), w = w));
        }
        println!("{}", line.trim_end());
    }
}

/// Truncate to `max` characters on a character boundary. Byte-offset
/// truncation panics mid-codepoint on lossy-decoded input.
fn fit_cell(cell: &str, max: usize) -> String {
    if cell.chars().count() <= max {
        cell.to_string()
    } else {
        cell.chars().take(max).collect()
    }
}

/// One-line batch summary under a module's table.
pub fn print_summary<T>(report: &ScanReport<T>) {
    println!(
        "\n{}: {} findings ({} probed, {} succeeded, {} failed, {} ms)",
        report.module,
        report.findings.len(),
        report.total_submitted,
        report.total_succeeded,
        report.total_failed,
        report.elapsed_ms
    );
}

/// Write a report as pretty JSON, atomically: serialize to a `.tmp` sibling
/// and rename into place, so an interrupted run never leaves a truncated or
/// corrupt file behind.
pub fn write_report_json<T: Serialize>(path: &Path, report: &ScanReport<T>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json.as_bytes())
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move report into place at {}", path.display()))?;
    Ok(())
}
