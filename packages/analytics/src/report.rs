//! Plain-text report rendering.
//!
//! Sections per distance threshold, subsections per stop kind, with
//! `name: count` lines under the "most" and "fewest" headings.

use std::io::Write;
use std::path::Path;

use crate::{AnalyticsError, RANK_SIZE, ThresholdReport};

/// Renders the report to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render<W: Write>(out: &mut W, reports: &[ThresholdReport]) -> std::io::Result<()> {
    for report in reports {
        writeln!(out, "Radius: {}m", report.threshold_m)?;
        for ranking in &report.rankings {
            writeln!(out, "  Stop type: {}", ranking.kind)?;
            writeln!(out, "    Top {RANK_SIZE} stops with the most POIs:")?;
            for entry in &ranking.most {
                writeln!(out, "      {}: {}", entry.name, entry.count)?;
            }
            writeln!(out, "    Top {RANK_SIZE} stops with the fewest POIs:")?;
            for entry in &ranking.least {
                writeln!(out, "      {}: {}", entry.name, entry.count)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the report to `path`, replacing any previous report.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the file cannot be written.
pub fn write_report(path: &Path, reports: &[ThresholdReport]) -> Result<(), AnalyticsError> {
    let mut buffer = Vec::new();
    render(&mut buffer, reports)?;
    std::fs::write(path, buffer)?;
    log::info!("Wrote report to {}", path.display());
    Ok(())
}
