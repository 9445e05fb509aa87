//! Plain-text risk report rendering

use std::fmt::{self, Write as _};

use crate::models::types::RiskReport;

/// Width of the score bar; one column per point
pub const SCORE_BAR_WIDTH: usize = 100;

/// Reason lines longer than this are cut
pub const MAX_REASON_LINE: usize = 110;

const NOT_AVAILABLE: &str = "N/A";

fn score_bar(score: u32) -> String {
    let filled = (score as usize).min(SCORE_BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(SCORE_BAR_WIDTH - filled))
}

fn truncate_chars(line: &str, max: usize) -> &str {
    match line.char_indices().nth(max) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

/// Render a report as a downloadable text document
pub fn render_text_report(report: &RiskReport) -> String {
    let mut out = String::new();
    // fmt::Write for String never returns an error
    if write_report(&mut out, report).is_err() {
        out.clear();
    }
    out
}

fn write_report(out: &mut String, report: &RiskReport) -> fmt::Result {
    let info = &report.basic_info;
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    writeln!(out, "TRON Wallet Risk Report")?;
    writeln!(out, "=======================")?;
    writeln!(out)?;
    writeln!(out, "Address: {}", report.address)?;
    writeln!(out, "Risk Score: {} / 100", report.risk_score)?;
    writeln!(out, "{}", score_bar(report.risk_score))?;
    writeln!(out, "Risk Level: {}", report.risk_level)?;
    writeln!(out)?;

    writeln!(out, "Summary")?;
    writeln!(out, "-------")?;
    writeln!(out, "{}", report.summary)?;
    writeln!(out)?;

    writeln!(out, "Inflow (TRC20 USDT approx): {}", info.inflow_usdt)?;
    writeln!(out, "Outflow (TRC20 USDT approx): {}", info.outflow_usdt)?;
    writeln!(out, "First transfer: {}", or_na(&info.first_transfer))?;
    writeln!(out, "Last transfer: {}", or_na(&info.last_transfer))?;
    writeln!(
        out,
        "Dust In: {}  Dust Out: {}  Total: {}",
        info.dust_in_events, info.dust_out_events, info.dust_total
    )?;
    writeln!(out)?;

    writeln!(out, "Exposure")?;
    writeln!(out, "--------")?;
    if report.exposure.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for entry in &report.exposure {
        writeln!(out, "  - {}: {:.1}%", entry.category.label(), entry.share)?;
    }
    writeln!(out)?;

    writeln!(out, "Reasons")?;
    writeln!(out, "-------")?;
    if report.reasons.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for reason in &report.reasons {
        let line = format!("- [{}] +{} : {}", reason.code, reason.weight, reason.detail);
        writeln!(out, "  {}", truncate_chars(&line, MAX_REASON_LINE))?;
    }

    Ok(())
}
