//! Plain-text rendering of a session for the terminal.

use std::fmt::Write;

use super_core::format::{format_currency, format_rate};
use super_core::{EstimateResult, EstimatorSession, SuperEstimator, VisaCategory};

/// Per-year entries followed by the estimate.
///
/// ```text
/// Year  Visa category        Salary          Super
/// 2023  Working Holiday      $50,000.00      $5,250.00
/// ...
/// ```
pub fn render_session(session: &EstimatorSession) -> String {
    let mut out = String::new();
    let estimator = session.estimator();
    let rate = estimator.config().super_guarantee_rate;

    let _ = writeln!(
        out,
        "Arrival {}  Departure {}  ({} year(s))",
        session.arrival_year(),
        session.departure_year(),
        session.records().len()
    );

    if session.records().is_empty() {
        let _ = writeln!(out, "No years in range: departure is before arrival.");
    } else {
        let _ = writeln!(
            out,
            "{:<6}{:<32}{:>16}{:>14}",
            "Year", "Visa category", "Salary", "Super"
        );
        for record in session.records() {
            let _ = writeln!(
                out,
                "{:<6}{:<32}{:>16}{:>14}",
                record.year,
                record.visa_category.label(),
                format_currency(record.salary),
                format_currency(record.salary.saturating_mul(rate))
            );
        }
    }

    out.push('\n');
    out.push_str(&render_result(&session.estimate()));
    out
}

/// The four headline figures.
pub fn render_result(result: &EstimateResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24}{:>14}", "Total super", format_currency(result.total_super));
    let _ = writeln!(out, "{:<24}{:>14}", "Effective tax rate", result.effective_tax_rate_label());
    let _ = writeln!(out, "{:<24}{:>14}", "Tax withheld", format_currency(result.tax_withheld));
    let _ = writeln!(out, "{:<24}{:>14}", "Estimated payout", format_currency(result.net_payout));
    out
}

/// The withdrawal tax rate for every visa category.
pub fn render_rates(estimator: &SuperEstimator) -> String {
    let config = estimator.config();
    let mut out = String::new();

    let _ = writeln!(out, "{:<12}{:<32}{:>8}", "Code", "Visa category", "Rate");
    for category in VisaCategory::all() {
        let _ = writeln!(
            out,
            "{:<12}{:<32}{:>8}",
            category.as_str(),
            category.label(),
            format_rate(estimator.rate_for(*category))
        );
    }
    let _ = writeln!(
        out,
        "\nSuper guarantee {}, default tax rate {}",
        format_rate(config.super_guarantee_rate),
        format_rate(config.default_tax_rate)
    );
    out
}
