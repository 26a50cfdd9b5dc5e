//! CSV serialization of energy report rows
//!
//! Output is comma separated and LF joined with no trailing newline.
//! Numeric columns always carry two decimals, with exact halves rounded
//! away from zero. Fields containing a comma,
//! quote, CR or LF are quoted with inner quotes doubled; every other field
//! is written verbatim.

use crate::models::EnergyReportRow;

/// Which energy figure a report carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    EnergyUsed,
    EnergySaved,
}

impl ReportKind {
    pub fn headers(&self) -> [&'static str; 3] {
        match self {
            ReportKind::EnergyUsed => ["Date", "Street Light ID", "Energy Consumed (kWh)"],
            ReportKind::EnergySaved => ["Date", "Street Light ID", "Energy Saved (kWh)"],
        }
    }

    fn value(&self, row: &EnergyReportRow) -> f64 {
        match self {
            ReportKind::EnergyUsed => row.consumed_kwh,
            ReportKind::EnergySaved => row.saved_kwh,
        }
    }

    /// Suggested download name, e.g. `energy-used-report.csv`
    pub fn default_filename(&self) -> &'static str {
        match self {
            ReportKind::EnergyUsed => "energy-used-report.csv",
            ReportKind::EnergySaved => "energy-saved-report.csv",
        }
    }
}

/// Build the CSV text for `kind` over `rows`
pub fn generate_csv(kind: ReportKind, rows: &[EnergyReportRow]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(kind.headers().join(","));

    for row in rows {
        lines.push(
            [
                escape_field(&row.date),
                escape_field(&row.street_light_id),
                fixed_two_decimals(kind.value(row)),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// `Date,Street Light ID,Energy Consumed (kWh)` report
pub fn generate_energy_used_csv(rows: &[EnergyReportRow]) -> String {
    generate_csv(ReportKind::EnergyUsed, rows)
}

/// `Date,Street Light ID,Energy Saved (kWh)` report
pub fn generate_energy_saved_csv(rows: &[EnergyReportRow]) -> String {
    generate_csv(ReportKind::EnergySaved, rows)
}

/// Two-decimal rendering where exact halves round away from zero
///
/// `{:.2}` already rounds the exact binary value correctly, so it only
/// differs on true ties. A tie at the second decimal means `value * 8` is an
/// odd integer (e.g. `12.125`, `0.375`); those are rounded by hand.
fn fixed_two_decimals(value: f64) -> String {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() < 1e14 && (eighths as i64) % 2 != 0 {
        let cents = (value.abs() * 100.0).round() as i64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{:02}", sign, cents / 100, cents % 100);
    }
    if value == 0.0 {
        // Covers -0.0
        return "0.00".to_string();
    }
    format!("{:.2}", value)
}

fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
