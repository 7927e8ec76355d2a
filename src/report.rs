//! Presentation output: the report object, display formatting and exports
//!
//! The presentation layer only reads [`RoiReport`]. Currency is formatted
//! en-US with no decimals, percentages with one decimal.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assumptions::AssumptionSet;
use crate::drivers::{Driver, DriverValues, ModelVariant};
use crate::error::Result;
use crate::timeline::{RoiSummary, Timeline, TimelineAmortizer};

/// Share of one driver in the total annual value (pie chart slice)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverShare {
    pub driver: Driver,
    pub label: String,
    pub value: u64,
    /// Percent of total annual value, 0 when the total is 0
    pub share_pct: f64,
}

/// Preformatted headline strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySummary {
    pub total_annual_value: String,
    pub net_roi: String,
    pub two_year_net: String,
    pub roi_percentage: String,
    pub breakeven: String,
}

impl DisplaySummary {
    pub fn from_summary(summary: &RoiSummary) -> Self {
        Self {
            total_annual_value: format_currency(summary.total_annual_value as f64),
            net_roi: format_currency(summary.net_roi as f64),
            two_year_net: format_currency(summary.two_year_net),
            roi_percentage: format_percentage(summary.roi_percentage),
            breakeven: format_breakeven(summary.breakeven_month),
        }
    }
}

/// Everything the presentation layer renders for one model state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiReport {
    pub generated_at: DateTime<Utc>,
    pub variant: ModelVariant,
    /// Assumptions behind the drivers, assumption-driven variant only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<AssumptionSet>,
    pub implementation_cost: u64,
    pub driver_breakdown: Vec<DriverShare>,
    pub timeline: Timeline,
    pub summary: RoiSummary,
    pub display: DisplaySummary,
}

impl RoiReport {
    pub fn build(
        amortizer: &TimelineAmortizer,
        variant: ModelVariant,
        assumptions: Option<AssumptionSet>,
        drivers: &DriverValues,
        implementation_cost: u64,
    ) -> Self {
        let (timeline, summary) = amortizer.run(drivers, implementation_cost);
        let display = DisplaySummary::from_summary(&summary);

        Self {
            generated_at: Utc::now(),
            variant,
            assumptions,
            implementation_cost,
            driver_breakdown: driver_breakdown(variant, drivers),
            timeline,
            summary,
            display,
        }
    }

    /// Annual values keyed by driver
    pub fn driver_values(&self) -> DriverValues {
        self.driver_breakdown
            .iter()
            .map(|share| (share.driver, share.value))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the timeline as chart-ready CSV, driver columns in canonical order
    pub fn write_timeline_csv<W: Write>(&self, writer: W) -> Result<()> {
        let drivers: Vec<Driver> = self.driver_values().drivers().collect();
        write_timeline_csv(writer, &self.timeline, &drivers)
    }
}

/// Pie-chart slices in the variant's chart order
pub fn driver_breakdown(variant: ModelVariant, drivers: &DriverValues) -> Vec<DriverShare> {
    let total = drivers.total();
    variant
        .chart_order()
        .into_iter()
        .filter_map(|driver| drivers.get(driver).map(|value| (driver, value)))
        .map(|(driver, value)| DriverShare {
            driver,
            label: driver.label().to_string(),
            value,
            share_pct: if total == 0 {
                0.0
            } else {
                value as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Write one row per month: driver columns, monthly total, cumulative ROI
/// and the month-0 implementation cost bar
pub fn write_timeline_csv<W: Write>(writer: W, timeline: &Timeline, drivers: &[Driver]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["month".to_string()];
    header.extend(drivers.iter().map(|d| d.key().to_string()));
    header.extend(
        ["monthly_value", "cumulative_roi", "implementation_cost"]
            .iter()
            .map(|s| s.to_string()),
    );
    csv_writer.write_record(&header)?;

    for entry in timeline.entries() {
        let mut record = vec![entry.month.to_string()];
        record.extend(drivers.iter().map(|&d| format!("{:.2}", entry.driver_value(d))));
        record.push(format!("{:.2}", entry.monthly_value));
        record.push(format!("{:.2}", entry.cumulative_roi));
        record.push(
            entry
                .implementation_cost
                .map(|cost| format!("{:.2}", cost))
                .unwrap_or_default(),
        );
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// en-US currency, whole dollars: `$1,700,000`, `-$400,000`
///
/// Negative values keep their sign even when they round to zero (`-$0`).
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value.is_sign_negative() {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// One decimal place, rounding half away from zero on the exact binary
/// value: `325.0`, and `0.15` (stored just below the tie) gives `0.1`
pub fn format_one_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // 64 places hold the exact expansion of any magnitude >= 2^-10. Smaller
    // magnitudes give 0.0 whatever the dropped digits are.
    let exact = format!("{:.64}", value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut fraction = fraction.bytes();
    let tenths = fraction.next().unwrap_or(b'0');
    let round_up = fraction.next().is_some_and(|digit| digit >= b'5');

    let mut digits: Vec<u8> = whole.bytes().chain(std::iter::once(tenths)).collect();
    if round_up {
        increment_digits(&mut digits);
    }

    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    let last = digits.len() - 1;
    for (i, &digit) in digits.iter().enumerate() {
        if i == last {
            out.push('.');
        }
        out.push(char::from(digit));
    }
    out
}

/// Add one to a string of ASCII decimal digits
fn increment_digits(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// `325.0%`, or `N/A` when the percentage is undefined
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(pct) if pct.is_finite() => format!("{}%", format_one_decimal(pct)),
        _ => "N/A".to_string(),
    }
}

/// `Month 6`, or `N/A` when breakeven falls outside the window
pub fn format_breakeven(month: Option<usize>) -> String {
    match month {
        Some(m) => format!("Month {}", m),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_report(cost: u64) -> RoiReport {
        RoiReport::build(
            &TimelineAmortizer::new(),
            ModelVariant::AssumptionDriven,
            None,
            &DriverValues::defaults(ModelVariant::AssumptionDriven),
            cost,
        )
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(1_700_000.0), "$1,700,000");
        assert_eq!(format_currency(-400_000.0), "-$400,000");
        assert_eq!(format_currency(123_456_789.5), "$123,456,790");
        assert_eq!(format_currency(-0.2), "-$0");
        assert_eq!(format_currency(-0.5), "-$1");
        assert_eq!(format_currency(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_one_decimal(325.0), "325.0");
        assert_eq!(format_percentage(Some(325.0)), "325.0%");
        assert_eq!(format_percentage(Some(-12.34)), "-12.3%");
        assert_eq!(format_percentage(None), "N/A");
        assert_eq!(format_percentage(Some(f64::INFINITY)), "N/A");
    }

    #[test]
    fn test_one_decimal_rounds_exact_binary_value() {
        // 0.15 is 0.1499999... in binary, 0.25 is an exact tie
        assert_eq!(format_one_decimal(0.15), "0.1");
        assert_eq!(format_one_decimal(0.25), "0.3");
        assert_eq!(format_one_decimal(0.05), "0.1");
        assert_eq!(format_one_decimal(9.96), "10.0");
        assert_eq!(format_one_decimal(99.95), "100.0");
        assert_eq!(format_one_decimal(-0.04), "-0.0");
        assert_eq!(format_one_decimal(0.0001), "0.0");
    }

    #[test]
    fn test_reference_display() {
        let report = reference_report(400_000);
        assert_eq!(report.display.total_annual_value, "$1,700,000");
        assert_eq!(report.display.net_roi, "$1,300,000");
        assert_eq!(report.display.two_year_net, "$1,501,000");
        assert_eq!(report.display.roi_percentage, "325.0%");
        assert_eq!(report.display.breakeven, "Month 6");
    }

    #[test]
    fn test_zero_cost_displays_na() {
        let report = reference_report(0);
        assert_eq!(report.display.roi_percentage, "N/A");
        assert_eq!(report.display.breakeven, "Month 0");
    }

    #[test]
    fn test_driver_breakdown_shares() {
        let report = reference_report(400_000);
        let shares: Vec<_> = report.driver_breakdown.iter().map(|s| s.driver).collect();
        assert_eq!(
            shares,
            vec![
                Driver::Productivity,
                Driver::RampTime,
                Driver::WinRate,
                Driver::ManagerEfficiency
            ]
        );
        let total: f64 = report.driver_breakdown.iter().map(|s| s.share_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(report.driver_breakdown[0].label, "Rep Productivity");
        assert_eq!(report.driver_values(), DriverValues::defaults(ModelVariant::AssumptionDriven));
    }

    #[test]
    fn test_direct_entry_breakdown_in_canonical_order() {
        let drivers = DriverValues::defaults(ModelVariant::DirectEntry);
        let order: Vec<_> = driver_breakdown(ModelVariant::DirectEntry, &drivers)
            .iter()
            .map(|s| s.driver)
            .collect();
        assert_eq!(order, Driver::ALL.to_vec());
    }

    #[test]
    fn test_empty_breakdown_has_zero_shares() {
        let shares = driver_breakdown(
            ModelVariant::DirectEntry,
            &DriverValues::new().with(Driver::Turnover, 0),
        );
        assert_eq!(shares[0].share_pct, 0.0);
    }

    #[test]
    fn test_timeline_csv() {
        let report = reference_report(400_000);
        let mut buffer = Vec::new();
        report.write_timeline_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 25);
        assert_eq!(
            lines[0],
            "month,rampTime,winRate,productivity,managerEfficiency,monthly_value,cumulative_roi,implementation_cost"
        );
        assert_eq!(lines[1], "0,0.00,0.00,0.00,5000.00,5000.00,-395000.00,-400000.00");
        assert!(lines[2].ends_with(','));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let report = reference_report(400_000);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["variant"], "assumption-driven");
        assert_eq!(json["summary"]["totalAnnualValue"], 1_700_000);
        assert_eq!(json["summary"]["breakevenMonth"], 6);
        assert_eq!(json["timeline"].as_array().unwrap().len(), 24);
        assert!(json.get("assumptions").is_none());
    }
}
