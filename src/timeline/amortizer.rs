//! Amortization of annual driver values across the 24-month window

use super::entries::{MonthEntry, RoiSummary, Timeline};
use super::weights::DistributionWeightTable;
use super::HORIZON_MONTHS;
use crate::drivers::DriverValues;
use crate::error::{ModelError, Result};

/// Spreads annual driver values over the window and tracks cumulative ROI
#[derive(Debug, Clone, Default)]
pub struct TimelineAmortizer {
    weights: DistributionWeightTable,
}

impl TimelineAmortizer {
    /// Amortizer using the published weight curves
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: DistributionWeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &DistributionWeightTable {
        &self.weights
    }

    /// Build the monthly timeline
    ///
    /// The accumulator starts at `-implementation_cost` and each month's
    /// total is added before the cumulative value is recorded.
    pub fn build_timeline(&self, drivers: &DriverValues, implementation_cost: u64) -> Timeline {
        let mut timeline = Timeline::new();
        let mut cumulative_roi = 0.0 - implementation_cost as f64;

        for month in 0..HORIZON_MONTHS {
            let mut entry = self.calculate_month(drivers, month);

            cumulative_roi += entry.monthly_value;
            entry.cumulative_roi = cumulative_roi;

            if month == 0 {
                entry.implementation_cost = Some(0.0 - implementation_cost as f64);
            }

            timeline.add_entry(entry);
        }

        log::debug!(
            "Built {}-month timeline: cost={} final cumulative={:.2}",
            timeline.len(),
            implementation_cost,
            timeline.final_cumulative_roi()
        );

        timeline
    }

    /// Per-driver and total value for one month
    fn calculate_month(&self, drivers: &DriverValues, month: usize) -> MonthEntry {
        let mut entry = MonthEntry::new(month);

        for (driver, annual) in drivers.iter() {
            let value = annual as f64 * self.weights.weight(driver, month);
            entry.driver_values.insert(driver, value);
            entry.monthly_value += value;
        }

        entry
    }

    /// Headline metrics
    ///
    /// Total annual value comes straight from the drivers, not from the
    /// timeline. A zero implementation cost yields no ROI percentage.
    pub fn summarize(
        &self,
        drivers: &DriverValues,
        implementation_cost: u64,
        timeline: &Timeline,
    ) -> RoiSummary {
        let total_annual_value = drivers.total();
        let net_roi = net_value(total_annual_value, implementation_cost);

        let roi_percentage = match roi_percentage(net_roi, implementation_cost) {
            Ok(pct) => Some(pct),
            Err(err) => {
                log::warn!("ROI percentage unavailable: {}", err);
                None
            }
        };

        RoiSummary {
            total_annual_value,
            implementation_cost,
            net_roi,
            roi_percentage,
            breakeven_month: timeline.breakeven_month(),
            two_year_net: timeline.final_cumulative_roi(),
        }
    }

    /// Build the timeline and its summary together
    pub fn run(&self, drivers: &DriverValues, implementation_cost: u64) -> (Timeline, RoiSummary) {
        let timeline = self.build_timeline(drivers, implementation_cost);
        let summary = self.summarize(drivers, implementation_cost, &timeline);
        (timeline, summary)
    }
}

/// `total - cost`, saturating at the bounds of `i64`
pub fn net_value(total: u64, cost: u64) -> i64 {
    let exact = i128::from(total) - i128::from(cost);
    i64::try_from(exact).unwrap_or(if exact > 0 { i64::MAX } else { i64::MIN })
}

/// Net ROI as a percentage of the implementation cost
pub fn roi_percentage(net_roi: i64, implementation_cost: u64) -> Result<f64> {
    if implementation_cost == 0 {
        return Err(ModelError::InvalidInput {
            reason: "implementation cost is zero".to_string(),
        });
    }
    Ok(net_roi as f64 / implementation_cost as f64 * 100.0)
}

/// Build a timeline with the published weights
pub fn build_timeline(drivers: &DriverValues, implementation_cost: u64) -> Timeline {
    TimelineAmortizer::new().build_timeline(drivers, implementation_cost)
}

/// Timeline and summary with the published weights
pub fn amortize(drivers: &DriverValues, implementation_cost: u64) -> (Timeline, RoiSummary) {
    TimelineAmortizer::new().run(drivers, implementation_cost)
}
