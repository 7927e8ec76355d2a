//! Timeline output structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::HORIZON_MONTHS;
use crate::drivers::Driver;
use crate::error::{ModelError, Result};

/// A single month of the value-realization timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthEntry {
    /// Month index, 0-based
    pub month: usize,

    /// Value realized this month per driver (annual value x weight)
    pub driver_values: BTreeMap<Driver, f64>,

    /// Sum of `driver_values` in canonical driver order
    pub monthly_value: f64,

    /// Running total of monthly values, net of the implementation cost
    pub cumulative_roi: f64,

    /// Up-front cost bar for the waterfall chart, month 0 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_cost: Option<f64>,
}

impl MonthEntry {
    pub fn new(month: usize) -> Self {
        Self {
            month,
            driver_values: BTreeMap::new(),
            monthly_value: 0.0,
            cumulative_roi: 0.0,
            implementation_cost: None,
        }
    }

    /// Value of one driver this month, zero when the driver is absent
    pub fn driver_value(&self, driver: Driver) -> f64 {
        self.driver_values.get(&driver).copied().unwrap_or(0.0)
    }
}

/// Complete 24-month timeline
///
/// Only the amortizer builds timelines. Deserialized timelines must hold
/// exactly one entry per month of the window, in month order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MonthEntry>", into = "Vec<MonthEntry>")]
pub struct Timeline {
    entries: Vec<MonthEntry>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::with_capacity(HORIZON_MONTHS),
        }
    }

    pub(crate) fn add_entry(&mut self, entry: MonthEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[MonthEntry] {
        &self.entries
    }

    pub fn get(&self, month: usize) -> Option<&MonthEntry> {
        self.entries.get(month)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First month whose cumulative ROI is non-negative
    pub fn breakeven_month(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.cumulative_roi >= 0.0)
    }

    /// Cumulative ROI at the end of the window
    pub fn final_cumulative_roi(&self) -> f64 {
        self.entries.last().map(|e| e.cumulative_roi).unwrap_or(0.0)
    }

    /// Total value realized across the window, before cost
    pub fn total_realized(&self) -> f64 {
        self.entries.iter().map(|e| e.monthly_value).sum()
    }

    pub fn cumulative_roi_series(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.cumulative_roi).collect()
    }
}

impl TryFrom<Vec<MonthEntry>> for Timeline {
    type Error = ModelError;

    fn try_from(entries: Vec<MonthEntry>) -> Result<Self> {
        if entries.len() != HORIZON_MONTHS {
            return Err(ModelError::InvalidInput {
                reason: format!(
                    "timeline has {} entries, expected {}",
                    entries.len(),
                    HORIZON_MONTHS
                ),
            });
        }
        if let Some((index, entry)) = entries
            .iter()
            .enumerate()
            .find(|(index, entry)| entry.month != *index)
        {
            return Err(ModelError::InvalidInput {
                reason: format!("timeline entry {} is labelled month {}", index, entry.month),
            });
        }
        Ok(Self { entries })
    }
}

impl From<Timeline> for Vec<MonthEntry> {
    fn from(timeline: Timeline) -> Self {
        timeline.entries
    }
}

/// Headline metrics for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSummary {
    /// Undiscounted sum of annual driver values
    pub total_annual_value: u64,

    pub implementation_cost: u64,

    /// `total_annual_value - implementation_cost`
    pub net_roi: i64,

    /// `net_roi / implementation_cost x 100`, `None` when the cost is zero
    pub roi_percentage: Option<f64>,

    /// `None` when cumulative ROI stays negative for the whole window
    pub breakeven_month: Option<usize>,

    /// Cumulative ROI at month 23 ("Net ROI (2 Years)")
    pub two_year_net: f64,
}
