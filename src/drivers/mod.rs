//! Value drivers: the annual dollar benefits the model amortizes

mod derivation;
mod events;

pub use derivation::{
    AssumptionDeriver, DerivationConstants, derive_drivers, round_to_multiple,
    ramp_time_value, win_rate_value, productivity_value, manager_efficiency_value,
};
pub use events::{AssumptionChange, apply_change, drivers_for, RECOMPUTE_TABLE};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assumptions::FieldRange;

/// Closed set of value drivers
///
/// Declaration order is the canonical order; sums over drivers follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Driver {
    RampTime,
    WinRate,
    DealSize,
    Productivity,
    Turnover,
    ManagerEfficiency,
}

impl Driver {
    pub const ALL: [Driver; 6] = [
        Driver::RampTime,
        Driver::WinRate,
        Driver::DealSize,
        Driver::Productivity,
        Driver::Turnover,
        Driver::ManagerEfficiency,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Driver::RampTime => "rampTime",
            Driver::WinRate => "winRate",
            Driver::DealSize => "dealSize",
            Driver::Productivity => "productivity",
            Driver::Turnover => "turnover",
            Driver::ManagerEfficiency => "managerEfficiency",
        }
    }

    /// Chart label
    pub fn label(&self) -> &'static str {
        match self {
            Driver::RampTime => "Ramp Time Acceleration",
            Driver::WinRate => "Win Rate Improvement",
            Driver::DealSize => "Deal Size Growth",
            Driver::Productivity => "Rep Productivity",
            Driver::Turnover => "Reduced Turnover",
            Driver::ManagerEfficiency => "Manager Efficiency",
        }
    }

    /// Rounding granularity of the derived value, `None` for drivers that are
    /// only ever entered directly
    pub fn granularity(&self) -> Option<u64> {
        match self {
            Driver::RampTime => Some(12),
            Driver::WinRate | Driver::Productivity => Some(10_000),
            Driver::ManagerEfficiency => Some(5_000),
            Driver::DealSize | Driver::Turnover => None,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.granularity().is_some()
    }

    /// Starting annual value before any input has changed
    pub fn default_value(&self) -> u64 {
        match self {
            Driver::RampTime => 500_000,
            Driver::WinRate => 350_000,
            Driver::DealSize => 200_000,
            Driver::Productivity => 750_000,
            Driver::Turnover => 150_000,
            Driver::ManagerEfficiency => 100_000,
        }
    }

    /// Slider range in the direct-entry variant
    pub fn direct_range(&self) -> FieldRange {
        match self {
            Driver::Productivity => FieldRange::new(0, 1_500_000, 50_000),
            Driver::RampTime | Driver::WinRate | Driver::DealSize => {
                FieldRange::new(0, 1_000_000, 50_000)
            }
            Driver::Turnover | Driver::ManagerEfficiency => FieldRange::new(0, 500_000, 25_000),
        }
    }
}

/// Which inputs drive the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelVariant {
    /// Drivers derived from business assumptions (four drivers)
    #[default]
    AssumptionDriven,
    /// Driver dollars set directly (six drivers)
    DirectEntry,
}

impl ModelVariant {
    pub fn drivers(&self) -> &'static [Driver] {
        match self {
            ModelVariant::AssumptionDriven => &[
                Driver::RampTime,
                Driver::WinRate,
                Driver::Productivity,
                Driver::ManagerEfficiency,
            ],
            ModelVariant::DirectEntry => &Driver::ALL,
        }
    }

    /// Slice order of the value-driver pie chart
    ///
    /// The assumption-driven chart leads with productivity. Drivers outside
    /// the variant trail in canonical order.
    pub fn chart_order(&self) -> [Driver; 6] {
        match self {
            ModelVariant::AssumptionDriven => [
                Driver::Productivity,
                Driver::RampTime,
                Driver::WinRate,
                Driver::ManagerEfficiency,
                Driver::DealSize,
                Driver::Turnover,
            ],
            ModelVariant::DirectEntry => Driver::ALL,
        }
    }
}

/// Annual dollar value per driver
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverValues {
    values: BTreeMap<Driver, u64>,
}

impl DriverValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default values for every driver of the variant
    pub fn defaults(variant: ModelVariant) -> Self {
        variant
            .drivers()
            .iter()
            .map(|&driver| (driver, driver.default_value()))
            .collect()
    }

    pub fn get(&self, driver: Driver) -> Option<u64> {
        self.values.get(&driver).copied()
    }

    /// Value of the driver, zero when it is not part of this set
    pub fn value(&self, driver: Driver) -> u64 {
        self.get(driver).unwrap_or(0)
    }

    pub fn set(&mut self, driver: Driver, value: u64) {
        self.values.insert(driver, value);
    }

    pub fn with(mut self, driver: Driver, value: u64) -> Self {
        self.set(driver, value);
        self
    }

    pub fn contains(&self, driver: Driver) -> bool {
        self.values.contains_key(&driver)
    }

    /// Drivers and values in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Driver, u64)> + '_ {
        self.values.iter().map(|(&driver, &value)| (driver, value))
    }

    pub fn drivers(&self) -> impl Iterator<Item = Driver> + '_ {
        self.values.keys().copied()
    }

    /// Undiscounted sum of all annual values, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.values
            .values()
            .fold(0u64, |sum, &value| sum.saturating_add(value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Driver, u64)> for DriverValues {
    fn from_iter<I: IntoIterator<Item = (Driver, u64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_driver_sets() {
        assert_eq!(ModelVariant::AssumptionDriven.drivers().len(), 4);
        assert_eq!(ModelVariant::DirectEntry.drivers().len(), 6);
        assert!(ModelVariant::AssumptionDriven
            .drivers()
            .iter()
            .all(|d| d.is_derived()));
    }

    #[test]
    fn test_chart_order_covers_every_driver() {
        for variant in [ModelVariant::AssumptionDriven, ModelVariant::DirectEntry] {
            let mut order = variant.chart_order().to_vec();
            order.sort();
            assert_eq!(order, Driver::ALL.to_vec());
        }
        assert_eq!(ModelVariant::AssumptionDriven.chart_order()[0], Driver::Productivity);
    }

    #[test]
    fn test_defaults_total() {
        assert_eq!(DriverValues::defaults(ModelVariant::AssumptionDriven).total(), 1_700_000);
        assert_eq!(DriverValues::defaults(ModelVariant::DirectEntry).total(), 2_050_000);
    }

    #[test]
    fn test_iteration_follows_canonical_order() {
        let values: DriverValues = [
            (Driver::ManagerEfficiency, 1),
            (Driver::RampTime, 2),
            (Driver::Productivity, 3),
        ]
        .into_iter()
        .collect();

        let order: Vec<_> = values.drivers().collect();
        assert_eq!(order, vec![Driver::RampTime, Driver::Productivity, Driver::ManagerEfficiency]);
    }

    #[test]
    fn test_missing_driver_counts_as_zero() {
        let values = DriverValues::defaults(ModelVariant::AssumptionDriven);
        assert_eq!(values.get(Driver::Turnover), None);
        assert_eq!(values.value(Driver::Turnover), 0);
    }

    #[test]
    fn test_serializes_as_camel_case_map() {
        let values = DriverValues::new().with(Driver::RampTime, 720_000);
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"rampTime":720000}"#);
    }

    #[test]
    fn test_total_saturates() {
        let values = DriverValues::new()
            .with(Driver::RampTime, u64::MAX)
            .with(Driver::Turnover, 1);
        assert_eq!(values.total(), u64::MAX);
    }

    #[test]
    fn test_direct_defaults_within_ranges() {
        for driver in Driver::ALL {
            assert!(driver.direct_range().contains(driver.default_value()));
        }
    }
}
