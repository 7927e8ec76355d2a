//! Distribution weights: when each driver's annual value materializes
//!
//! The published curves are part of the output contract and are kept
//! literally. They do not sum to 1.0 per driver (ramp time sums to 1.10,
//! win rate to 1.21), so the 24-month realized value exceeds the annual
//! headline figure.

use super::HORIZON_MONTHS;
use crate::drivers::Driver;

pub type Curve = [f64; HORIZON_MONTHS];

const RAMP_TIME: Curve = [
    0.0, 0.0, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05,
    0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05, 0.05,
];

const WIN_RATE: Curve = [
    0.0, 0.0, 0.0, 0.0, 0.02, 0.03, 0.04, 0.05, 0.05, 0.06, 0.06, 0.06,
    0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07,
];

const DEAL_SIZE: Curve = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.02, 0.03, 0.04, 0.05, 0.05, 0.06, 0.06,
    0.06, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07, 0.07,
];

const PRODUCTIVITY: Curve = [
    0.0, 0.05, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.05, 0.05, 0.05, 0.05,
    0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04,
];

const TURNOVER: Curve = [
    0.0, 0.0, 0.0, 0.02, 0.03, 0.03, 0.04, 0.04, 0.05, 0.05, 0.05, 0.05,
    0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06, 0.06,
];

const MANAGER_EFFICIENCY: Curve = [
    0.05, 0.06, 0.06, 0.06, 0.06, 0.05, 0.05, 0.05, 0.05, 0.05, 0.04, 0.04,
    0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04, 0.04,
];

/// Per-driver monthly weight curves over the amortization window
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionWeightTable {
    curves: [Curve; 6],
}

impl DistributionWeightTable {
    /// The published curves
    pub const fn standard() -> Self {
        Self {
            curves: [
                RAMP_TIME,
                WIN_RATE,
                DEAL_SIZE,
                PRODUCTIVITY,
                TURNOVER,
                MANAGER_EFFICIENCY,
            ],
        }
    }

    /// Table with a single curve replaced
    pub fn with_curve(mut self, driver: Driver, curve: Curve) -> Self {
        self.curves[driver as usize] = curve;
        self
    }

    pub fn curve(&self, driver: Driver) -> &Curve {
        &self.curves[driver as usize]
    }

    pub fn weight(&self, driver: Driver, month: usize) -> f64 {
        self.curve(driver).get(month).copied().unwrap_or(0.0)
    }

    /// Fraction of the annual value realized over the whole window
    pub fn weight_sum(&self, driver: Driver) -> f64 {
        self.curve(driver).iter().sum()
    }
}

impl Default for DistributionWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}
