//! Derivation of annual driver values from business assumptions
//!
//! Each formula is evaluated left to right in f64 in the order written, then
//! rounded to the driver's granularity.

use super::{Driver, DriverValues};
use crate::assumptions::AssumptionSet;
use crate::error::{ModelError, Result};

/// Fixed calibration values baked into the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivationConstants {
    /// Fully loaded monthly cost of one rep
    pub avg_rep_monthly_cost: f64,
    pub avg_deal_size: f64,
    /// Deals closed per rep per year
    pub deals_per_rep: f64,
    /// Share of deal revenue credited to the win-rate driver
    pub win_rate_attribution: f64,
    pub working_weeks_per_year: f64,
    pub rep_hourly_cost: f64,
    pub manager_hourly_rate: f64,
    pub reps_per_manager: u32,
}

impl Default for DerivationConstants {
    fn default() -> Self {
        Self {
            avg_rep_monthly_cost: 8_000.0,
            avg_deal_size: 20_000.0,
            deals_per_rep: 24.0,
            win_rate_attribution: 0.3,
            working_weeks_per_year: 48.0,
            rep_hourly_cost: 60.0,
            manager_hourly_rate: 100.0,
            reps_per_manager: 8,
        }
    }
}

/// Round to the nearest multiple of `granularity`, ties away from zero
///
/// Negative and NaN inputs floor at zero; driver values are never negative.
/// Results too large for a `u64` saturate at `u64::MAX`.
pub fn round_to_multiple(value: f64, granularity: u64) -> u64 {
    let units = (value / granularity as f64).round();
    if units.is_nan() || units <= 0.0 {
        0
    } else {
        (units as u64).saturating_mul(granularity)
    }
}

/// Converts an [`AssumptionSet`] into annual driver dollars
#[derive(Debug, Clone, Default)]
pub struct AssumptionDeriver {
    constants: DerivationConstants,
}

impl AssumptionDeriver {
    pub fn new(constants: DerivationConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &DerivationConstants {
        &self.constants
    }

    /// Rep-months saved by faster ramp, priced at monthly rep cost
    ///
    /// Rounded to a multiple of 12 dollars, not to a month count.
    pub fn ramp_time(&self, set: &AssumptionSet) -> u64 {
        let raw = set.num_reps as f64
            * set.avg_ramp_months as f64
            * (set.ramp_time_reduction_pct as f64 / 100.0)
            * self.constants.avg_rep_monthly_cost;
        round_to_multiple(raw, 12)
    }

    /// Revenue impact of shorter cycles and a higher win rate
    pub fn win_rate(&self, set: &AssumptionSet) -> Result<u64> {
        if set.current_win_rate_pct == 0 {
            return Err(ModelError::InvalidAssumption {
                field: "currentWinRatePct",
                reason: "current win rate must be greater than zero".to_string(),
            });
        }

        let cycle_impact = set.deal_cycle_reduction_pct as f64 / 100.0;
        let win_rate_impact = set.win_rate_improvement_pts as f64 / set.current_win_rate_pct as f64;
        let raw = set.num_reps as f64
            * self.constants.deals_per_rep
            * self.constants.avg_deal_size
            * (cycle_impact + win_rate_impact)
            * self.constants.win_rate_attribution;
        Ok(round_to_multiple(raw, 10_000))
    }

    /// Rep hours saved per year at the rep hourly cost
    pub fn productivity(&self, set: &AssumptionSet) -> u64 {
        let raw = set.rep_productivity_hours as f64
            * self.constants.working_weeks_per_year
            * self.constants.rep_hourly_cost
            * set.num_reps as f64;
        round_to_multiple(raw, 10_000)
    }

    /// Coaching hours saved per year across all managers
    pub fn manager_efficiency(&self, set: &AssumptionSet) -> u64 {
        let managers = set.num_reps.div_ceil(self.constants.reps_per_manager.max(1));
        let raw = set.manager_coaching_hours as f64
            * self.constants.working_weeks_per_year
            * self.constants.manager_hourly_rate
            * managers as f64;
        round_to_multiple(raw, 5_000)
    }

    /// Formula result for one driver, `None` for drivers with no formula
    pub fn derive_driver(&self, driver: Driver, set: &AssumptionSet) -> Result<Option<u64>> {
        let value = match driver {
            Driver::RampTime => self.ramp_time(set),
            Driver::WinRate => self.win_rate(set)?,
            Driver::Productivity => self.productivity(set),
            Driver::ManagerEfficiency => self.manager_efficiency(set),
            Driver::DealSize | Driver::Turnover => return Ok(None),
        };
        Ok(Some(value))
    }

    /// Derive every formula-backed driver
    pub fn derive(&self, set: &AssumptionSet) -> Result<DriverValues> {
        let mut values = DriverValues::new();
        for driver in Driver::ALL {
            if let Some(value) = self.derive_driver(driver, set)? {
                values.set(driver, value);
            }
        }
        log::debug!("Derived drivers {:?} from {:?}", values, set);
        Ok(values)
    }
}

/// Derive all drivers with the standard calibration
pub fn derive_drivers(set: &AssumptionSet) -> Result<DriverValues> {
    AssumptionDeriver::default().derive(set)
}

pub fn ramp_time_value(set: &AssumptionSet) -> u64 {
    AssumptionDeriver::default().ramp_time(set)
}

pub fn win_rate_value(set: &AssumptionSet) -> Result<u64> {
    AssumptionDeriver::default().win_rate(set)
}

pub fn productivity_value(set: &AssumptionSet) -> u64 {
    AssumptionDeriver::default().productivity(set)
}

pub fn manager_efficiency_value(set: &AssumptionSet) -> u64 {
    AssumptionDeriver::default().manager_efficiency(set)
}
