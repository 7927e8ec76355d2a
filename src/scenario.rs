//! Interactive model session
//!
//! Owns the mutable state the presentation layer edits (current assumptions,
//! driver values, implementation cost) and recomputes the report from that
//! snapshot on every change. All calculation underneath is pure.

use crate::assumptions::{AssumptionSet, LoadedAssumptions, normalize_logged, IMPLEMENTATION_COST_RANGE};
use crate::drivers::{apply_change, AssumptionChange, AssumptionDeriver, Driver, DriverValues, ModelVariant};
use crate::error::{ModelError, Result};
use crate::report::RoiReport;
use crate::timeline::TimelineAmortizer;

/// Default implementation cost shown before any input changes
pub const DEFAULT_IMPLEMENTATION_COST: u64 = 400_000;

/// Session state for one calculator instance
///
/// # Example
/// ```ignore
/// let mut session = ModelSession::new(ModelVariant::AssumptionDriven);
/// session.apply(AssumptionChange::NumReps(100))?;
/// let report = session.report();
/// ```
#[derive(Debug, Clone)]
pub struct ModelSession {
    variant: ModelVariant,
    assumptions: AssumptionSet,
    drivers: DriverValues,
    implementation_cost: u64,
    deriver: AssumptionDeriver,
    amortizer: TimelineAmortizer,
}

impl ModelSession {
    /// Session with default drivers for the variant
    ///
    /// Starting driver values are the published defaults, not values derived
    /// from the default assumptions. Drivers only move once an input changes.
    pub fn new(variant: ModelVariant) -> Self {
        Self {
            variant,
            assumptions: AssumptionSet::default(),
            drivers: DriverValues::defaults(variant),
            implementation_cost: DEFAULT_IMPLEMENTATION_COST,
            deriver: AssumptionDeriver::default(),
            amortizer: TimelineAmortizer::new(),
        }
    }

    /// Session with a custom deriver and amortizer
    pub fn with_components(
        variant: ModelVariant,
        deriver: AssumptionDeriver,
        amortizer: TimelineAmortizer,
    ) -> Self {
        Self {
            deriver,
            amortizer,
            ..Self::new(variant)
        }
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn assumptions(&self) -> &AssumptionSet {
        &self.assumptions
    }

    pub fn drivers(&self) -> &DriverValues {
        &self.drivers
    }

    pub fn implementation_cost(&self) -> u64 {
        self.implementation_cost
    }

    /// Apply one assumption change, clamped to its slider range
    ///
    /// Only meaningful in the assumption-driven variant; direct-entry
    /// sessions have no assumption sliders.
    pub fn apply(&mut self, change: AssumptionChange) -> Result<()> {
        if self.variant != ModelVariant::AssumptionDriven {
            return Err(ModelError::InvalidInput {
                reason: format!(
                    "{} is an assumption; the direct-entry model takes driver values",
                    change.field().key()
                ),
            });
        }

        let change = change.normalized();
        let (assumptions, drivers) =
            apply_change(&self.deriver, &self.assumptions, &self.drivers, change)?;
        self.assumptions = assumptions;
        self.drivers = drivers;
        Ok(())
    }

    /// Apply every entry of a loaded assumption file, in file order
    pub fn apply_loaded(&mut self, loaded: &LoadedAssumptions) -> Result<()> {
        for &(field, value) in &loaded.entries {
            self.apply(AssumptionChange::new(field, value))?;
        }
        if let Some(cost) = loaded.implementation_cost {
            self.set_implementation_cost(cost);
        }
        Ok(())
    }

    /// Set a driver's annual value directly (direct-entry slider)
    pub fn set_driver(&mut self, driver: Driver, value: u64) -> Result<()> {
        if !self.variant.drivers().contains(&driver) {
            return Err(ModelError::InvalidInput {
                reason: format!("{} is not a driver of the {:?} model", driver.key(), self.variant),
            });
        }
        let value = normalize_logged(driver.key(), &driver.direct_range(), value);
        self.drivers.set(driver, value);
        Ok(())
    }

    pub fn set_implementation_cost(&mut self, cost: u64) {
        self.implementation_cost = normalize_logged("implementationCost", &IMPLEMENTATION_COST_RANGE, cost);
    }

    /// Replace the whole assumption set and derive every driver from it
    pub fn set_assumptions(&mut self, assumptions: AssumptionSet) -> Result<()> {
        if self.variant != ModelVariant::AssumptionDriven {
            return Err(ModelError::InvalidInput {
                reason: "the direct-entry model takes driver values".to_string(),
            });
        }
        self.assumptions = assumptions.normalized();
        self.rederive_all()
    }

    /// Replace the drivers with values derived in full from the current
    /// assumptions
    pub fn rederive_all(&mut self) -> Result<()> {
        self.drivers = self.deriver.derive(&self.assumptions)?;
        Ok(())
    }

    /// Recompute the report from the current snapshot
    pub fn report(&self) -> RoiReport {
        let assumptions = match self.variant {
            ModelVariant::AssumptionDriven => Some(self.assumptions),
            ModelVariant::DirectEntry => None,
        };
        RoiReport::build(
            &self.amortizer,
            self.variant,
            assumptions,
            &self.drivers,
            self.implementation_cost,
        )
    }
}

impl Default for ModelSession {
    fn default() -> Self {
        Self::new(ModelVariant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AssumptionField;

    #[test]
    fn test_default_session_report() {
        let report = ModelSession::default().report();
        assert_eq!(report.summary.total_annual_value, 1_700_000);
        assert_eq!(report.summary.breakeven_month, Some(6));
        assert!(report.assumptions.is_some());
    }

    #[test]
    fn test_apply_clamps_and_recomputes() {
        let mut session = ModelSession::new(ModelVariant::AssumptionDriven);
        session.apply(AssumptionChange::CurrentWinRatePct(0)).unwrap();

        // clamped to the slider minimum of 10 instead of dividing by zero
        assert_eq!(session.assumptions().current_win_rate_pct, 10);
        // 50 x 24 x 20,000 x (0.20 + 5/10) x 0.3 = 5,040,000
        assert_eq!(session.drivers().value(Driver::WinRate), 5_040_000);
        assert_eq!(session.drivers().value(Driver::RampTime), 500_000);
    }

    #[test]
    fn test_direct_entry_rejects_assumption_changes() {
        let mut session = ModelSession::new(ModelVariant::DirectEntry);
        assert!(session.apply(AssumptionChange::NumReps(60)).is_err());
        assert!(session.report().assumptions.is_none());
    }

    #[test]
    fn test_set_driver_in_direct_entry() {
        let mut session = ModelSession::new(ModelVariant::DirectEntry);
        session.set_driver(Driver::Turnover, 260_000).unwrap();
        // snapped to the 25,000 step
        assert_eq!(session.drivers().value(Driver::Turnover), 250_000);
        assert_eq!(session.report().summary.total_annual_value, 2_150_000);
    }

    #[test]
    fn test_set_driver_outside_variant_rejected() {
        let mut session = ModelSession::new(ModelVariant::AssumptionDriven);
        assert!(session.set_driver(Driver::DealSize, 100_000).is_err());
    }

    #[test]
    fn test_implementation_cost_clamped() {
        let mut session = ModelSession::default();
        session.set_implementation_cost(0);
        assert_eq!(session.implementation_cost(), 50_000);
        session.set_implementation_cost(5_000_000);
        assert_eq!(session.implementation_cost(), 1_000_000);
    }

    #[test]
    fn test_apply_loaded() {
        let loaded = LoadedAssumptions {
            entries: vec![
                (AssumptionField::NumReps, 100),
                (AssumptionField::RepProductivityHours, 10),
            ],
            implementation_cost: Some(600_000),
        };
        let mut session = ModelSession::default();
        session.apply_loaded(&loaded).unwrap();

        assert_eq!(session.drivers().value(Driver::RampTime), 1_440_000);
        // 10 x 48 x 60 x 100 reps
        assert_eq!(session.drivers().value(Driver::Productivity), 2_880_000);
        assert_eq!(session.implementation_cost(), 600_000);
    }

    #[test]
    fn test_set_assumptions_derives_everything() {
        let mut session = ModelSession::default();
        let set = AssumptionSet {
            num_reps: 80,
            ..Default::default()
        };
        session.set_assumptions(set).unwrap();

        // 80 x 6 x 30% x 8000
        assert_eq!(session.drivers().value(Driver::RampTime), 1_152_000);
        // 10 x 48 x 60 x 80
        assert_eq!(session.drivers().value(Driver::Productivity), 2_300_000);
        // ceil(80 / 8) = 10 managers: 5 x 48 x 100 x 10
        assert_eq!(session.drivers().value(Driver::ManagerEfficiency), 240_000);
    }

    #[test]
    fn test_rederive_all() {
        let mut session = ModelSession::default();
        session.rederive_all().unwrap();
        assert_eq!(session.drivers().total(), 720_000 + 2_880_000 + 1_440_000 + 170_000);
    }
}
