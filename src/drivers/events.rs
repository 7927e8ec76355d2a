//! Assumption change events and partial recompute
//!
//! A change to one assumption reruns only the formulas registered for that
//! field in [`RECOMPUTE_TABLE`]. Every other driver keeps its prior value,
//! even when its formula reads the changed field (e.g. `numReps` only
//! refreshes ramp time).

use serde::{Deserialize, Serialize};

use super::{AssumptionDeriver, Driver, DriverValues};
use crate::assumptions::{AssumptionField, AssumptionSet};
use crate::error::Result;

/// One assumption slider moved, carrying its new value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum AssumptionChange {
    NumReps(u32),
    AvgRampMonths(u32),
    RampTimeReductionPct(u32),
    AvgDealCycleDays(u32),
    DealCycleReductionPct(u32),
    CurrentWinRatePct(u32),
    WinRateImprovementPts(u32),
    RepProductivityHours(u32),
    ManagerCoachingHours(u32),
}

impl AssumptionChange {
    pub fn new(field: AssumptionField, value: u32) -> Self {
        match field {
            AssumptionField::NumReps => AssumptionChange::NumReps(value),
            AssumptionField::AvgRampMonths => AssumptionChange::AvgRampMonths(value),
            AssumptionField::RampTimeReductionPct => AssumptionChange::RampTimeReductionPct(value),
            AssumptionField::AvgDealCycleDays => AssumptionChange::AvgDealCycleDays(value),
            AssumptionField::DealCycleReductionPct => AssumptionChange::DealCycleReductionPct(value),
            AssumptionField::CurrentWinRatePct => AssumptionChange::CurrentWinRatePct(value),
            AssumptionField::WinRateImprovementPts => AssumptionChange::WinRateImprovementPts(value),
            AssumptionField::RepProductivityHours => AssumptionChange::RepProductivityHours(value),
            AssumptionField::ManagerCoachingHours => AssumptionChange::ManagerCoachingHours(value),
        }
    }

    /// Event tag
    pub fn field(&self) -> AssumptionField {
        match self {
            AssumptionChange::NumReps(_) => AssumptionField::NumReps,
            AssumptionChange::AvgRampMonths(_) => AssumptionField::AvgRampMonths,
            AssumptionChange::RampTimeReductionPct(_) => AssumptionField::RampTimeReductionPct,
            AssumptionChange::AvgDealCycleDays(_) => AssumptionField::AvgDealCycleDays,
            AssumptionChange::DealCycleReductionPct(_) => AssumptionField::DealCycleReductionPct,
            AssumptionChange::CurrentWinRatePct(_) => AssumptionField::CurrentWinRatePct,
            AssumptionChange::WinRateImprovementPts(_) => AssumptionField::WinRateImprovementPts,
            AssumptionChange::RepProductivityHours(_) => AssumptionField::RepProductivityHours,
            AssumptionChange::ManagerCoachingHours(_) => AssumptionField::ManagerCoachingHours,
        }
    }

    pub fn value(&self) -> u32 {
        match *self {
            AssumptionChange::NumReps(v)
            | AssumptionChange::AvgRampMonths(v)
            | AssumptionChange::RampTimeReductionPct(v)
            | AssumptionChange::AvgDealCycleDays(v)
            | AssumptionChange::DealCycleReductionPct(v)
            | AssumptionChange::CurrentWinRatePct(v)
            | AssumptionChange::WinRateImprovementPts(v)
            | AssumptionChange::RepProductivityHours(v)
            | AssumptionChange::ManagerCoachingHours(v) => v,
        }
    }

    /// Same event with the value clamped into the field's slider range
    pub fn normalized(&self) -> Self {
        let field = self.field();
        let value = crate::assumptions::normalize_logged(field.key(), &field.range(), self.value() as u64);
        Self::new(field, value as u32)
    }
}

/// Drivers recomputed when each assumption field changes
pub const RECOMPUTE_TABLE: [(AssumptionField, &[Driver]); 9] = [
    (AssumptionField::NumReps, &[Driver::RampTime]),
    (AssumptionField::AvgRampMonths, &[Driver::RampTime]),
    (AssumptionField::RampTimeReductionPct, &[Driver::RampTime]),
    (AssumptionField::AvgDealCycleDays, &[Driver::WinRate]),
    (AssumptionField::DealCycleReductionPct, &[Driver::WinRate]),
    (AssumptionField::CurrentWinRatePct, &[Driver::WinRate]),
    (AssumptionField::WinRateImprovementPts, &[Driver::WinRate]),
    (AssumptionField::RepProductivityHours, &[Driver::Productivity]),
    (AssumptionField::ManagerCoachingHours, &[Driver::ManagerEfficiency]),
];

/// Look up the drivers a field change recomputes
pub fn drivers_for(field: AssumptionField) -> &'static [Driver] {
    RECOMPUTE_TABLE
        .iter()
        .find(|(tag, _)| *tag == field)
        .map(|(_, drivers)| *drivers)
        .unwrap_or(&[])
}

/// Apply one change event: update the assumption, rerun the formulas
/// registered for its field, and leave every other driver untouched
pub fn apply_change(
    deriver: &AssumptionDeriver,
    assumptions: &AssumptionSet,
    drivers: &DriverValues,
    change: AssumptionChange,
) -> Result<(AssumptionSet, DriverValues)> {
    let field = change.field();
    let next_assumptions = assumptions.with(field, change.value());
    let mut next_drivers = drivers.clone();

    for &driver in drivers_for(field) {
        if let Some(value) = deriver.derive_driver(driver, &next_assumptions)? {
            log::debug!("{} changed: {} -> {}", field.key(), driver.key(), value);
            next_drivers.set(driver, value);
        }
    }

    Ok((next_assumptions, next_drivers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ModelVariant;
    use crate::error::ModelError;

    fn start() -> (AssumptionSet, DriverValues) {
        (
            AssumptionSet::default(),
            DriverValues::defaults(ModelVariant::AssumptionDriven),
        )
    }

    #[test]
    fn test_table_covers_every_field_once() {
        for field in AssumptionField::ALL {
            let hits = RECOMPUTE_TABLE.iter().filter(|(tag, _)| *tag == field).count();
            assert_eq!(hits, 1, "{:?}", field);
        }
    }

    #[test]
    fn test_num_reps_only_recomputes_ramp_time() {
        let (set, drivers) = start();
        let (set, drivers) = apply_change(
            &AssumptionDeriver::default(),
            &set,
            &drivers,
            AssumptionChange::NumReps(100),
        )
        .unwrap();

        assert_eq!(set.num_reps, 100);
        // 100 x 6 x 30% x 8000
        assert_eq!(drivers.value(Driver::RampTime), 1_440_000);
        assert_eq!(drivers.value(Driver::WinRate), 350_000);
        assert_eq!(drivers.value(Driver::Productivity), 750_000);
        assert_eq!(drivers.value(Driver::ManagerEfficiency), 100_000);
    }

    #[test]
    fn test_deal_cycle_days_reruns_win_rate() {
        let (set, drivers) = start();
        let (_, drivers) = apply_change(
            &AssumptionDeriver::default(),
            &set,
            &drivers,
            AssumptionChange::AvgDealCycleDays(120),
        )
        .unwrap();

        // deal cycle length is not in the formula, but the change still
        // refreshes win rate from the current assumptions
        assert_eq!(drivers.value(Driver::WinRate), 2_880_000);
        assert_eq!(drivers.value(Driver::RampTime), 500_000);
    }

    #[test]
    fn test_sequential_changes_accumulate() {
        let deriver = AssumptionDeriver::default();
        let (set, drivers) = start();
        let (set, drivers) =
            apply_change(&deriver, &set, &drivers, AssumptionChange::RepProductivityHours(5)).unwrap();
        let (set, drivers) =
            apply_change(&deriver, &set, &drivers, AssumptionChange::ManagerCoachingHours(8)).unwrap();

        assert_eq!(set.rep_productivity_hours, 5);
        // 5 x 48 x 60 x 50
        assert_eq!(drivers.value(Driver::Productivity), 720_000);
        // 8 x 48 x 100 x 7 = 268,800 -> 270,000
        assert_eq!(drivers.value(Driver::ManagerEfficiency), 270_000);
    }

    #[test]
    fn test_zero_win_rate_change_fails_without_mutating() {
        let (set, drivers) = start();
        let result = apply_change(
            &AssumptionDeriver::default(),
            &set,
            &drivers,
            AssumptionChange::CurrentWinRatePct(0),
        );
        assert!(matches!(result, Err(ModelError::InvalidAssumption { .. })));
        assert_eq!(set.current_win_rate_pct, 25);
    }

    #[test]
    fn test_normalized_event_clamps() {
        assert_eq!(
            AssumptionChange::CurrentWinRatePct(0).normalized(),
            AssumptionChange::CurrentWinRatePct(10)
        );
        assert_eq!(AssumptionChange::NumReps(57).normalized(), AssumptionChange::NumReps(55));
    }

    #[test]
    fn test_event_json_shape() {
        let change: AssumptionChange =
            serde_json::from_str(r#"{"field":"numReps","value":75}"#).unwrap();
        assert_eq!(change, AssumptionChange::NumReps(75));
        assert_eq!(change.field(), AssumptionField::NumReps);
    }
}
