//! Business assumptions behind the derived value drivers

mod ranges;
pub mod loader;

pub use ranges::{FieldRange, IMPLEMENTATION_COST_RANGE, normalize_logged};
pub use loader::{LoadedAssumptions, load_assumptions, load_assumptions_from_reader};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Raw tunable inputs of the assumption-driven model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssumptionSet {
    /// Number of sales reps
    pub num_reps: u32,
    /// Current average ramp time in months
    pub avg_ramp_months: u32,
    /// Expected ramp time reduction (%)
    pub ramp_time_reduction_pct: u32,
    /// Current average deal cycle in days
    pub avg_deal_cycle_days: u32,
    /// Deal cycle reduction (%)
    pub deal_cycle_reduction_pct: u32,
    /// Current win rate (%)
    pub current_win_rate_pct: u32,
    /// Win rate improvement (percentage points)
    pub win_rate_improvement_pts: u32,
    /// Rep hours saved per week
    pub rep_productivity_hours: u32,
    /// Manager coaching hours saved per week
    pub manager_coaching_hours: u32,
}

impl Default for AssumptionSet {
    fn default() -> Self {
        Self {
            num_reps: 50,
            avg_ramp_months: 6,
            ramp_time_reduction_pct: 30,
            avg_deal_cycle_days: 90,
            deal_cycle_reduction_pct: 20,
            current_win_rate_pct: 25,
            win_rate_improvement_pts: 5,
            rep_productivity_hours: 10,
            manager_coaching_hours: 5,
        }
    }
}

impl AssumptionSet {
    pub fn get(&self, field: AssumptionField) -> u32 {
        match field {
            AssumptionField::NumReps => self.num_reps,
            AssumptionField::AvgRampMonths => self.avg_ramp_months,
            AssumptionField::RampTimeReductionPct => self.ramp_time_reduction_pct,
            AssumptionField::AvgDealCycleDays => self.avg_deal_cycle_days,
            AssumptionField::DealCycleReductionPct => self.deal_cycle_reduction_pct,
            AssumptionField::CurrentWinRatePct => self.current_win_rate_pct,
            AssumptionField::WinRateImprovementPts => self.win_rate_improvement_pts,
            AssumptionField::RepProductivityHours => self.rep_productivity_hours,
            AssumptionField::ManagerCoachingHours => self.manager_coaching_hours,
        }
    }

    /// Copy with a single field replaced
    pub fn with(mut self, field: AssumptionField, value: u32) -> Self {
        let slot = match field {
            AssumptionField::NumReps => &mut self.num_reps,
            AssumptionField::AvgRampMonths => &mut self.avg_ramp_months,
            AssumptionField::RampTimeReductionPct => &mut self.ramp_time_reduction_pct,
            AssumptionField::AvgDealCycleDays => &mut self.avg_deal_cycle_days,
            AssumptionField::DealCycleReductionPct => &mut self.deal_cycle_reduction_pct,
            AssumptionField::CurrentWinRatePct => &mut self.current_win_rate_pct,
            AssumptionField::WinRateImprovementPts => &mut self.win_rate_improvement_pts,
            AssumptionField::RepProductivityHours => &mut self.rep_productivity_hours,
            AssumptionField::ManagerCoachingHours => &mut self.manager_coaching_hours,
        };
        *slot = value;
        self
    }

    /// Clamp every field into its slider range
    pub fn normalized(&self) -> Self {
        AssumptionField::ALL.iter().fold(*self, |set, &field| {
            let value = normalize_logged(field.key(), &field.range(), set.get(field) as u64);
            set.with(field, value as u32)
        })
    }
}

/// Tag naming one field of [`AssumptionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssumptionField {
    NumReps,
    AvgRampMonths,
    RampTimeReductionPct,
    AvgDealCycleDays,
    DealCycleReductionPct,
    CurrentWinRatePct,
    WinRateImprovementPts,
    RepProductivityHours,
    ManagerCoachingHours,
}

impl AssumptionField {
    pub const ALL: [AssumptionField; 9] = [
        AssumptionField::NumReps,
        AssumptionField::AvgRampMonths,
        AssumptionField::RampTimeReductionPct,
        AssumptionField::AvgDealCycleDays,
        AssumptionField::DealCycleReductionPct,
        AssumptionField::CurrentWinRatePct,
        AssumptionField::WinRateImprovementPts,
        AssumptionField::RepProductivityHours,
        AssumptionField::ManagerCoachingHours,
    ];

    /// Key used in assumption files and JSON requests
    pub fn key(&self) -> &'static str {
        match self {
            AssumptionField::NumReps => "numReps",
            AssumptionField::AvgRampMonths => "avgRampMonths",
            AssumptionField::RampTimeReductionPct => "rampTimeReductionPct",
            AssumptionField::AvgDealCycleDays => "avgDealCycleDays",
            AssumptionField::DealCycleReductionPct => "dealCycleReductionPct",
            AssumptionField::CurrentWinRatePct => "currentWinRatePct",
            AssumptionField::WinRateImprovementPts => "winRateImprovementPts",
            AssumptionField::RepProductivityHours => "repProductivityHours",
            AssumptionField::ManagerCoachingHours => "managerCoachingHours",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key() == key)
            .ok_or_else(|| ModelError::UnknownField(key.to_string()))
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssumptionField::NumReps => "Number of Sales Reps",
            AssumptionField::AvgRampMonths => "Current Avg Ramp Time (months)",
            AssumptionField::RampTimeReductionPct => "Expected Ramp Time Reduction (%)",
            AssumptionField::AvgDealCycleDays => "Current Avg Deal Cycle (days)",
            AssumptionField::DealCycleReductionPct => "Deal Cycle Reduction (%)",
            AssumptionField::CurrentWinRatePct => "Current Win Rate (%)",
            AssumptionField::WinRateImprovementPts => "Win Rate Improvement (percentage points)",
            AssumptionField::RepProductivityHours => "Rep Productivity (hours saved/week)",
            AssumptionField::ManagerCoachingHours => "Manager Coaching (hours saved/week)",
        }
    }

    /// Slider range for this field
    pub fn range(&self) -> FieldRange {
        match self {
            AssumptionField::NumReps => FieldRange::new(10, 200, 5),
            AssumptionField::AvgRampMonths => FieldRange::new(2, 12, 1),
            AssumptionField::RampTimeReductionPct => FieldRange::new(5, 50, 5),
            AssumptionField::AvgDealCycleDays => FieldRange::new(30, 180, 5),
            AssumptionField::DealCycleReductionPct => FieldRange::new(5, 40, 5),
            AssumptionField::CurrentWinRatePct => FieldRange::new(10, 50, 1),
            AssumptionField::WinRateImprovementPts => FieldRange::new(1, 15, 1),
            AssumptionField::RepProductivityHours => FieldRange::new(1, 20, 1),
            AssumptionField::ManagerCoachingHours => FieldRange::new(1, 15, 1),
        }
    }
}
