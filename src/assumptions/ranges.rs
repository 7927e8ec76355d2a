//! Slider ranges for every model input
//!
//! Ranges are enforced at the input boundary only. The derivation and
//! amortization code accepts whatever it is given.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Inclusive (min, max) range with a step, as exposed by a range control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRange {
    pub min: u64,
    pub max: u64,
    pub step: u64,
}

impl FieldRange {
    pub const fn new(min: u64, max: u64, step: u64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp into [min, max]
    pub fn clamp(&self, value: u64) -> u64 {
        value.clamp(self.min, self.max)
    }

    /// Clamp, then snap to the nearest step counted from `min`
    ///
    /// Ties snap upward. A snapped value that would overshoot `max` falls
    /// back one step.
    pub fn normalize(&self, value: u64) -> u64 {
        let clamped = self.clamp(value);
        if self.step <= 1 {
            return clamped;
        }
        let offset = clamped - self.min;
        let steps = (offset + self.step / 2) / self.step;
        let snapped = self.min + steps * self.step;
        if snapped > self.max {
            snapped - self.step
        } else {
            snapped
        }
    }

    /// Reject values outside the range instead of clamping
    pub fn check(&self, field: &'static str, value: u64) -> Result<u64> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ModelError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Implementation cost slider, shared by both model variants
pub const IMPLEMENTATION_COST_RANGE: FieldRange = FieldRange::new(50_000, 1_000_000, 50_000);

/// Normalize a user-supplied value, logging when it had to move
pub fn normalize_logged(field: &'static str, range: &FieldRange, value: u64) -> u64 {
    let normalized = range.normalize(value);
    if normalized != value {
        log::warn!(
            "{} = {} adjusted to {} (range {}..={}, step {})",
            field, value, normalized, range.min, range.max, range.step
        );
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_bounds() {
        let range = FieldRange::new(10, 200, 5);
        assert_eq!(range.clamp(0), 10);
        assert_eq!(range.clamp(500), 200);
        assert_eq!(range.clamp(55), 55);
    }

    #[test]
    fn test_normalize_snaps_to_step() {
        let range = FieldRange::new(10, 200, 5);
        assert_eq!(range.normalize(52), 50);
        assert_eq!(range.normalize(53), 55);
        assert_eq!(range.normalize(1_000), 200);

        let cost = IMPLEMENTATION_COST_RANGE;
        assert_eq!(cost.normalize(0), 50_000);
        assert_eq!(cost.normalize(420_000), 400_000);
        assert_eq!(cost.normalize(425_000), 450_000);
    }

    #[test]
    fn test_normalize_does_not_overshoot_max() {
        // 7 is not reachable from 1 in steps of 4; 5 is the last step
        let range = FieldRange::new(1, 7, 4);
        assert_eq!(range.normalize(7), 5);
    }

    #[test]
    fn test_check_reports_out_of_range() {
        let range = FieldRange::new(10, 50, 1);
        assert_eq!(range.check("current_win_rate_pct", 25).unwrap(), 25);

        match range.check("current_win_rate_pct", 0) {
            Err(ModelError::OutOfRange { field, value, min, max }) => {
                assert_eq!(field, "current_win_rate_pct");
                assert_eq!((value, min, max), (0, 10, 50));
            }
            other => panic!("expected OutOfRange, got {:?}", other),
        }
    }
}
