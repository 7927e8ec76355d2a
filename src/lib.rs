//! ROI Model - value-realization model for AI roleplay sales training
//!
//! This library provides:
//! - Derivation of annual value drivers from business assumptions
//! - Partial recompute driven by assumption change events
//! - 24-month amortization of driver value with cumulative ROI and breakeven
//! - A serializable report for the presentation layer (JSON, CSV)

pub mod error;
pub mod assumptions;
pub mod drivers;
pub mod timeline;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::ModelError;
pub use assumptions::{AssumptionSet, AssumptionField, FieldRange};
pub use drivers::{Driver, DriverValues, ModelVariant, AssumptionChange, AssumptionDeriver, derive_drivers};
pub use timeline::{TimelineAmortizer, Timeline, MonthEntry, RoiSummary, build_timeline};
pub use report::RoiReport;
pub use scenario::ModelSession;
