//! Value-realization timeline over the amortization window

mod weights;
mod entries;
mod amortizer;

pub use weights::DistributionWeightTable;
pub use entries::{MonthEntry, Timeline, RoiSummary};
pub use amortizer::{TimelineAmortizer, amortize, build_timeline, net_value, roi_percentage};

/// Length of the amortization window in months
pub const HORIZON_MONTHS: usize = 24;
