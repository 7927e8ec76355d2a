//! Error types for the ROI model
//!
//! The calculation core is total: division-by-zero cases surface as `None`
//! sentinels in the summary. These errors cover the pure formula guards and
//! the input boundary (ranges, assumption files, request bodies).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// An assumption value makes a derivation formula undefined
    #[error("invalid assumption `{field}`: {reason}")]
    InvalidAssumption { field: &'static str, reason: String },

    /// A non-assumption input (implementation cost) makes a metric undefined
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Input outside its declared slider range
    #[error("`{field}` = {value} is outside the range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Field name in an assumption file or request that the model does not know
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
