//! Errors raised by the stats engine.

use thiserror::Error;

/// Failures of the derived-view computations in [`crate::data::aggregate`].
///
/// Filtering and league counting are total and never produce one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The requested axis is not one of the numeric metric columns.
    #[error("'{field}' is not a numeric metric (expected one of: {expected})")]
    InvalidField {
        /// Field name as requested by the caller
        field: String,
        /// Comma-separated list of accepted names
        expected: String,
    },

    /// A maximum was requested over a filtered set with no values.
    #[error("filtered set is empty")]
    EmptyInput,
}

pub type StatsResult<T> = std::result::Result<T, StatsError>;
