//! Errors raised by the classification and statistics routines.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
/// Failures of the pure core operations.
pub enum WasteError {
    /// Volume was negative, NaN, or infinite.
    #[error("Invalid volume: {0} kg")]
    InvalidVolume(f64),
    /// Statistics were requested over zero records.
    #[error("No records to summarize")]
    EmptyInput,
    /// District name was blank.
    #[error("District name must not be empty")]
    EmptyDistrictName,
    /// Summed volumes no longer fit in an `f64`.
    #[error("Total volume is too large to represent")]
    VolumeOverflow,
    /// A stored result contradicts the threshold table.
    #[error("Inconsistent classification: {0}")]
    InconsistentResult(String),
}
