//! Errors that reject a scan before any point is classified.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// The rectangle has a minimum above its maximum on at least one axis.
    #[error("Invalid area {min_re},{max_re} ; {min_im},{max_im}")]
    InvalidRegion {
        min_re: f64,
        max_re: f64,
        min_im: f64,
        max_im: f64,
    },

    #[error("Invalid scan settings: {0}")]
    InvalidSettings(String),
}
