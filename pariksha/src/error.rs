//! Error types for Pariksha

use crate::config::ConfigLoadError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pariksha error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Too few timestamp correspondences between two trajectories
    #[error(
        "Association failed: found {found} matching timestamps, need at least {required} (max_diff = {max_diff} s)"
    )]
    Association {
        /// Number of pairs found
        found: usize,
        /// Minimum number of pairs required
        required: usize,
        /// Time tolerance used for matching (seconds)
        max_diff: f64,
    },

    /// Degenerate least-squares alignment
    #[error("Alignment failed: {0}")]
    Alignment(String),

    /// Input data violates trajectory invariants
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Error metric could not be computed
    #[error("Metric error: {0}")]
    Metric(String),

    /// Malformed trajectory file
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading error
    #[error("Config error: {0}")]
    Config(#[from] ConfigLoadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_association_message() {
        let err = Error::Association {
            found: 1,
            required: 2,
            max_diff: 0.05,
        };
        let msg = err.to_string();
        assert!(msg.contains("found 1"));
        assert!(msg.contains("at least 2"));
    }
}
