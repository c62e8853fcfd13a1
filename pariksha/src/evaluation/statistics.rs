//! Summary statistics over an error series.

use serde::{Deserialize, Serialize};

/// Error statistics, recomputable from the raw error array alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorStatistics {
    /// Root mean square error
    pub rmse: f64,

    /// Mean error
    pub mean: f64,

    /// Median error
    pub median: f64,

    /// Standard deviation (population)
    pub std: f64,

    /// Minimum error
    pub min: f64,

    /// Maximum error
    pub max: f64,

    /// Number of samples
    pub count: usize,
}

impl ErrorStatistics {
    /// Compute statistics from a list of errors.
    pub fn from_errors(errors: &[f64]) -> Self {
        if errors.is_empty() {
            return Self::default();
        }

        let count = errors.len();
        let n = count as f64;

        let sum: f64 = errors.iter().sum();
        let mean = sum / n;

        let sum_sq: f64 = errors.iter().map(|e| e * e).sum();
        let rmse = (sum_sq / n).sqrt();

        let variance = errors.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let min = errors.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = errors.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = errors.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if count.is_multiple_of(2) {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            rmse,
            mean,
            median,
            std,
            min,
            max,
            count,
        }
    }

    /// Format as a single-line summary.
    pub fn summary(&self) -> String {
        format!(
            "rmse: {:.4}, mean: {:.4}, median: {:.4}, std: {:.4}, min: {:.4}, max: {:.4}",
            self.rmse, self.mean, self.median, self.std, self.min, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_error_statistics() {
        let stats = ErrorStatistics::from_errors(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.count, 5);
        assert_relative_eq!(stats.mean, 3.0);
        assert_relative_eq!(stats.median, 3.0);
        assert_relative_eq!(stats.min, 1.0);
        assert_relative_eq!(stats.max, 5.0);
        assert_relative_eq!(stats.rmse, 11.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.std, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_even_count_median() {
        let stats = ErrorStatistics::from_errors(&[4.0, 1.0, 3.0, 2.0]);
        assert_relative_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_empty_errors() {
        let stats = ErrorStatistics::from_errors(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.rmse, 0.0);
    }
}
