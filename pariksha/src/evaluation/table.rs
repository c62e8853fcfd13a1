//! Per-timestamp error table combining APE and RPE.
//!
//! One row per associated reference timestamp. APE is dense; RPE is sparse
//! and only present at the poses that had a partner at the RPE delta. The
//! table is meant to be joined with other per-timestamp data downstream.

use serde::{Deserialize, Serialize};

use super::accuracy::{AbsolutePoseError, RelativePoseError};
use crate::error::{Error, Result};

/// Default maximum gap length filled by [`ErrorTable::interpolate_rpe_gaps`].
pub const DEFAULT_MAX_NULL_LENGTH: usize = 10;

/// A single row of the error table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorRow {
    /// Reference timestamp (seconds)
    #[serde(rename = "TimeStamp")]
    pub timestamp: f64,

    /// Absolute pose error
    #[serde(rename = "APE")]
    pub ape: f64,

    /// Relative pose error, if this pose ended an RPE pair
    #[serde(rename = "RPE")]
    pub rpe: Option<f64>,
}

/// APE and RPE keyed by reference timestamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorTable {
    /// Rows in timestamp order
    pub rows: Vec<ErrorRow>,
}

impl ErrorTable {
    /// Build the table from metrics computed on the same associated pair.
    pub fn from_metrics(ape: &AbsolutePoseError, rpe: &RelativePoseError) -> Result<Self> {
        if ape.errors.len() != ape.timestamps.len() {
            return Err(Error::Metric(format!(
                "APE has {} errors for {} timestamps",
                ape.errors.len(),
                ape.timestamps.len()
            )));
        }
        if rpe.errors.len() != rpe.delta_ids.len() {
            return Err(Error::Metric(format!(
                "RPE has {} errors for {} delta ids",
                rpe.errors.len(),
                rpe.delta_ids.len()
            )));
        }

        let mut rows: Vec<ErrorRow> = ape
            .timestamps
            .iter()
            .zip(ape.errors.iter())
            .map(|(&timestamp, &ape)| ErrorRow {
                timestamp,
                ape,
                rpe: None,
            })
            .collect();

        for (&id, &err) in rpe.delta_ids.iter().zip(rpe.errors.iter()) {
            let Some(row) = rows.get_mut(id) else {
                return Err(Error::Metric(format!(
                    "RPE delta id {} out of range for {} poses",
                    id,
                    ape.timestamps.len()
                )));
            };
            row.rpe = Some(err);
        }

        Ok(Self { rows })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows with an RPE value
    pub fn rpe_count(&self) -> usize {
        self.rows.iter().filter(|r| r.rpe.is_some()).count()
    }

    /// Linearly fill interior RPE gaps shorter than `max_null_length` rows.
    ///
    /// Gaps at the start or end of the table have only one neighbour and are
    /// left empty, as are gaps of `max_null_length` rows or more. Returns the
    /// number of values filled.
    pub fn interpolate_rpe_gaps(&mut self, max_null_length: usize) -> usize {
        let mut filled = 0;
        // (index, value) of the last row with an RPE value
        let mut last_known: Option<(usize, f64)> = None;

        for i in 0..self.rows.len() {
            let Some(value) = self.rows[i].rpe else {
                continue;
            };
            if let Some((prev, start)) = last_known {
                let gap = i - prev - 1;
                if gap > 0 && gap < max_null_length {
                    let steps = (gap + 1) as f64;
                    for (k, row) in self.rows[prev + 1..i].iter_mut().enumerate() {
                        let frac = (k + 1) as f64 / steps;
                        row.rpe = Some(start + (value - start) * frac);
                    }
                    filled += gap;
                }
            }
            last_known = Some((i, value));
        }

        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table(rpe: &[Option<f64>]) -> ErrorTable {
        ErrorTable {
            rows: rpe
                .iter()
                .enumerate()
                .map(|(i, r)| ErrorRow {
                    timestamp: i as f64,
                    ape: 0.0,
                    rpe: *r,
                })
                .collect(),
        }
    }

    #[test]
    fn test_from_metrics_places_rpe_at_delta_ids() {
        let ape = AbsolutePoseError {
            errors: vec![0.1, 0.2, 0.3, 0.4],
            timestamps: vec![1.0, 2.0, 3.0, 4.0],
            ..Default::default()
        };
        let rpe = RelativePoseError {
            errors: vec![0.5, 0.6],
            delta_ids: vec![2, 3],
            ..Default::default()
        };
        let table = ErrorTable::from_metrics(&ape, &rpe).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0].rpe, None);
        assert_eq!(table.rows[2].rpe, Some(0.5));
        assert_eq!(table.rows[3].rpe, Some(0.6));
        assert_eq!(table.rpe_count(), 2);
    }

    #[test]
    fn test_from_metrics_rejects_bad_id() {
        let ape = AbsolutePoseError {
            errors: vec![0.1],
            timestamps: vec![1.0],
            ..Default::default()
        };
        let rpe = RelativePoseError {
            errors: vec![0.5],
            delta_ids: vec![4],
            ..Default::default()
        };
        assert!(ErrorTable::from_metrics(&ape, &rpe).is_err());
    }

    #[test]
    fn test_interpolate_short_gap() {
        let mut t = table(&[Some(1.0), None, None, Some(4.0)]);
        assert_eq!(t.interpolate_rpe_gaps(10), 2);
        assert_relative_eq!(t.rows[1].rpe.unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(t.rows[2].rpe.unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_skips_long_and_edge_gaps() {
        let mut t = table(&[None, Some(1.0), None, None, None, Some(2.0), None]);
        assert_eq!(t.interpolate_rpe_gaps(3), 0);
        assert_eq!(t.rows[0].rpe, None);
        assert_eq!(t.rows[3].rpe, None);
        assert_eq!(t.rows[6].rpe, None);
    }
}
