//! Nearest-timestamp association between two trajectories.
//!
//! The shorter sequence is walked in order. For each sample, the nearest
//! timestamp in the longer sequence is located by binary search, and the pair
//! is accepted when the gap is within `max_diff`. Accepted pairs are kept
//! injective and monotonic: a long-side index is never reused, and when two
//! short-side samples compete for the same long-side sample, the closer one
//! wins.

use crate::core::Trajectory;
use crate::error::{Error, Result};

/// Minimum number of correspondences for an association to be usable.
pub const MIN_CORRESPONDENCES: usize = 2;

/// Result of associating an estimate with a reference.
///
/// Both trajectories have the same length and index `k` of one corresponds to
/// index `k` of the other. The estimate keeps its own, unshifted timestamps.
#[derive(Clone, Debug)]
pub struct Association {
    /// Reference poses that found a partner
    pub reference: Trajectory,
    /// Estimate poses that found a partner
    pub estimate: Trajectory,
    /// Index pairs `(reference_index, estimate_index)` into the inputs
    pub pairs: Vec<(usize, usize)>,
}

impl Association {
    /// Number of matched pose pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pairs were matched
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Associate `estimate` with `reference` by nearest timestamp.
///
/// The estimate's timestamps are compared as `t_est + offset`. Pairs whose
/// gap exceeds `max_diff` seconds are discarded.
///
/// # Errors
///
/// - [`Error::DataIntegrity`] if either input is not strictly increasing
/// - [`Error::Association`] if fewer than [`MIN_CORRESPONDENCES`] pairs are found
pub fn associate(
    reference: &Trajectory,
    estimate: &Trajectory,
    max_diff: f64,
    offset: f64,
) -> Result<Association> {
    if !reference.is_strictly_increasing() {
        return Err(Error::DataIntegrity(
            "reference timestamps are not strictly increasing".into(),
        ));
    }
    if !estimate.is_strictly_increasing() {
        return Err(Error::DataIntegrity(
            "estimate timestamps are not strictly increasing".into(),
        ));
    }

    let pairs = matching_time_indices(
        reference.timestamps(),
        estimate.timestamps(),
        max_diff,
        offset,
    );

    if pairs.len() < MIN_CORRESPONDENCES {
        return Err(Error::Association {
            found: pairs.len(),
            required: MIN_CORRESPONDENCES,
            max_diff,
        });
    }

    let ref_ids: Vec<usize> = pairs.iter().map(|(r, _)| *r).collect();
    let est_ids: Vec<usize> = pairs.iter().map(|(_, e)| *e).collect();

    Ok(Association {
        reference: reference.select(&ref_ids),
        estimate: estimate.select(&est_ids),
        pairs,
    })
}

/// Index pairs `(reference_index, estimate_index)` of nearest-timestamp matches.
///
/// Both stamp slices must be sorted ascending. Estimate stamps are compared
/// as `t_est + offset`.
pub fn matching_time_indices(
    ref_stamps: &[f64],
    est_stamps: &[f64],
    max_diff: f64,
    offset: f64,
) -> Vec<(usize, usize)> {
    let est_shifted: Vec<f64> = est_stamps.iter().map(|t| t + offset).collect();

    if ref_stamps.len() <= est_shifted.len() {
        match_nearest(ref_stamps, &est_shifted, max_diff)
    } else {
        match_nearest(&est_shifted, ref_stamps, max_diff)
            .into_iter()
            .map(|(e, r)| (r, e))
            .collect()
    }
}

/// Match each entry of `short` to its nearest entry in `long`.
///
/// Returns `(short_index, long_index)` pairs, strictly increasing on both sides.
fn match_nearest(short: &[f64], long: &[f64], max_diff: f64) -> Vec<(usize, usize)> {
    // (short_index, long_index, diff)
    let mut accepted: Vec<(usize, usize, f64)> = Vec::with_capacity(short.len());

    for (i, &t) in short.iter().enumerate() {
        let Some((j, diff)) = nearest(long, t) else {
            continue;
        };
        if diff > max_diff {
            continue;
        }

        match accepted.last_mut() {
            Some(last) if j < last.1 => continue,
            Some(last) if j == last.1 => {
                if diff < last.2 {
                    *last = (i, j, diff);
                }
            }
            _ => accepted.push((i, j, diff)),
        }
    }

    accepted.into_iter().map(|(i, j, _)| (i, j)).collect()
}

/// Index and absolute gap of the entry in sorted `stamps` closest to `t`.
fn nearest(stamps: &[f64], t: f64) -> Option<(usize, f64)> {
    if stamps.is_empty() {
        return None;
    }
    let k = stamps.partition_point(|&s| s < t);
    let mut best: Option<(usize, f64)> = None;
    for idx in [k.checked_sub(1), Some(k)].into_iter().flatten() {
        if let Some(&s) = stamps.get(idx) {
            let diff = (s - t).abs();
            if best.is_none_or(|(_, d)| diff < d) {
                best = Some((idx, diff));
            }
        }
    }
    best
}
