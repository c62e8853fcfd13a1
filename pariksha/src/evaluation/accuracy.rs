//! Absolute and Relative Pose Error metrics.
//!
//! Both metrics take an associated `(reference, estimate)` pair: equal length,
//! index `k` of one corresponds to index `k` of the other. Definitions follow
//! the [evo](https://github.com/MichaelGrupp/evo) evaluation tool.
//!
//! ## Metrics
//!
//! - **APE**: per-pose error `E_i = inv(Q_i) * P_i` between reference `Q` and
//!   estimate `P`. Measures global accuracy of the aligned estimate.
//! - **RPE**: error of relative motions `E_ij = inv(inv(Q_i) Q_j) * inv(P_i) P_j`
//!   over a delta window. Invariant to a constant global misalignment, so it
//!   measures local drift.

use serde::{Deserialize, Serialize};

use super::delta::id_pairs_from_delta;
use super::metrics::{DeltaUnit, PoseRelation};
use super::statistics::ErrorStatistics;
use crate::core::Trajectory;
use crate::error::{Error, Result};

/// Container for APE and RPE over one associated pair.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Absolute Pose Error
    pub ape: AbsolutePoseError,

    /// Relative Pose Error
    pub rpe: RelativePoseError,
}

impl AccuracyMetrics {
    /// Compute both metrics.
    ///
    /// # Arguments
    ///
    /// * `reference` - Associated reference trajectory
    /// * `estimate` - Associated (aligned) estimate trajectory
    /// * `ape_relation` - Pose relation for APE
    /// * `rpe` - RPE relation and delta window
    pub fn compute(
        reference: &Trajectory,
        estimate: &Trajectory,
        ape_relation: PoseRelation,
        rpe: &RpeSettings,
    ) -> Result<Self> {
        Ok(Self {
            ape: AbsolutePoseError::compute(reference, estimate, ape_relation)?,
            rpe: RelativePoseError::compute(reference, estimate, rpe)?,
        })
    }

    /// Print all metrics.
    pub fn print(&self) {
        self.ape.print();
        println!();
        self.rpe.print();
    }
}

fn check_lengths(reference: &Trajectory, estimate: &Trajectory) -> Result<()> {
    if reference.len() != estimate.len() {
        return Err(Error::Metric(format!(
            "trajectories are not associated: {} reference vs {} estimate poses",
            reference.len(),
            estimate.len()
        )));
    }
    if reference.is_empty() {
        return Err(Error::Metric("trajectories are empty".into()));
    }
    Ok(())
}

/// Absolute Pose Error (APE).
///
/// One error value per corresponded pose pair, aligned 1:1 with `timestamps`.
/// This is the metric computed by evo's `evo_ape` command.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AbsolutePoseError {
    /// Pose relation used
    pub relation: PoseRelation,

    /// Per-pose errors
    pub errors: Vec<f64>,

    /// Reference timestamps of the errors
    pub timestamps: Vec<f64>,

    /// Statistics over `errors`
    pub statistics: ErrorStatistics,
}

impl AbsolutePoseError {
    /// Compute APE over an associated pair.
    pub fn compute(
        reference: &Trajectory,
        estimate: &Trajectory,
        relation: PoseRelation,
    ) -> Result<Self> {
        check_lengths(reference, estimate)?;

        let errors: Vec<f64> = (0..reference.len())
            .map(|i| match relation {
                PoseRelation::PointDistance => {
                    (reference.positions()[i] - estimate.positions()[i]).norm()
                }
                _ => {
                    let error = reference.isometry(i).inverse() * estimate.isometry(i);
                    relation.error_of(&error)
                }
            })
            .collect();

        Ok(Self {
            relation,
            statistics: ErrorStatistics::from_errors(&errors),
            timestamps: reference.timestamps().to_vec(),
            errors,
        })
    }

    /// Print APE statistics.
    pub fn print(&self) {
        println!("=== Absolute Pose Error (APE) ===");
        println!(
            "Relation: {} [{}], Poses: {}",
            self.relation,
            self.relation.unit(),
            self.statistics.count
        );
        println!("{}", self.statistics.summary());
    }
}

/// RPE relation and delta window.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpeSettings {
    /// Pose relation
    ///
    /// Default: translation_part
    #[serde(default)]
    pub relation: PoseRelation,

    /// Delta between paired poses, in `delta_unit`
    ///
    /// Default: 60
    #[serde(default = "default_delta")]
    pub delta: f64,

    /// Unit of `delta`
    ///
    /// Default: frames
    #[serde(default)]
    pub delta_unit: DeltaUnit,

    /// Use every valid pair at the delta instead of a fixed stride
    ///
    /// Default: true
    #[serde(default = "default_all_pairs")]
    pub all_pairs: bool,

    /// Relative tolerance for meter and second deltas
    ///
    /// Default: 0.1
    #[serde(default = "default_rel_delta_tol")]
    pub rel_delta_tol: f64,

    /// Select pairs on the reference instead of the estimate
    ///
    /// Default: false
    #[serde(default)]
    pub pairs_from_reference: bool,
}

fn default_delta() -> f64 {
    60.0
}
fn default_all_pairs() -> bool {
    true
}
fn default_rel_delta_tol() -> f64 {
    0.1
}

impl Default for RpeSettings {
    fn default() -> Self {
        Self {
            relation: PoseRelation::TranslationPart,
            delta: 60.0,
            delta_unit: DeltaUnit::Frames,
            all_pairs: true,
            rel_delta_tol: 0.1,
            pairs_from_reference: false,
        }
    }
}

impl RpeSettings {
    /// Settings used for time offset search: point distance over 0.1 m.
    pub fn offset_search() -> Self {
        Self {
            relation: PoseRelation::PointDistance,
            delta: 0.1,
            delta_unit: DeltaUnit::Meters,
            ..Default::default()
        }
    }
}

/// Relative Pose Error (RPE).
///
/// One error value per index pair found at the configured delta.
/// `delta_ids` holds the second index of each pair, so `errors[k]` belongs to
/// pose `delta_ids[k]` of the associated pair. This is the metric computed by
/// evo's `evo_rpe` command.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RelativePoseError {
    /// Pose relation used
    pub relation: PoseRelation,

    /// Delta used
    pub delta: f64,

    /// Unit of the delta
    pub delta_unit: DeltaUnit,

    /// Per-pair errors
    pub errors: Vec<f64>,

    /// Index into the associated pair of each error
    pub delta_ids: Vec<usize>,

    /// Statistics over `errors`
    pub statistics: ErrorStatistics,
}

impl RelativePoseError {
    /// Compute RPE over an associated pair.
    ///
    /// Fails with [`Error::Metric`] if the trajectories differ in length or no
    /// pair satisfies the delta.
    pub fn compute(
        reference: &Trajectory,
        estimate: &Trajectory,
        settings: &RpeSettings,
    ) -> Result<Self> {
        check_lengths(reference, estimate)?;

        let pair_source = if settings.pairs_from_reference {
            reference
        } else {
            estimate
        };
        let pairs = id_pairs_from_delta(
            pair_source,
            settings.delta,
            settings.delta_unit,
            settings.rel_delta_tol,
            settings.all_pairs,
        )?;

        let errors: Vec<f64> = pairs
            .iter()
            .map(|&(i, j)| {
                let ref_rel = reference.isometry(i).inverse() * reference.isometry(j);
                let est_rel = estimate.isometry(i).inverse() * estimate.isometry(j);
                match settings.relation {
                    PoseRelation::PointDistance => {
                        (ref_rel.translation.vector - est_rel.translation.vector).norm()
                    }
                    relation => relation.error_of(&(ref_rel.inverse() * est_rel)),
                }
            })
            .collect();

        Ok(Self {
            relation: settings.relation,
            delta: settings.delta,
            delta_unit: settings.delta_unit,
            statistics: ErrorStatistics::from_errors(&errors),
            delta_ids: pairs.iter().map(|(_, j)| *j).collect(),
            errors,
        })
    }

    /// Print RPE statistics.
    pub fn print(&self) {
        println!("=== Relative Pose Error (RPE) ===");
        println!(
            "Relation: {} [{}], Delta: {} {}, Pairs: {}",
            self.relation,
            self.relation.unit(),
            self.delta,
            self.delta_unit,
            self.statistics.count
        );
        println!("{}", self.statistics.summary());
    }
}
