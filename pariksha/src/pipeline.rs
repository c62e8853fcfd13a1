//! End-to-end pose error evaluation.
//!
//! ```text
//! reference ──► cleanup (copy) ───────────────────────────┐
//!                                                         ▼
//! estimate ──► RegionDetector ──► SegmentAligner ──► Stitcher ──► APE / RPE ──► EvaluationReport
//! ```
//!
//! The evaluator holds no state between calls. Inputs are borrowed and never
//! modified; cleanup and alignment happen on private copies.

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

use crate::alignment::{
    SegmentAligner, SegmentAlignerConfig, SegmentOutcome, SegmentStatus, Stitcher,
};
use crate::core::Trajectory;
use crate::error::Result;
use crate::evaluation::{
    AccuracyMetrics, DEFAULT_MAX_NULL_LENGTH, ErrorStatistics, ErrorTable, PoseRelation,
    RpeSettings,
};
use crate::segmentation::{
    AlignmentRegion, LostRegion, RegionDetection, RegionDetector, RegionDetectorConfig,
};

/// Runtime configuration for [`PoseErrorEvaluator`].
#[derive(Clone, Debug)]
pub struct EvaluatorConfig {
    /// Association tolerance (seconds)
    pub max_diff: f64,
    /// Offset added to estimate timestamps (seconds)
    pub offset: f64,
    /// Drop non-increasing reference rows
    pub remove_non_monotonic: bool,
    /// Speed at or above which reference steps are scrubbed (m/s)
    pub abnormal_step_threshold: Option<f64>,
    /// Body-frame offset right-multiplied onto every reference pose
    pub local_transform: Option<Isometry3<f64>>,
    /// Region detection
    pub regions: RegionDetectorConfig,
    /// Estimate uniform scale per region
    pub correct_scale: bool,
    /// Smooth region edge poses before fitting
    pub smooth_edges: bool,
    /// APE pose relation
    pub ape_relation: PoseRelation,
    /// RPE settings
    pub rpe: RpeSettings,
    /// Longest RPE gap filled by [`EvaluationReport::interpolated_table`]
    pub max_null_length: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_diff: 0.05,
            offset: 0.0,
            remove_non_monotonic: true,
            abnormal_step_threshold: None,
            local_transform: None,
            regions: RegionDetectorConfig::default(),
            correct_scale: true,
            smooth_edges: true,
            ape_relation: PoseRelation::PointDistance,
            rpe: RpeSettings::default(),
            max_null_length: DEFAULT_MAX_NULL_LENGTH,
        }
    }
}

impl EvaluatorConfig {
    /// Segment aligner settings derived from this config.
    pub fn segment_aligner_config(&self) -> SegmentAlignerConfig {
        SegmentAlignerConfig {
            max_diff: self.max_diff,
            offset: self.offset,
            correct_scale: self.correct_scale,
            smooth_edges: self.smooth_edges,
        }
    }
}

/// Rows removed while preparing the inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSummary {
    /// Reference poses before cleanup
    pub reference_input: usize,
    /// Reference poses dropped for non-increasing timestamps
    pub reference_non_monotonic: usize,
    /// Abnormal reference steps found
    pub reference_abnormal_steps: usize,
    /// Reference poses after cleanup
    pub reference_output: usize,
    /// Estimate poses before cleanup
    pub estimate_input: usize,
    /// Estimate poses dropped for non-increasing timestamps
    pub estimate_non_monotonic: usize,
}

/// Everything produced by one evaluation.
#[derive(Clone, Debug)]
pub struct EvaluationReport {
    /// Input cleanup counts
    pub cleanup: CleanupSummary,
    /// Regions found on the estimate
    pub detection: RegionDetection,
    /// Per-region alignment outcomes, in region order
    pub segments: Vec<SegmentOutcome>,
    /// Associated reference
    pub reference: Trajectory,
    /// Stitched, aligned estimate associated with `reference`
    pub estimate: Trajectory,
    /// APE and RPE
    pub metrics: AccuracyMetrics,
    /// Per-timestamp errors (RPE sparse)
    pub table: ErrorTable,
    max_null_length: usize,
}

impl EvaluationReport {
    /// Error table with short interior RPE gaps interpolated.
    pub fn interpolated_table(&self) -> ErrorTable {
        let mut table = self.table.clone();
        let filled = table.interpolate_rpe_gaps(self.max_null_length);
        log::debug!("Interpolated {} RPE gaps", filled);
        table
    }

    /// Serializable summary without per-pose data.
    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            associated_poses: self.reference.len(),
            cleanup: self.cleanup.clone(),
            regions: self.detection.regions.clone(),
            lost_regions: self.detection.lost_regions.clone(),
            shift_checkpoints: self.detection.shift_checkpoints.clone(),
            aux_checkpoints: self.detection.aux_checkpoints.clone(),
            segments: self
                .segments
                .iter()
                .map(|s| SegmentSummary {
                    region: s.region,
                    poses: s.num_poses(),
                    status: s.status.clone(),
                })
                .collect(),
            ape: MetricSummary {
                relation: self.metrics.ape.relation,
                unit: self.metrics.ape.relation.unit().to_string(),
                statistics: self.metrics.ape.statistics.clone(),
            },
            rpe: MetricSummary {
                relation: self.metrics.rpe.relation,
                unit: self.metrics.rpe.relation.unit().to_string(),
                statistics: self.metrics.rpe.statistics.clone(),
            },
        }
    }

    /// Print a human-readable report.
    pub fn print(&self) {
        println!("=== Alignment ===");
        println!(
            "Regions: {} ({} aligned, {} unaligned, {} dropped)",
            self.segments.len(),
            self.segments.iter().filter(|s| s.is_aligned()).count(),
            self.segments
                .iter()
                .filter(|s| matches!(s.status, SegmentStatus::Unaligned { .. }))
                .count(),
            self.segments
                .iter()
                .filter(|s| matches!(s.status, SegmentStatus::Dropped { .. }))
                .count(),
        );
        println!(
            "Lost regions: {}, shift checkpoints: {}",
            self.detection.lost_regions.len(),
            self.detection.shift_checkpoints.len()
        );
        println!("Associated poses: {}", self.reference.len());
        println!();
        self.metrics.print();
    }
}

/// Per-region line of [`EvaluationSummary`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Region in estimate indices
    pub region: AlignmentRegion,
    /// Poses contributed to the stitched estimate
    pub poses: usize,
    /// Alignment outcome
    #[serde(flatten)]
    pub status: SegmentStatus,
}

/// Statistics of one metric.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Pose relation
    pub relation: PoseRelation,
    /// Unit of the values
    pub unit: String,
    /// Statistics
    pub statistics: ErrorStatistics,
}

/// JSON-friendly evaluation summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// Pose pairs used for error computation
    pub associated_poses: usize,
    /// Input cleanup counts
    pub cleanup: CleanupSummary,
    /// Alignment regions
    pub regions: Vec<AlignmentRegion>,
    /// Lost-tracking runs
    pub lost_regions: Vec<LostRegion>,
    /// Jump checkpoints
    pub shift_checkpoints: Vec<usize>,
    /// Auxiliary checkpoints
    pub aux_checkpoints: Vec<usize>,
    /// Per-region outcomes
    pub segments: Vec<SegmentSummary>,
    /// APE statistics
    pub ape: MetricSummary,
    /// RPE statistics
    pub rpe: MetricSummary,
}

/// Segment-wise alignment and pose error evaluation.
///
/// # Example
///
/// ```rust,ignore
/// use pariksha::pipeline::{EvaluatorConfig, PoseErrorEvaluator};
///
/// let evaluator = PoseErrorEvaluator::new(EvaluatorConfig::default());
/// let report = evaluator.evaluate(&reference, &estimate)?;
/// report.print();
/// ```
#[derive(Clone, Debug, Default)]
pub struct PoseErrorEvaluator {
    config: EvaluatorConfig,
}

impl PoseErrorEvaluator {
    /// Create an evaluator.
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Clean a copy of the reference: local offset, monotonicity, glitches.
    pub fn prepare_reference(
        &self,
        reference: &Trajectory,
    ) -> Result<(Trajectory, CleanupSummary)> {
        let mut summary = CleanupSummary {
            reference_input: reference.len(),
            ..Default::default()
        };

        let mut cleaned = match &self.config.local_transform {
            Some(local) => reference.with_local_transform(local),
            None => reference.clone(),
        };

        if self.config.remove_non_monotonic {
            summary.reference_non_monotonic = cleaned.remove_non_monotonic();
            if summary.reference_non_monotonic > 0 {
                log::info!(
                    "Removed {} non-monotonic reference poses",
                    summary.reference_non_monotonic
                );
            }
        }

        if let Some(threshold) = self.config.abnormal_step_threshold {
            summary.reference_abnormal_steps = cleaned.remove_abnormal_steps(threshold)?;
            if summary.reference_abnormal_steps > 0 {
                log::info!(
                    "Removed {} abnormal reference steps (>= {} m/s), {} poses remain",
                    summary.reference_abnormal_steps,
                    threshold,
                    cleaned.len()
                );
            }
        }

        cleaned.validate("reference")?;
        summary.reference_output = cleaned.len();
        Ok((cleaned, summary))
    }

    /// Copy of the estimate with non-increasing rows removed.
    pub fn prepare_estimate(&self, estimate: &Trajectory) -> Result<(Trajectory, usize)> {
        let mut cleaned = estimate.clone();
        let removed = cleaned.remove_non_monotonic();
        if removed > 0 {
            log::warn!("Removed {} non-monotonic estimate poses", removed);
        }
        cleaned.validate("estimate")?;
        Ok((cleaned, removed))
    }

    /// Run the full pipeline.
    ///
    /// Region-level failures degrade only their region. Failures that leave
    /// nothing to compare (empty input, no association at all, no RPE pair)
    /// abort with an error.
    pub fn evaluate(
        &self,
        reference: &Trajectory,
        estimate: &Trajectory,
    ) -> Result<EvaluationReport> {
        let (reference, mut cleanup) = self.prepare_reference(reference)?;
        let (estimate, removed) = self.prepare_estimate(estimate)?;
        cleanup.estimate_input = estimate.len() + removed;
        cleanup.estimate_non_monotonic = removed;

        log::info!(
            "Evaluating {} estimate poses against {} reference poses",
            estimate.len(),
            reference.len()
        );

        let detection = RegionDetector::new(self.config.regions.clone()).detect(&estimate)?;
        if !detection.lost_regions.is_empty() {
            log::debug!("Lost regions: {:?}", detection.lost_regions);
        }
        if !detection.shift_checkpoints.is_empty() {
            log::debug!("Shift checkpoints: {:?}", detection.shift_checkpoints);
        }

        let aligner = SegmentAligner::new(self.config.segment_aligner_config());
        let segments = aligner.align_regions(&reference, &estimate, &detection.regions);

        let stitcher = Stitcher::new(self.config.max_diff, self.config.offset);
        let assoc = stitcher.stitch(&reference, &segments)?;

        let metrics = AccuracyMetrics::compute(
            &assoc.reference,
            &assoc.estimate,
            self.config.ape_relation,
            &self.config.rpe,
        )?;
        let table = ErrorTable::from_metrics(&metrics.ape, &metrics.rpe)?;

        log::info!(
            "APE {}: {}",
            metrics.ape.relation,
            metrics.ape.statistics.summary()
        );
        log::info!(
            "RPE {}: {}",
            metrics.rpe.relation,
            metrics.rpe.statistics.summary()
        );

        Ok(EvaluationReport {
            cleanup,
            detection,
            segments,
            reference: assoc.reference,
            estimate: assoc.estimate,
            metrics,
            table,
            max_null_length: self.config.max_null_length,
        })
    }
}
