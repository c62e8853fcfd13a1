//! Pose error evaluation.
//!
//! ## Overview
//!
//! All metrics operate on an associated `(reference, estimate)` pair produced
//! by [`crate::sync::associate`] or the stitcher:
//!
//! 1. **APE** - per-pose error after alignment ([`AbsolutePoseError`])
//! 2. **RPE** - error of relative motion over a delta window ([`RelativePoseError`])
//! 3. **Statistics** - mean, median, RMSE, std, min, max ([`ErrorStatistics`])
//! 4. **Error table** - per-timestamp APE with sparse RPE ([`ErrorTable`])
//! 5. **Offset search** - clock offset minimizing mean RPE ([`find_time_offset`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use pariksha::evaluation::{AccuracyMetrics, ErrorTable, PoseRelation, RpeSettings};
//!
//! let metrics = AccuracyMetrics::compute(
//!     &assoc.reference,
//!     &assoc.estimate,
//!     PoseRelation::PointDistance,
//!     &RpeSettings::default(),
//! )?;
//! metrics.print();
//! // === Absolute Pose Error (APE) ===
//! // Relation: point distance [m], Poses: 1843
//! // rmse: 0.0412, mean: 0.0371, median: 0.0350, std: 0.0179, min: 0.0021, max: 0.1140
//!
//! let table = ErrorTable::from_metrics(&metrics.ape, &metrics.rpe)?;
//! ```

mod accuracy;
mod delta;
mod metrics;
mod offset;
mod statistics;
mod table;

pub use accuracy::{AbsolutePoseError, AccuracyMetrics, RelativePoseError, RpeSettings};
pub use delta::id_pairs_from_delta;
pub use metrics::{DeltaUnit, PoseRelation};
pub use offset::{
    OffsetSearchConfig, OffsetSearchResult, find_time_offset, mean_rpe_at_offset, minimize,
};
pub use statistics::ErrorStatistics;
pub use table::{DEFAULT_MAX_NULL_LENGTH, ErrorRow, ErrorTable};
