//! Trajectory alignment: similarity fitting, per-region alignment and stitching.
//!
//! ## Pipeline
//!
//! ```text
//! regions ──► SegmentAligner ──► [SegmentOutcome] ──► Stitcher ──► Association
//!               │                                       │
//!               └─ associate + umeyama_alignment        └─ concat + associate
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use pariksha::alignment::{SegmentAligner, SegmentAlignerConfig, Stitcher};
//!
//! let aligner = SegmentAligner::new(SegmentAlignerConfig::default());
//! let outcomes = aligner.align_regions(&reference, &estimate, &detection.regions);
//! let final_pair = Stitcher::new(0.05, 0.0).stitch(&reference, &outcomes)?;
//! ```

mod segments;
mod stitch;
mod umeyama;

pub use segments::{
    SegmentAligner, SegmentAlignerConfig, SegmentOutcome, SegmentStatus, align_trajectory,
};
pub use stitch::Stitcher;
pub use umeyama::umeyama_alignment;
