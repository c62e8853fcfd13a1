//! # Pariksha
//!
//! Segment-aware trajectory alignment and pose error evaluation for SLAM
//! benchmarks.
//!
//! ## Overview
//!
//! A SLAM estimate is compared against a reference (ground truth) trajectory.
//! Real estimates lose tracking, stall and jump after relocalization, so a
//! single global alignment hides most of the error. Pariksha instead:
//!
//! - **Detects regions** of continuous tracking from the estimate's own speeds
//! - **Aligns each region** to the reference with a Umeyama Sim(3) fit
//! - **Stitches** the aligned regions back into one trajectory
//! - **Measures** APE and RPE with evo-compatible definitions
//!
//! ## Features
//!
//! - **Robust pipeline**: a degenerate region falls back to unaligned poses
//!   instead of aborting the run
//! - **Reference cleanup**: non-monotonic timestamps, capture glitches and a
//!   fixed body-frame offset
//! - **Offset search**: finds the clock offset between estimate and reference
//! - **Exports**: TUM trajectories, `TimeStamp,APE,RPE` CSV, JSON summary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pariksha::{PoseErrorEvaluator, ParikshaConfig, io};
//! use std::path::Path;
//!
//! let config = ParikshaConfig::load_default()?;
//! let evaluator = PoseErrorEvaluator::new(config.to_evaluator_config()?);
//!
//! let reference = io::load_tum(Path::new("groundtruth.txt"))?;
//! let estimate = io::load_tum(Path::new("estimate.txt"))?;
//!
//! let report = evaluator.evaluate(&reference, &estimate)?;
//! report.print();
//! ```
//!
//! ## Conventions
//!
//! - Timestamps in seconds, positions in meters
//! - Quaternions stored `x y z w` in files, normalized on load
//! - Alignment maps the estimate frame into the reference frame

#![warn(missing_docs)]

// Poses, similarity transforms, trajectories
pub mod core;

// Timestamp association
pub mod sync;

// Region detection on the estimate
pub mod segmentation;

// Umeyama fit, per-region alignment, stitching
pub mod alignment;

// APE, RPE, statistics, offset search
pub mod evaluation;

// End-to-end evaluator
pub mod pipeline;

// Unified configuration
pub mod config;

// Trajectory and result files
pub mod io;

// Error types
pub mod error;

// Re-export commonly used types
pub use core::{Pose3D, Sim3, Trajectory};

pub use sync::{Association, associate};

pub use segmentation::{AlignmentRegion, RegionDetection, RegionDetector, RegionDetectorConfig};

pub use alignment::{SegmentAligner, SegmentOutcome, SegmentStatus, Stitcher, umeyama_alignment};

pub use evaluation::{
    AbsolutePoseError, AccuracyMetrics, DeltaUnit, ErrorStatistics, ErrorTable, PoseRelation,
    RelativePoseError, RpeSettings, find_time_offset,
};

pub use pipeline::{EvaluationReport, EvaluatorConfig, PoseErrorEvaluator};

pub use config::{ConfigLoadError, ParikshaConfig};

pub use error::{Error, Result};
