//! Trajectory segmentation around tracking loss and relocalization events.
//!
//! See [`RegionDetector`] for the checkpoint rules.

mod regions;

pub use regions::{
    AlignmentRegion, LostRegion, RegionDetection, RegionDetector, RegionDetectorConfig,
};
