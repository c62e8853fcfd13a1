//! Unified configuration loading for Pariksha.
//!
//! Loads all evaluation settings from a single YAML file with sensible
//! defaults. Every section and every key is optional.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pariksha::config::ParikshaConfig;
//!
//! // Load from default path (configs/pariksha.yaml)
//! let config = ParikshaConfig::load_default()?;
//!
//! // Convert to runtime configs
//! let evaluator_config = config.to_evaluator_config()?;
//! let offset_config = config.offset_search_config();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`AssociationSection`] | Timestamp tolerance and estimate clock offset |
//! | [`CleanupSection`] | Reference cleanup and body-frame offset |
//! | `segmentation` | Speed threshold and lost-run length ([`crate::segmentation::RegionDetectorConfig`]) |
//! | [`AlignmentSection`] | Scale correction and edge smoothing |
//! | [`MetricsSection`] | APE relation, RPE window, error table gaps |
//! | `offset_search` | Bracket and objective ([`crate::evaluation::OffsetSearchConfig`]) |
//!
//! ## Example YAML
//!
//! ```yaml
//! association:
//!   max_diff: 0.05          # seconds
//!   offset: 0.0             # added to estimate stamps
//!
//! cleanup:
//!   remove_non_monotonic: true
//!   abnormal_step_threshold: 6.0   # m/s, omit to disable
//!
//! segmentation:
//!   speed_threshold: 3.0    # m/s, jumps above start a new region
//!   min_lost_run: 3         # repeated poses before a stall counts
//!
//! alignment:
//!   correct_scale: true     # false for stereo / RGB-D
//!
//! metrics:
//!   ape_relation: point_distance
//!   rpe:
//!     relation: translation_part
//!     delta: 60
//!     delta_unit: frames
//! ```

mod alignment;
mod association;
mod cleanup;
mod defaults;
mod error;
mod metrics;
mod pariksha;

// Re-export main types
pub use error::ConfigLoadError;
pub use pariksha::{DEFAULT_CONFIG_PATH, ParikshaConfig};

// Re-export section types
pub use alignment::AlignmentSection;
pub use association::AssociationSection;
pub use cleanup::CleanupSection;
pub use metrics::MetricsSection;
