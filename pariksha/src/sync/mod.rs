//! Temporal synchronization between trajectories recorded on different clocks.

mod association;

pub use association::{Association, MIN_CORRESPONDENCES, associate, matching_time_indices};
