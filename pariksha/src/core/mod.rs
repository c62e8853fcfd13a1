//! Core types: poses, similarity transforms and trajectories.
//!
//! - [`Pose3D`]: a single timestamped 6-DoF pose
//! - [`Sim3`]: 7-DoF similarity transform used to align an estimate to a reference
//! - [`Trajectory`]: ordered pose sequence with lazily derived speeds

mod pose;
mod sim3;
mod trajectory;

pub use pose::Pose3D;
pub use sim3::Sim3;
pub use trajectory::Trajectory;
