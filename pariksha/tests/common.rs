//! Test utilities for Pariksha integration tests.
//!
//! Synthetic reference trajectories and the typical ways a SLAM estimate
//! deviates from them: noise, stalls, jumps, scale drift and clock offsets.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use nalgebra::{UnitQuaternion, Vector3};
use pariksha::{Sim3, Trajectory, io};

/// Default sample period (seconds).
pub const DT: f64 = 0.05;

/// Helix around the z axis, yaw following the direction of travel.
///
/// Speed is about 1.02 m/s at [`DT`], well below the default jump threshold.
pub fn helix(n: usize, dt: f64) -> Trajectory {
    let stamps = (0..n).map(|i| i as f64 * dt).collect();
    let positions = (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            Vector3::new(t.cos(), t.sin(), 0.2 * t)
        })
        .collect();
    let orientations = (0..n)
        .map(|i| UnitQuaternion::from_euler_angles(0.0, 0.0, i as f64 * dt))
        .collect();
    Trajectory::new(stamps, positions, orientations).unwrap()
}

/// Planar path with strongly varying speed and fixed orientation.
///
/// Relative motions depend on absolute time, which makes RPE sensitive to
/// clock offsets.
pub fn wavy_line(n: usize, dt: f64) -> Trajectory {
    let stamps = (0..n).map(|i| i as f64 * dt).collect();
    let positions = (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            Vector3::new(t + 0.3 * (3.0 * t).sin(), 0.5 * t.sin(), 0.0)
        })
        .collect();
    let orientations = vec![UnitQuaternion::identity(); n];
    Trajectory::new(stamps, positions, orientations).unwrap()
}

/// Add deterministic position noise of amplitude `amp` (meters).
pub fn with_noise(trajectory: &Trajectory, amp: f64) -> Trajectory {
    let positions = trajectory
        .positions()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let k = i as f64;
            p + Vector3::new(
                (k * 0.7).sin() * amp,
                (k * 1.3).cos() * amp,
                (k * 0.3).sin() * amp,
            )
        })
        .collect();
    Trajectory::new(
        trajectory.timestamps().to_vec(),
        positions,
        trajectory.orientations().to_vec(),
    )
    .unwrap()
}

/// Freeze the pose at `start` for the next `len` samples, as a tracker that
/// lost track and then recovered.
///
/// Produces `len` zero-speed steps starting at step `start`, followed by a
/// catch-up jump.
pub fn with_stall(trajectory: &Trajectory, start: usize, len: usize) -> Trajectory {
    let mut positions = trajectory.positions().to_vec();
    let mut orientations = trajectory.orientations().to_vec();
    for i in start + 1..=start + len {
        positions[i] = positions[start];
        orientations[i] = orientations[start];
    }
    Trajectory::new(trajectory.timestamps().to_vec(), positions, orientations).unwrap()
}

/// Apply `transform` to every pose from index `from` on, as a map switch
/// after relocalization.
pub fn with_map_switch(trajectory: &Trajectory, from: usize, transform: &Sim3) -> Trajectory {
    let head = trajectory.slice(0..from);
    let tail = trajectory.slice(from..trajectory.len()).transformed(transform);
    Trajectory::concat(&[head, tail]).unwrap()
}

/// Shift all timestamps by `offset` seconds.
pub fn with_clock_offset(trajectory: &Trajectory, offset: f64) -> Trajectory {
    trajectory.with_time_offset(offset)
}

/// Similarity transform from yaw (radians), translation and scale.
pub fn sim3(yaw: f64, translation: [f64; 3], scale: f64) -> Sim3 {
    Sim3 {
        rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        translation: Vector3::from(translation),
        scale,
    }
}

/// Save `trajectory` as a TUM file named `name` inside `dir`.
pub fn write_tum_file(dir: &Path, name: &str, trajectory: &Trajectory) -> PathBuf {
    let path = dir.join(name);
    io::save_tum(trajectory, &path).unwrap();
    path
}
