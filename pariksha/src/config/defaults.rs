//! Default value functions for serde deserialization.

pub fn max_diff() -> f64 {
    0.05
}

pub fn enabled() -> bool {
    true
}

pub fn local_rotation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

pub fn ape_relation() -> crate::evaluation::PoseRelation {
    crate::evaluation::PoseRelation::PointDistance
}

pub fn max_null_length() -> usize {
    crate::evaluation::DEFAULT_MAX_NULL_LENGTH
}
