//! Closed-form least-squares similarity fit (Umeyama, 1991).
//!
//! Finds rotation `R`, translation `t` and scale `c` minimizing
//! `sum ||y_i - (c * R * x_i + t)||^2` over corresponding point pairs.
//!
//! # Algorithm
//!
//! 1. Center both point sets on their centroids.
//! 2. Build the cross-covariance `Σ = (1/n) Σ (y_i - ȳ)(x_i - x̄)^T`.
//! 3. SVD: `Σ = U D V^T`. Reflections are corrected by flipping the sign of
//!    the smallest singular direction when `det(U) det(V) < 0`.
//! 4. `R = U S V^T`, `c = tr(D S) / σ_x²`, `t = ȳ - c R x̄`.

use nalgebra::{Matrix3, Vector3};

use crate::core::Sim3;
use crate::error::{Error, Result};

/// Fit a similarity transform mapping `source` points onto `target` points.
///
/// With `with_scale = false` the scale is fixed to 1 and the result is a
/// rigid SE3 transform.
///
/// # Errors
///
/// [`Error::Alignment`] when the point sets differ in length, contain fewer
/// than two points, or are degenerate (rank-deficient covariance, zero
/// source spread).
pub fn umeyama_alignment(
    source: &[Vector3<f64>],
    target: &[Vector3<f64>],
    with_scale: bool,
) -> Result<Sim3> {
    if source.len() != target.len() {
        return Err(Error::Alignment(format!(
            "point sets differ in length: {} vs {}",
            source.len(),
            target.len()
        )));
    }
    let n = source.len();
    if n < 2 {
        return Err(Error::Alignment(format!(
            "need at least 2 point pairs, got {}",
            n
        )));
    }
    let inv_n = 1.0 / n as f64;

    let mean_x = source.iter().fold(Vector3::zeros(), |acc, p| acc + p) * inv_n;
    let mean_y = target.iter().fold(Vector3::zeros(), |acc, p| acc + p) * inv_n;

    let mut sigma_x = 0.0;
    let mut cov = Matrix3::zeros();
    for (x, y) in source.iter().zip(target.iter()) {
        let xc = x - mean_x;
        let yc = y - mean_y;
        sigma_x += xc.norm_squared();
        cov += yc * xc.transpose();
    }
    sigma_x *= inv_n;
    cov *= inv_n;

    let svd = cov.svd(true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(Error::Alignment("SVD did not converge".into()));
    };
    let d = svd.singular_values;

    let rank = d.iter().filter(|s| **s > f64::EPSILON).count();
    if rank < 2 {
        return Err(Error::Alignment(format!(
            "degenerate covariance (rank {}), points are collinear or coincident",
            rank
        )));
    }

    let mut s = Matrix3::identity();
    if u.determinant() * v_t.determinant() < 0.0 {
        s[(d.imin(), d.imin())] = -1.0;
    }

    let rotation = u * s * v_t;

    let scale = if with_scale {
        if sigma_x <= f64::EPSILON {
            return Err(Error::Alignment(
                "source points have zero spread, scale is undefined".into(),
            ));
        }
        (Matrix3::from_diagonal(&d) * s).trace() / sigma_x
    } else {
        1.0
    };

    let translation = mean_y - scale * (rotation * mean_x);

    Ok(Sim3::from_rts(rotation, translation, scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;

    fn cloud() -> Vec<Vector3<f64>> {
        (0..20)
            .map(|i| {
                let t = i as f64 * 0.3;
                Vector3::new(t.cos(), t.sin(), 0.1 * t)
            })
            .collect()
    }

    fn apply(sim: &Sim3, pts: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
        pts.iter().map(|p| sim.transform_point(p)).collect()
    }

    #[test]
    fn test_recovers_known_similarity() {
        let truth = Sim3 {
            rotation: UnitQuaternion::from_euler_angles(0.1, -0.4, 1.2),
            translation: Vector3::new(2.0, -1.0, 0.5),
            scale: 1.7,
        };
        let src = cloud();
        let dst = apply(&truth, &src);

        let fit = umeyama_alignment(&src, &dst, true).unwrap();
        assert_relative_eq!(fit.scale, 1.7, epsilon = 1e-9);
        assert_relative_eq!(fit.translation, truth.translation, epsilon = 1e-9);
        assert_relative_eq!(fit.rotation.angle_to(&truth.rotation), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rigid_fit_keeps_unit_scale() {
        let truth = Sim3 {
            rotation: UnitQuaternion::from_euler_angles(0.0, 0.0, 0.7),
            translation: Vector3::new(0.0, 3.0, 0.0),
            scale: 1.0,
        };
        let src = cloud();
        let dst = apply(&truth, &src);

        let fit = umeyama_alignment(&src, &dst, false).unwrap();
        assert_eq!(fit.scale, 1.0);
        assert_relative_eq!(fit.translation, truth.translation, epsilon = 1e-9);
    }

    #[test]
    fn test_half_scale_for_doubled_source() {
        let dst = cloud();
        let src: Vec<_> = dst.iter().map(|p| p * 2.0).collect();
        let fit = umeyama_alignment(&src, &dst, true).unwrap();
        assert_relative_eq!(fit.scale, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_reflection_is_not_returned() {
        // Mirror image in x: the best proper rotation still has det = +1.
        let src = cloud();
        let dst: Vec<_> = src.iter().map(|p| Vector3::new(-p.x, p.y, p.z)).collect();
        let fit = umeyama_alignment(&src, &dst, true).unwrap();
        let det = fit.rotation.to_rotation_matrix().matrix().determinant();
        assert_relative_eq!(det, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let src: Vec<_> = (0..10).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect();
        let dst = src.clone();
        assert!(matches!(
            umeyama_alignment(&src, &dst, true),
            Err(Error::Alignment(_))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let src = cloud();
        let dst = &src[..5];
        assert!(umeyama_alignment(&src, dst, true).is_err());
    }
}
