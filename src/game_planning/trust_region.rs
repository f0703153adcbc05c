//! Trust-region subproblem and SR1 curvature update

use nalgebra::{DMatrix, DVector};

/// Gradients below this norm produce the zero step
const DEGENERATE_GRADIENT: f64 = 1e-12;

/// Minimize the quadratic model g^T s + 0.5 s^T H s along the steepest
/// descent direction inside the trust radius `delta`.
///
/// The Cauchy point is clipped to the boundary; indefinite or negative
/// curvature along g takes the full boundary step.
pub fn cauchy_step(g: &DVector<f64>, h: &DMatrix<f64>, delta: f64) -> DVector<f64> {
    let norm_g = g.norm();
    if !norm_g.is_finite() || norm_g < DEGENERATE_GRADIENT {
        return DVector::zeros(g.len());
    }

    let boundary = -(delta / norm_g) * g;
    let ghg = (g.transpose() * h * g)[(0, 0)];
    let tau = if ghg <= 0.0 {
        1.0
    } else {
        (norm_g.powi(3) / (delta * ghg)).min(1.0)
    };
    tau * boundary
}

/// Model reduction predicted by the quadratic at step `s`:
/// -(g^T s + 0.5 s^T H s).
pub fn predicted_reduction(g: &DVector<f64>, h: &DMatrix<f64>, s: &DVector<f64>) -> f64 {
    -(g.dot(s) + 0.5 * (s.transpose() * h * s)[(0, 0)])
}

/// Symmetric rank-one update of `h` from step `s` and gradient difference
/// `y`, skipped when the denominator is not safely bounded away from zero.
pub fn sr1_update(h: &mut DMatrix<f64>, s: &DVector<f64>, y: &DVector<f64>, tolerance: f64) {
    let omega = y - &*h * s;
    let denom = omega.dot(s);
    if denom.abs() > tolerance * s.norm() * omega.norm() {
        *h += &omega * omega.transpose() / denom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_gradient_gives_zero_step() {
        let g = DVector::zeros(4);
        let h = DMatrix::identity(4, 4);
        let s = cauchy_step(&g, &h, 1.0);
        assert_eq!(s.norm(), 0.0);
    }

    #[test]
    fn test_small_gradient_takes_unconstrained_cauchy_point() {
        // With H = I and ||g|| < delta the Cauchy point is -g itself.
        let g = DVector::from_vec(vec![0.3, -0.4]);
        let h = DMatrix::identity(2, 2);
        let s = cauchy_step(&g, &h, 10.0);
        assert!((s[0] + 0.3).abs() < 1e-12);
        assert!((s[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_large_gradient_is_clipped_to_boundary() {
        let g = DVector::from_vec(vec![30.0, -40.0]);
        let h = DMatrix::identity(2, 2);
        let delta = 2.0;
        let s = cauchy_step(&g, &h, delta);
        assert!((s.norm() - delta).abs() < 1e-12);
        // Step points along -g.
        assert!(s[0] < 0.0 && s[1] > 0.0);
    }

    #[test]
    fn test_negative_curvature_takes_boundary_step() {
        let g = DVector::from_vec(vec![1.0, 0.0]);
        let h = -DMatrix::identity(2, 2);
        let delta = 0.5;
        let s = cauchy_step(&g, &h, delta);
        assert!((s.norm() - delta).abs() < 1e-12);
    }

    #[test]
    fn test_predicted_reduction_for_identity_hessian() {
        let g = DVector::from_vec(vec![1.0, 0.0]);
        let h = DMatrix::identity(2, 2);
        let s = DVector::from_vec(vec![-1.0, 0.0]);
        // -(g.s + 0.5 s.s) = -(-1 + 0.5) = 0.5
        assert!((predicted_reduction(&g, &h, &s) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sr1_recovers_curvature() {
        // Start from identity; after updating with y = B s the secant
        // equation H s = y must hold for the true B.
        let b = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let mut h = DMatrix::identity(2, 2);
        let s = DVector::from_vec(vec![1.0, -1.0]);
        let y = &b * &s;
        sr1_update(&mut h, &s, &y, 1e-8);
        let hs = &h * &s;
        assert!((hs - y).norm() < 1e-10);
    }

    #[test]
    fn test_sr1_skips_degenerate_update() {
        // y = H s makes omega vanish: the update must be skipped.
        let mut h = DMatrix::identity(3, 3);
        let before = h.clone();
        let s = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let y = &h * &s;
        sr1_update(&mut h, &s, &y, 1e-8);
        assert_eq!(h, before);
    }
}
