//! Lane geometry
//!
//! A lane is a pair of cubic splines x(s), y(s) parameterized by arc
//! length, with a validity range [0, s_max]. Side lanes may be absent.

pub mod spline;

use crate::common::{PlannerError, PlannerResult};
use spline::Spline1D;
use std::f64::consts::PI;

/// Lane centerline as x(s), y(s) splines over arc length
#[derive(Debug, Clone)]
pub struct Lane {
    sx: Spline1D,
    sy: Spline1D,
    /// Arc length of the lane [m]
    pub s_max: f64,
    /// False for a side lane that does not exist
    pub present: bool,
}

impl Lane {
    /// Build a lane through the given waypoints.
    pub fn from_waypoints(x: &[f64], y: &[f64]) -> PlannerResult<Lane> {
        if x.len() != y.len() {
            return Err(PlannerError::LaneGeometry(
                "waypoint x and y lengths differ".to_string(),
            ));
        }
        if x.len() < 2 {
            return Err(PlannerError::LaneGeometry(
                "a lane needs at least 2 waypoints".to_string(),
            ));
        }

        // Cumulative arc length as the spline parameter.
        let mut s = Vec::with_capacity(x.len());
        s.push(0.0);
        for i in 1..x.len() {
            let ds = ((x[i] - x[i - 1]).powi(2) + (y[i] - y[i - 1]).powi(2)).sqrt();
            if ds <= 0.0 {
                return Err(PlannerError::LaneGeometry(
                    "duplicate consecutive waypoint".to_string(),
                ));
            }
            s.push(s[i - 1] + ds);
        }
        let s_max = s[s.len() - 1];

        Ok(Lane {
            sx: Spline1D::new(&s, x),
            sy: Spline1D::new(&s, y),
            s_max,
            present: true,
        })
    }

    /// Placeholder for a side lane that does not exist.
    pub fn absent() -> Lane {
        Lane {
            sx: Spline1D::new(&[0.0, 1.0], &[0.0, 0.0]),
            sy: Spline1D::new(&[0.0, 1.0], &[0.0, 0.0]),
            s_max: 0.0,
            present: false,
        }
    }

    /// x coordinate at arc length `s`
    pub fn spline_x(&self, s: f64) -> f64 {
        self.sx.sample(s)
    }

    /// y coordinate at arc length `s`
    pub fn spline_y(&self, s: f64) -> f64 {
        self.sy.sample(s)
    }

    /// Lane heading at arc length `s`, normalized to [0, 2*pi)
    pub fn compute_heading(&self, s: f64) -> f64 {
        let dx = self.sx.derivative(s);
        let dy = self.sy.derivative(s);
        let mut psi = dy.atan2(dx);
        if psi < 0.0 {
            psi += 2.0 * PI;
        }
        psi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_lane() {
        let lane = Lane::from_waypoints(&[0.0, 50.0, 100.0], &[0.0, 0.0, 0.0]).unwrap();
        assert!((lane.s_max - 100.0).abs() < 1e-9);
        assert!((lane.spline_x(30.0) - 30.0).abs() < 1e-6);
        assert!(lane.spline_y(30.0).abs() < 1e-6);
        assert!(lane.compute_heading(30.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_normalized() {
        // Lane pointing in -x: heading must come back as pi, not -pi.
        let lane = Lane::from_waypoints(&[100.0, 50.0, 0.0], &[3.5, 3.5, 3.5]).unwrap();
        let psi = lane.compute_heading(10.0);
        assert!((psi - PI).abs() < 1e-6);
        // Lane pointing in -y: heading in [0, 2*pi).
        let down = Lane::from_waypoints(&[0.0, 0.0], &[0.0, -50.0]).unwrap();
        let psi_down = down.compute_heading(10.0);
        assert!(psi_down >= 0.0 && psi_down < 2.0 * PI);
        assert!((psi_down - 1.5 * PI).abs() < 1e-6);
    }

    #[test]
    fn test_absent_lane() {
        let lane = Lane::absent();
        assert!(!lane.present);
        assert_eq!(lane.s_max, 0.0);
    }

    #[test]
    fn test_rejects_bad_waypoints() {
        assert!(Lane::from_waypoints(&[0.0], &[0.0]).is_err());
        assert!(Lane::from_waypoints(&[0.0, 1.0], &[0.0]).is_err());
        assert!(Lane::from_waypoints(&[0.0, 0.0], &[0.0, 0.0]).is_err());
    }
}
