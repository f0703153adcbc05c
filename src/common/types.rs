//! Common types used throughout rust_traffic_game

use crate::lane::Lane;

/// One sample of a predicted vehicle trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub x: f64,
    pub y: f64,
    pub v: f64,
    pub psi: f64,
    /// Yaw rate [rad/s]
    pub omega: f64,
    /// Side-slip angle [rad]
    pub beta: f64,
    pub t_start: f64,
    pub t_end: f64,
}

/// One sample of a predicted control sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    /// Longitudinal acceleration [m/s^2]
    pub a: f64,
    /// Steering angle [rad]
    pub delta: f64,
}

/// One traffic participant handed to the planner
///
/// Pose, target speed and lanes are inputs; `predicted_trajectory` and
/// `predicted_control` are filled by the planner on return.
#[derive(Debug, Clone)]
pub struct TrafficParticipant {
    pub x: f64,
    pub y: f64,
    pub v: f64,
    pub psi: f64,
    /// Desired cruise speed [m/s]
    pub v_target: f64,
    pub centerlane: Lane,
    pub leftlane: Lane,
    pub rightlane: Lane,
    pub predicted_trajectory: Vec<TrajectoryPoint>,
    pub predicted_control: Vec<ControlInput>,
}

impl TrafficParticipant {
    pub fn new(
        x: f64,
        y: f64,
        v: f64,
        psi: f64,
        v_target: f64,
        centerlane: Lane,
        leftlane: Lane,
        rightlane: Lane,
    ) -> Self {
        Self {
            x,
            y,
            v,
            psi,
            v_target,
            centerlane,
            leftlane,
            rightlane,
            predicted_trajectory: Vec::new(),
            predicted_control: Vec::new(),
        }
    }
}

/// Ordered collection of traffic participants
pub type TrafficParticipants = Vec<TrafficParticipant>;
