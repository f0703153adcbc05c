//! Planner configuration

/// Dynamic-game planner configuration
///
/// Bound once per planner; all weights and limits shared by every agent.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Number of steps beyond the first sample; the horizon has N+1 points
    pub horizon: usize,
    /// Integration step [s]
    pub dt: f64,

    /// Running-cost weight on (v - v_ref)^2
    pub weight_target_speed: f64,
    /// Running-cost weight on squared distance to the lane center
    pub weight_center_lane: f64,
    /// Running-cost weight on heading mismatch
    pub weight_heading: f64,
    /// Running-cost weight on the squared longitudinal input
    pub weight_input: f64,
    /// Terminal weight qf on the accumulated running cost
    pub terminal_weight: f64,

    /// Vehicle length [m]
    pub length: f64,
    /// Center-of-gravity ratio (0 = rear axle, 1 = front axle)
    pub cg_ratio: f64,
    /// Speed decay time constant [s]
    pub tau: f64,
    /// Longitudinal force gain [m/s^2]
    pub throttle_gain: f64,

    /// Steering bounds [rad]
    pub steer_min: f64,
    pub steer_max: f64,
    /// Normalized longitudinal force bounds
    pub force_min: f64,
    pub force_max: f64,

    /// Pairwise safety radius [m]
    pub r_safe: f64,
    /// Lane half-width [m]
    pub r_lane: f64,

    /// Forward-difference step for the gradient
    pub fd_step: f64,
    /// Initial penalty coefficient rho_0
    pub penalty_init: f64,
    /// Penalty growth factor gamma per outer iteration
    pub penalty_growth: f64,
    /// SR1 update skipping tolerance
    pub sr1_tolerance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            horizon: 10,
            dt: 0.2,
            weight_target_speed: 0.5,
            weight_center_lane: 1.0,
            weight_heading: 1.0,
            weight_input: 0.5,
            terminal_weight: 1.0,
            length: 3.0,
            cg_ratio: 0.5,
            tau: 4.0,
            throttle_gain: 5.0,
            steer_min: -0.6,
            steer_max: 0.6,
            force_min: -1.0,
            force_max: 1.0,
            r_safe: 3.0,
            r_lane: 2.0,
            fd_step: 1e-5,
            penalty_init: 1.0,
            penalty_growth: 1.5,
            sr1_tolerance: 1e-8,
        }
    }
}
