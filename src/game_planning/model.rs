//! Vehicle model and joint-vector layout
//!
//! The joint state and control vectors are flat buffers ordered
//! agent-major, time-major, component-minor. `Layout` is the only place
//! that computes offsets into them.

use crate::common::TrafficParticipant;
use crate::game_planning::config::GameConfig;

/// State components per agent and step
pub const NX: usize = 6;
/// Control components per agent and step
pub const NU: usize = 2;

/// Indices into one state block
pub mod state {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const V: usize = 2;
    pub const PSI: usize = 3;
    /// Accumulated path progress
    pub const S: usize = 4;
    /// Accumulated running cost
    pub const L: usize = 5;
}

/// Indices into one control block
pub mod control {
    pub const STEER: usize = 0;
    pub const FORCE: usize = 1;
}

/// Index view over the joint flat buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Number of agents M
    pub agents: usize,
    /// Number of time samples N+1
    pub steps: usize,
}

impl Layout {
    pub fn new(agents: usize, steps: usize) -> Self {
        Self { agents, steps }
    }

    /// Offset of state component `comp` of `agent` at time `step`
    #[inline]
    pub fn state(&self, agent: usize, step: usize, comp: usize) -> usize {
        (self.steps * agent + step) * NX + comp
    }

    /// Offset of control component `comp` of `agent` at time `step`
    #[inline]
    pub fn control(&self, agent: usize, step: usize, comp: usize) -> usize {
        (self.steps * agent + step) * NU + comp
    }

    /// Total joint state length
    pub fn state_len(&self) -> usize {
        NX * self.steps * self.agents
    }

    /// Total joint control length
    pub fn control_len(&self) -> usize {
        NU * self.steps * self.agents
    }

    /// Control length owned by one agent
    pub fn agent_controls(&self) -> usize {
        NU * self.steps
    }

    /// Length of the input-bound constraint block (upper + lower)
    pub fn input_block(&self) -> usize {
        2 * NU * self.steps
    }

    /// Length of the pairwise collision constraint block
    pub fn collision_block(&self) -> usize {
        self.steps * (self.agents - 1)
    }

    /// Inequality constraints per agent
    pub fn constraints_per_agent(&self) -> usize {
        self.input_block() + self.collision_block() + self.steps
    }

    /// Inequality constraints for all agents
    pub fn constraint_len(&self) -> usize {
        self.constraints_per_agent() * self.agents
    }
}

/// Tracking reference for one agent at one step
#[derive(Debug, Clone, Copy)]
pub struct Reference {
    pub x: f64,
    pub y: f64,
    pub psi: f64,
    pub v: f64,
}

/// Continuous bicycle dynamics and running-cost integrand.
///
/// Writes d(state)/dt into `d_state` for steering `d` and normalized
/// longitudinal force `f`.
pub fn dynamic_step(
    d_state: &mut [f64; NX],
    s: &[f64; NX],
    reference: &Reference,
    d: f64,
    f: f64,
    cfg: &GameConfig,
) {
    let kappa = cfg.cg_ratio;

    d_state[state::X] = s[state::V] * (s[state::PSI] + kappa * d).cos();
    d_state[state::Y] = s[state::V] * (s[state::PSI] + kappa * d).sin();
    d_state[state::V] = -s[state::V] / cfg.tau + cfg.throttle_gain * f;
    d_state[state::PSI] = s[state::V] * d.tan() * (kappa * d).cos() / cfg.length;
    d_state[state::S] = s[state::V];
    d_state[state::L] = cfg.weight_target_speed * (s[state::V] - reference.v).powi(2)
        + cfg.weight_center_lane
            * ((reference.x - s[state::X]).powi(2) + (reference.y - s[state::Y]).powi(2))
        + cfg.weight_heading
            * ((reference.psi.cos() - s[state::PSI].cos()).powi(2)
                + (reference.psi.sin() - s[state::PSI].sin()).powi(2))
        + cfg.weight_input * f * f;
}

/// Read-only view of one planning call: configuration, traffic and sizes.
#[derive(Clone, Copy)]
pub struct GameProblem<'a> {
    pub cfg: &'a GameConfig,
    pub traffic: &'a [TrafficParticipant],
    pub layout: Layout,
}

impl<'a> GameProblem<'a> {
    pub fn new(cfg: &'a GameConfig, traffic: &'a [TrafficParticipant]) -> Self {
        Self {
            cfg,
            traffic,
            layout: Layout::new(traffic.len(), cfg.horizon + 1),
        }
    }
}
