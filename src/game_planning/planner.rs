//! Trust-region game solver and planner facade
//!
//! The outer loop alternates per-agent trust-region steps on the joint
//! control vector with augmented-Lagrangian multiplier updates and a
//! growing penalty schedule, until the joint gradient is small or the
//! iteration limit is reached. Exhaustion is not an error: the best
//! current controls are returned.

use nalgebra::{DMatrix, DVector};

use crate::common::{
    ControlInput, PlannerError, PlannerResult, TrafficParticipants, TrajectoryPoint,
};
use crate::game_planning::config::GameConfig;
use crate::game_planning::gradient::gradient_norm_squared;
use crate::game_planning::lagrangian::update_multipliers;
use crate::game_planning::model::{control, state, GameProblem};
use crate::game_planning::trust_region::{cauchy_step, predicted_reduction, sr1_update};

/// Outer iteration limit
const ITER_LIMIT: usize = 20;
/// Minimum reduction ratio to accept a step (eta)
const ACCEPTANCE_RATIO: f64 = 1e-4;
/// Reduction ratio above which the trust radius may double
const GROW_RATIO: f64 = 0.75;
/// Reduction ratio below which the trust radius halves
const SHRINK_RATIO: f64 = 0.1;
/// Convergence threshold on the squared gradient norm, per agent
const CONVERGENCE_PER_AGENT: f64 = 1e-2;
/// Initial per-agent trust radius
const INITIAL_RADIUS: f64 = 1.0;

/// Dynamic-game trajectory planner
pub struct GamePlanner {
    config: GameConfig,
}

/// Outcome of one solver run, for diagnostics and tests
struct SolveStats {
    iterations: usize,
    penalty: f64,
}

impl GamePlanner {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(GameConfig::default())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Plan trajectories for every participant.
    ///
    /// Returns a copy of the traffic with `predicted_trajectory` and
    /// `predicted_control` filled for each agent. Solver state (multipliers,
    /// penalty, trust radii, Hessians) is created fresh for every call.
    pub fn plan(&self, traffic: &TrafficParticipants) -> PlannerResult<TrafficParticipants> {
        if traffic.is_empty() {
            return Err(PlannerError::InvalidScenario(
                "no traffic participants".to_string(),
            ));
        }
        if self.config.horizon < 1 {
            return Err(PlannerError::InvalidScenario(
                "horizon must be at least 1".to_string(),
            ));
        }
        if self.config.dt <= 0.0 {
            return Err(PlannerError::InvalidScenario(
                "time step must be positive".to_string(),
            ));
        }

        let problem = GameProblem::new(&self.config, traffic);
        let mut x = vec![0.0; problem.layout.state_len()];
        let mut u = vec![0.0; problem.layout.control_len()];

        problem.initial_guess(&mut x, &mut u);
        let stats = solve(&problem, &mut u);
        eprintln!(
            "game planner iterations: {}, final penalty: {}",
            stats.iterations, stats.penalty
        );

        problem.integrate(&mut x, &u);
        problem.trajectory_report(&x, &u);

        let mut c = vec![0.0; problem.layout.constraint_len()];
        problem.constraints(&mut c, &x, &u);
        problem.constraint_report(&c, false);

        Ok(problem.predictions(&x, &u))
    }
}

/// Run the trust-region / penalty loop on `u` in place.
fn solve(problem: &GameProblem, u: &mut [f64]) -> SolveStats {
    let cfg = problem.cfg;
    let layout = problem.layout;
    let m = layout.agents;
    let nu_i = layout.agent_controls();
    let threshold = m as f64 * CONVERGENCE_PER_AGENT;

    // Fresh solver state for this call.
    let mut lambda = vec![0.0; layout.constraint_len()];
    let mut rho = cfg.penalty_init;
    let mut radius = vec![INITIAL_RADIUS; m];
    let mut hessians: Vec<DMatrix<f64>> = (0..m).map(|_| DMatrix::identity(nu_i, nu_i)).collect();

    let mut x_cur = vec![0.0; layout.state_len()];
    let mut x_trial = vec![0.0; layout.state_len()];
    let mut gradient = vec![0.0; layout.control_len()];
    let mut gradient_trial = vec![0.0; layout.control_len()];
    let mut lagr = vec![0.0; m];
    let mut lagr_trial = vec![0.0; m];
    let mut c = vec![0.0; layout.constraint_len()];
    let mut u_next = u.to_vec();
    let mut u_trial = u.to_vec();

    let mut g_slices: Vec<DVector<f64>> = (0..m).map(|_| DVector::zeros(nu_i)).collect();
    let mut steps: Vec<DVector<f64>> = (0..m).map(|_| DVector::zeros(nu_i)).collect();
    let mut y = DVector::zeros(nu_i);

    // Initial gradient and convergence gate.
    problem.integrate(&mut x_cur, &u_next);
    problem.lagrangians(&mut lagr, &x_cur, &u_next, &lambda, rho);
    problem.joint_gradient(&mut gradient, &u_next, &lagr, &lambda, rho);
    let mut converged = gradient_norm_squared(&gradient) < threshold;

    let mut iterations = 1;
    while !converged && iterations < ITER_LIMIT {
        // Gradient and Lagrangian at the current iterate.
        problem.integrate(&mut x_cur, &u_next);
        problem.lagrangians(&mut lagr, &x_cur, &u_next, &lambda, rho);
        problem.joint_gradient(&mut gradient, &u_next, &lagr, &lambda, rho);

        // Per-agent trust-region subproblem and tentative step.
        for i in 0..m {
            g_slices[i].copy_from_slice(&gradient[nu_i * i..nu_i * (i + 1)]);
            steps[i] = cauchy_step(&g_slices[i], &hessians[i], radius[i]);
            for k in 0..nu_i {
                u_trial[nu_i * i + k] = u_next[nu_i * i + k] + steps[i][k];
            }
        }

        // Gradient and Lagrangian at the tentative iterate.
        problem.integrate(&mut x_trial, &u_trial);
        problem.lagrangians(&mut lagr_trial, &x_trial, &u_trial, &lambda, rho);
        problem.joint_gradient(&mut gradient_trial, &u_trial, &lagr_trial, &lambda, rho);

        // Each agent accepts or rejects its own step.
        for i in 0..m {
            let actual = lagr[i] - lagr_trial[i];
            let predicted = predicted_reduction(&g_slices[i], &hessians[i], &steps[i]);
            let ratio = actual / predicted;

            // Comparisons are false on a NaN ratio, which keeps the step.
            if ratio < ACCEPTANCE_RATIO {
                for k in 0..nu_i {
                    u_trial[nu_i * i + k] = u_next[nu_i * i + k];
                }
            }
            if ratio > GROW_RATIO && steps[i].norm() > 0.8 * radius[i] {
                radius[i] *= 2.0;
            }
            if ratio < SHRINK_RATIO {
                radius[i] *= 0.5;
            }

            // Curvature update from the gradient difference, accepted or not.
            for k in 0..nu_i {
                y[k] = gradient_trial[nu_i * i + k] - gradient[nu_i * i + k];
            }
            sr1_update(&mut hessians[i], &steps[i], &y, cfg.sr1_tolerance);

            for k in 0..nu_i {
                u_next[nu_i * i + k] = u_trial[nu_i * i + k];
            }
        }

        if gradient_norm_squared(&gradient) < threshold {
            converged = true;
        }

        // Multiplier update and penalty growth at the committed iterate.
        problem.integrate(&mut x_cur, &u_next);
        problem.constraints(&mut c, &x_cur, &u_next);
        update_multipliers(&mut lambda, &c, rho);
        rho *= cfg.penalty_growth;
        iterations += 1;
    }

    correct_controls(&mut u_next, problem);
    u.copy_from_slice(&u_next);

    SolveStats {
        iterations,
        penalty: rho,
    }
}

/// Duplicate the terminal control sample from the previous step and clamp
/// steering into its bounds.
fn correct_controls(u: &mut [f64], problem: &GameProblem) {
    let layout = problem.layout;
    let cfg = problem.cfg;
    let last = layout.steps - 1;
    for i in 0..layout.agents {
        u[layout.control(i, last, control::STEER)] =
            u[layout.control(i, last - 1, control::STEER)];
        u[layout.control(i, last, control::FORCE)] =
            u[layout.control(i, last - 1, control::FORCE)];
        for j in 0..layout.steps {
            let idx = layout.control(i, j, control::STEER);
            u[idx] = u[idx].clamp(cfg.steer_min, cfg.steer_max);
        }
    }
}

impl GameProblem<'_> {
    /// Package the solved trajectories and controls into the traffic records.
    fn predictions(&self, x: &[f64], u: &[f64]) -> TrafficParticipants {
        let layout = self.layout;
        let cfg = self.cfg;
        let mut out = self.traffic.to_vec();

        for (i, record) in out.iter_mut().enumerate() {
            let mut trajectory = Vec::with_capacity(layout.steps);
            let mut controls = Vec::with_capacity(layout.steps);
            let mut t = 0.0;

            for j in 0..layout.steps {
                let v = x[layout.state(i, j, state::V)];
                let d = u[layout.control(i, j, control::STEER)];
                let f = u[layout.control(i, j, control::FORCE)];
                let a = -v / cfg.tau + cfg.throttle_gain * f;

                trajectory.push(TrajectoryPoint {
                    x: x[layout.state(i, j, state::X)],
                    y: x[layout.state(i, j, state::Y)],
                    v,
                    psi: x[layout.state(i, j, state::PSI)],
                    omega: v * d.tan() * (cfg.cg_ratio * d).cos() / cfg.length,
                    beta: 0.5 * d,
                    t_start: t,
                    t_end: t + cfg.dt,
                });
                controls.push(ControlInput { a, delta: d });
                t += cfg.dt;
            }

            record.predicted_trajectory = trajectory;
            record.predicted_control = controls;
        }
        out
    }

    /// Print the solved trajectory of every agent as a fixed-width table
    /// on stderr.
    fn trajectory_report(&self, x: &[f64], u: &[f64]) {
        let layout = self.layout;
        const W: usize = 12;

        for (i, agent) in self.traffic.iter().enumerate() {
            eprintln!("Vehicle: ({}, {}) \t{}", agent.x, agent.y, agent.v);
            eprintln!(
                "{:<W$}{:<W$}{:<W$}{:<W$}{:<W$}{:<W$}{:<W$}{:<W$}",
                "X", "Y", "V", "PSI", "S", "L", "F", "d"
            );
            eprintln!("{}", "-".repeat(W * 8));
            for j in 0..layout.steps {
                eprintln!(
                    "{:<W$.4}{:<W$.4}{:<W$.4}{:<W$.4}{:<W$.4}{:<W$.4}{:<W$.4}{:<W$.4}",
                    x[layout.state(i, j, state::X)],
                    x[layout.state(i, j, state::Y)],
                    x[layout.state(i, j, state::V)],
                    x[layout.state(i, j, state::PSI)],
                    x[layout.state(i, j, state::S)],
                    x[layout.state(i, j, state::L)],
                    u[layout.control(i, j, control::FORCE)],
                    u[layout.control(i, j, control::STEER)]
                );
            }
            eprintln!();
        }
    }
}
