//! Parallel forward-difference gradient of the joint game
//!
//! Gradient entry `a` is the forward difference of the augmented
//! Lagrangian of the agent owning control index `a`. The index range is
//! partitioned into disjoint mutable chunks of the output buffer, one per
//! worker, so no synchronization is needed beyond the fork-join itself.

use crate::game_planning::model::GameProblem;
use rayon::prelude::*;

impl GameProblem<'_> {
    /// Differentiate every agent's augmented Lagrangian with respect to its
    /// own controls, into `gradient` (length `control_len`).
    ///
    /// `baseline` holds the per-agent Lagrangians at `u`, computed once per
    /// sweep by the caller and shared by all workers. Each worker owns
    /// private scratch copies of U and X; the source `u` is read-only.
    pub fn joint_gradient(
        &self,
        gradient: &mut [f64],
        u: &[f64],
        baseline: &[f64],
        lambda: &[f64],
        rho: f64,
    ) {
        let layout = self.layout;
        let eps = self.cfg.fd_step;
        let nu_agent = layout.agent_controls();
        let workers = rayon::current_num_threads().max(1);
        let chunk = (layout.control_len() + workers - 1) / workers;

        gradient
            .par_chunks_mut(chunk)
            .enumerate()
            .for_each(|(ci, out)| {
                let start = ci * chunk;
                let mut du = u.to_vec();
                let mut dx = vec![0.0; layout.state_len()];
                let mut cbuf = vec![0.0; layout.constraints_per_agent()];

                for (k, slot) in out.iter_mut().enumerate() {
                    let a = start + k;
                    let owner = a / nu_agent;
                    du[a] = u[a] + eps;
                    self.integrate(&mut dx, &du);
                    let perturbed =
                        self.agent_lagrangian(&dx, &du, owner, lambda, rho, &mut cbuf);
                    *slot = (perturbed - baseline[owner]) / eps;
                    du[a] = u[a];
                }
            });
    }
}

/// Squared Euclidean norm of the joint gradient.
pub fn gradient_norm_squared(gradient: &[f64]) -> f64 {
    gradient.iter().map(|g| g * g).sum()
}
