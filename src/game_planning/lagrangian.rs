//! Per-agent augmented Lagrangian
//!
//! L_i = cost_i + sum_k [ 0.5 * rho * max(0, C_ik)^2 + lambda_ik * C_ik ]
//!
//! The multiplier term uses the raw constraint value; only the quadratic
//! penalty takes the positive part.

use crate::game_planning::model::{state, GameProblem};

impl GameProblem<'_> {
    /// Terminal cost of one agent: 0.5 * qf * l(N)^2 over the accumulated
    /// running cost.
    pub fn terminal_cost(&self, x: &[f64], agent: usize) -> f64 {
        let l = x[self.layout.state(agent, self.layout.steps - 1, state::L)];
        0.5 * self.cfg.terminal_weight * l * l
    }

    /// Augmented Lagrangian of one agent.
    ///
    /// `lambda` is the joint multiplier vector; `cbuf` is scratch of length
    /// `constraints_per_agent` reused by the caller.
    pub fn agent_lagrangian(
        &self,
        x: &[f64],
        u: &[f64],
        agent: usize,
        lambda: &[f64],
        rho: f64,
        cbuf: &mut [f64],
    ) -> f64 {
        self.agent_constraints(cbuf, x, u, agent);
        let base = agent * self.layout.constraints_per_agent();
        let mut value = self.terminal_cost(x, agent);
        for (k, &ck) in cbuf.iter().enumerate() {
            let plus = ck.max(0.0);
            value += 0.5 * rho * plus * plus + lambda[base + k] * ck;
        }
        value
    }

    /// Augmented Lagrangians of every agent into `out` (length M).
    pub fn lagrangians(&self, out: &mut [f64], x: &[f64], u: &[f64], lambda: &[f64], rho: f64) {
        let mut cbuf = vec![0.0; self.layout.constraints_per_agent()];
        for i in 0..self.layout.agents {
            out[i] = self.agent_lagrangian(x, u, i, lambda, rho, &mut cbuf);
        }
    }
}

/// Clipped multiplier update: lambda <- max(0, lambda + rho * c).
pub fn update_multipliers(lambda: &mut [f64], c: &[f64], rho: f64) {
    for (lk, &ck) in lambda.iter_mut().zip(c.iter()) {
        *lk = (*lk + rho * ck).max(0.0);
    }
}
