//! Forward Euler integration of the joint dynamics

use crate::game_planning::model::{control, dynamic_step, state, GameProblem, Reference, NX};

/// Neutral longitudinal force used for the initial guess
const INITIAL_FORCE: f64 = 0.3;

impl GameProblem<'_> {
    /// Fill `u` with the neutral guess (straight steering, light throttle)
    /// and integrate it into `x`.
    pub fn initial_guess(&self, x: &mut [f64], u: &mut [f64]) {
        for i in 0..self.layout.agents {
            for j in 0..self.layout.steps {
                u[self.layout.control(i, j, control::STEER)] = 0.0;
                u[self.layout.control(i, j, control::FORCE)] = INITIAL_FORCE;
            }
        }
        self.integrate(x, u);
    }

    /// Integrate the joint control vector `u` into the joint state `x`.
    ///
    /// Each agent starts from its measured pose with s = l = 0 and steps
    /// N+1 times; every produced step is written into `x`, so the first
    /// stored sample already lies one Euler step past the current pose.
    /// Speed is clipped to zero from below after every step.
    pub fn integrate(&self, x: &mut [f64], u: &[f64]) {
        let n = self.cfg.horizon as f64;
        let dt = self.cfg.dt;
        let mut s = [0.0; NX];
        let mut ds = [0.0; NX];

        for (i, agent) in self.traffic.iter().enumerate() {
            s[state::X] = agent.x;
            s[state::Y] = agent.y;
            s[state::V] = agent.v;
            s[state::PSI] = agent.psi;
            s[state::S] = 0.0;
            s[state::L] = 0.0;

            for j in 0..self.layout.steps {
                // Reference point on the center lane at the agent's own progress.
                let s_ref = s[state::S];
                let reference = Reference {
                    x: agent.centerlane.spline_x(s_ref),
                    y: agent.centerlane.spline_y(s_ref),
                    psi: agent.centerlane.compute_heading(s_ref),
                    v: agent.v + j as f64 * (agent.v_target - agent.v) / n,
                };

                let d = u[self.layout.control(i, j, control::STEER)];
                let f = u[self.layout.control(i, j, control::FORCE)];

                dynamic_step(&mut ds, &s, &reference, d, f, self.cfg);

                for c in 0..NX {
                    s[c] += dt * ds[c];
                }
                if s[state::V] < 0.0 {
                    s[state::V] = 0.0;
                }

                for c in 0..NX {
                    x[self.layout.state(i, j, c)] = s[c];
                }
            }
        }
    }
}
