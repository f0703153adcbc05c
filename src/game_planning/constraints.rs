//! Inequality constraints of the dynamic game
//!
//! Per agent, in fixed order: input upper bounds, input lower bounds,
//! pairwise collision avoidance, lane containment. Feasible iff every
//! entry is <= 0.

use crate::game_planning::model::{control, state, GameProblem, NU};
use crate::lane::Lane;

/// Scale matching the input bounds to the geometric constraints
const INPUT_SCALE: f64 = 1e3;
/// Sentinel squared distance for a lane that cannot be used at this step
const UNAVAILABLE_DIST2: f64 = 1e3;
/// Side lanes shorter than this are ignored [m]
const MIN_SIDE_LANE_LEN: f64 = 10.0;

impl GameProblem<'_> {
    /// Evaluate all inequality constraints into `out` (length `constraint_len`).
    pub fn constraints(&self, out: &mut [f64], x: &[f64], u: &[f64]) {
        let nc_i = self.layout.constraints_per_agent();
        for i in 0..self.layout.agents {
            self.agent_constraints(&mut out[nc_i * i..nc_i * (i + 1)], x, u, i);
        }
    }

    /// Evaluate the constraints of one agent into `out` (length `constraints_per_agent`).
    pub fn agent_constraints(&self, out: &mut [f64], x: &[f64], u: &[f64], agent: usize) {
        let layout = self.layout;
        let steps = layout.steps;
        let cfg = self.cfg;

        // Input bounds, upper then lower.
        let lower = NU * steps;
        for j in 0..steps {
            let d = u[layout.control(agent, j, control::STEER)];
            let f = u[layout.control(agent, j, control::FORCE)];
            out[NU * j + control::STEER] = INPUT_SCALE * (d - cfg.steer_max);
            out[NU * j + control::FORCE] = INPUT_SCALE * (f - cfg.force_max);
            out[lower + NU * j + control::STEER] = INPUT_SCALE * (cfg.steer_min - d);
            out[lower + NU * j + control::FORCE] = INPUT_SCALE * (cfg.force_min - f);
        }

        // Collision avoidance against every other agent, ascending.
        let mut block = layout.input_block();
        for k in 0..layout.agents {
            if k == agent {
                continue;
            }
            for j in 0..steps {
                let dx = x[layout.state(agent, j, state::X)] - x[layout.state(k, j, state::X)];
                let dy = x[layout.state(agent, j, state::Y)] - x[layout.state(k, j, state::Y)];
                out[block + j] = cfg.r_safe * cfg.r_safe - (dx * dx + dy * dy);
            }
            block += steps;
        }

        // Lane containment.
        for j in 0..steps {
            let lat2 = self.squared_lateral_distance(x, agent, j);
            out[block + j] = lat2 - cfg.r_lane * cfg.r_lane;
        }
    }

    /// Squared lateral distance from agent position at step `j` to the
    /// nearest admissible lane curve.
    fn squared_lateral_distance(&self, x: &[f64], agent: usize, j: usize) -> f64 {
        let layout = self.layout;
        let record = &self.traffic[agent];
        let s = x[layout.state(agent, j, state::S)];
        let px = x[layout.state(agent, j, state::X)];
        let py = x[layout.state(agent, j, state::Y)];

        let center = if s < record.centerlane.s_max {
            lateral_term(&record.centerlane, px, py, s)
        } else {
            UNAVAILABLE_DIST2
        };
        let left = if record.leftlane.present
            && s < record.leftlane.s_max
            && record.leftlane.s_max > MIN_SIDE_LANE_LEN
        {
            lateral_term(&record.leftlane, px, py, s)
        } else {
            UNAVAILABLE_DIST2
        };
        let right = if record.rightlane.present
            && s < record.rightlane.s_max
            && record.rightlane.s_max > MIN_SIDE_LANE_LEN
        {
            lateral_term(&record.rightlane, px, py, s)
        } else {
            UNAVAILABLE_DIST2
        };

        center.min(left.min(right))
    }

    /// Report violated constraints per agent on stderr.
    ///
    /// With `dump` set, additionally prints every constraint value grouped
    /// by block. Observability only; never affects control flow.
    pub fn constraint_report(&self, c: &[f64], dump: bool) {
        let layout = self.layout;
        let nc_i = layout.constraints_per_agent();
        let input_end = layout.input_block();
        let collision_end = input_end + layout.collision_block();

        for i in 0..layout.agents {
            for j in 0..nc_i {
                let value = c[nc_i * i + j];
                if value > 0.0 {
                    if j < input_end {
                        eprintln!("vehicle {} violates input constraints: {}", i, value);
                    } else if j < collision_end {
                        eprintln!(
                            "vehicle {} violates collision avoidance constraints: {}",
                            i, value
                        );
                    } else {
                        eprintln!("vehicle {} violates lane constraints: {}", i, value);
                    }
                }
            }
            if dump {
                eprintln!("vehicle {}", i);
                eprintln!("input constraints:");
                for j in 0..input_end {
                    eprint!("{:.4}\t", c[nc_i * i + j]);
                }
                eprintln!("\ncollision avoidance constraints:");
                for j in input_end..collision_end {
                    eprint!("{:.4}\t", c[nc_i * i + j]);
                }
                eprintln!("\nlane constraints:");
                for j in collision_end..nc_i {
                    eprint!("{:.4}\t", c[nc_i * i + j]);
                }
                eprintln!();
            }
        }
    }
}

/// Squared full distance to the lane point minus the squared longitudinal
/// projection onto the lane tangent: the approximate squared lateral offset.
fn lateral_term(lane: &Lane, px: f64, py: f64, s: f64) -> f64 {
    let lx = lane.spline_x(s);
    let ly = lane.spline_y(s);
    let psi = lane.compute_heading(s);
    let full = (px - lx).powi(2) + (py - ly).powi(2);
    let long = (px - lx) * psi.cos() + (py - ly) * psi.sin();
    full - long * long
}
