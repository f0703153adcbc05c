//! Dynamic-game trajectory planning
//!
//! This module contains the generalized Nash equilibrium solver for
//! interacting road vehicles:
//! - Kinematic bicycle model and joint-vector layout
//! - Forward Euler integration over the horizon
//! - Coupled inequality constraints (inputs, collisions, lane containment)
//! - Augmented Lagrangian with a growing penalty schedule
//! - Parallel forward-difference gradient
//! - Per-agent trust-region SR1 iteration

pub mod config;
pub mod constraints;
pub mod gradient;
pub mod integrator;
pub mod lagrangian;
pub mod model;
pub mod planner;
pub mod trust_region;

pub use config::GameConfig;
pub use model::{GameProblem, Layout, NU, NX};
pub use planner::GamePlanner;
