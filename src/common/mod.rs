//! Common types and error definitions for rust_traffic_game

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
