//! Error types for rust_traffic_game

use std::fmt;

/// Main error type for the traffic game planner
#[derive(Debug)]
pub enum PlannerError {
    /// The planning scenario is malformed (empty traffic, bad horizon, ...)
    InvalidScenario(String),
    /// Lane geometry could not be built from the given waypoints
    LaneGeometry(String),
    /// Numerical computation failed
    Numerical(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::InvalidScenario(msg) => write!(f, "Invalid scenario: {}", msg),
            PlannerError::LaneGeometry(msg) => write!(f, "Lane geometry error: {}", msg),
            PlannerError::Numerical(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::InvalidScenario("empty traffic".to_string());
        assert_eq!(format!("{}", err), "Invalid scenario: empty traffic");
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> =
            Box::new(PlannerError::Numerical("singular".to_string()));
        assert!(err.to_string().contains("singular"));
    }
}
