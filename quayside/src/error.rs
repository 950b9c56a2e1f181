use thiserror::Error;

/// Errors that can occur during simulation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The simulation has been shut down and is no longer accessible.
    #[error("Simulation has been shut down")]
    SimulationShutdown,
    /// The configured port cannot run the requested simulation. Fatal,
    /// reported before any simulation state is mutated.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// An input value was rejected at the call site that computes with it.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The simulation is in an invalid state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}

/// A type alias for `Result<T, SimulationError>`.
pub type SimulationResult<T> = Result<T, SimulationError>;
