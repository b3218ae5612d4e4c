use thiserror::Error;

/// Errors surfaced by the MCIS engines and the runner.
///
/// Engines degrade recoverable situations (timeouts, oversized product
/// graphs) into fallback results instead of erroring; only unmet
/// preconditions reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    /// The input list was empty or one of the graphs had no nodes.
    #[error("input graph is empty")]
    EmptyGraph,
    /// The requested algorithm is not installed on this runner.
    #[error("invalid algorithm")]
    InvalidAlgorithm,
}
