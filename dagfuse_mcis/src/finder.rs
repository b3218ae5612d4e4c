use std::fmt;

use dagfuse_graph::Graph;
use serde::{Deserialize, Serialize};

use crate::error::AlgorithmError;

/// Selector for the engines a [`McisRunner`](crate::McisRunner) installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Product-graph maximal-clique search with pivoting.
    BronKerboschSerial,
    /// Iterated local-ratio matching on the conflict hypergraph.
    Kpt,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::BronKerboschSerial => write!(f, "bron-kerbosch-serial"),
            Algorithm::Kpt => write!(f, "kpt"),
        }
    }
}

/// Capability interface every MCIS engine implements.
///
/// Inputs are borrowed immutably for the duration of the call and any tag
/// filtering has already happened by the time an engine sees them. Engines
/// return one graph per retained solution; node ids in results join the
/// per-input ids with `_`.
pub trait McisFinder {
    fn find(&self, graphs: &[&Graph]) -> Result<Vec<Graph>, AlgorithmError>;
}
