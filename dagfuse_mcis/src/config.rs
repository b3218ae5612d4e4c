//! Tuning knobs for the MCIS engines.
//!
//! The defaults reproduce the historical constants: a 5 s search deadline,
//! the 1000-node product-graph gate in front of the clique search, the
//! width-10 clique short-circuit and the 10-node cap on the degree-heuristic
//! fallback. Raising any of them is a tuning decision, not a correctness
//! change.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shared engine limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Wall-clock budget for one engine invocation, in milliseconds.
    pub timeout_ms: u64,
    /// Above this many product nodes, Bron-Kerbosch answers with the degree
    /// heuristic instead of enumerating cliques.
    pub product_node_limit: usize,
    /// The clique search stops once the first recorded clique exceeds this
    /// size.
    pub max_clique_width: usize,
    /// Maximum number of nodes emitted by the heuristic fallback.
    pub fallback_node_cap: usize,
}

impl MatchConfig {
    pub fn new(
        timeout_ms: u64,
        product_node_limit: usize,
        max_clique_width: usize,
        fallback_node_cap: usize,
    ) -> Self {
        Self {
            timeout_ms,
            product_node_limit,
            max_clique_width,
            fallback_node_cap,
        }
    }

    /// Convenience: default limits with a different deadline.
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Self::default()
        }
    }

    /// The deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for MatchConfig {
    /// Mirrors the historical behaviour: 5000 ms, 1000-node gate, width 10,
    /// fallback cap 10.
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            product_node_limit: 1_000,
            max_clique_width: 10,
            fallback_node_cap: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_historical_constants() {
        let config = MatchConfig::default();
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.product_node_limit, 1_000);
        assert_eq!(config.max_clique_width, 10);
        assert_eq!(config.fallback_node_cap, 10);
        assert_eq!(config.timeout(), Duration::from_millis(5_000));
    }

    #[test]
    fn serde_roundtrip() {
        let config = MatchConfig::with_timeout_ms(250);
        let json = serde_json::to_string(&config).unwrap();
        let back: MatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
