//! Maximum common induced subgraph (MCIS) engines for computation DAGs.
//!
//! Two engines sit behind the [`McisFinder`] capability trait: a
//! product-graph Bron-Kerbosch clique search ([`BronKerbosch`]) and an
//! iterated local-ratio hypergraph matcher ([`Kpt`]). The [`McisRunner`]
//! owns the installed engines, optionally restricts every input to a node
//! tag first, and routes [`Algorithm`] selections.

mod bron_kerbosch;
mod config;
mod error;
mod finder;
mod kpt;
mod product;
mod runner;
mod tuple;

pub use bron_kerbosch::BronKerbosch;
pub use config::MatchConfig;
pub use error::AlgorithmError;
pub use finder::{Algorithm, McisFinder};
pub use kpt::Kpt;
pub use product::ProductGraph;
pub use runner::McisRunner;
pub use tuple::NodeTuple;
