//! Directed, weighted, node-tagged graph model for computation DAGs.
//!
//! This crate provides the graph structures consumed by the `dagfuse_mcis`
//! engines, together with constructors for the dataflow CDAGs of common
//! numerical kernels (matrix-vector multiply, Cooley-Tukey FFT butterfly
//! networks, Haar wavelet pyramids) and a Graphviz DOT renderer.

mod dot;
mod error;
mod graph;
mod node;
mod node_id;

pub mod factory;

pub use error::{GraphError, NodeError};
pub use graph::Graph;
pub use node::Node;
pub use node_id::NodeId;
