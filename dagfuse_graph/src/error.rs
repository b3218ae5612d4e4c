//! Error types for the graph model.

use thiserror::Error;

/// Errors raised by the node-level edge mirror primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The edge is already present with a different weight.
    #[error("edge already exists")]
    EdgeAlreadyExists,
    /// The edge to remove or reweight is not present.
    #[error("edge does not exist")]
    EdgeDoesNotExist,
    /// A node may not point at itself.
    #[error("self-loops are not allowed")]
    SelfLoop,
}

/// Errors raised by [`Graph`](crate::Graph) operations and the CDAG factories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node with the same id is already present.
    #[error("node already exists")]
    NodeAlreadyExists,
    /// The referenced node id is not present.
    #[error("node does not exist")]
    NodeDoesNotExist,
    /// The edge is already present with a different weight.
    #[error("edge already exists")]
    EdgeAlreadyExists,
    /// The referenced edge is not present.
    #[error("edge does not exist")]
    EdgeDoesNotExist,
    /// Self-loops are rejected at the graph surface.
    #[error("self-loops are not allowed")]
    SelfLoopNotAllowed,
    /// Rejected factory input (shapes, dimensions).
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// A bulk operation could not be completed; any applied prefix was rolled
    /// back before returning.
    #[error("bulk operation failed after {applied} applied operations: {source}")]
    BulkOperationPartialFailure {
        applied: usize,
        #[source]
        source: Box<GraphError>,
    },
}

impl From<NodeError> for GraphError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::EdgeAlreadyExists => GraphError::EdgeAlreadyExists,
            NodeError::EdgeDoesNotExist => GraphError::EdgeDoesNotExist,
            NodeError::SelfLoop => GraphError::SelfLoopNotAllowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_errors_map_to_graph_errors() {
        assert_eq!(
            GraphError::from(NodeError::EdgeAlreadyExists),
            GraphError::EdgeAlreadyExists
        );
        assert_eq!(
            GraphError::from(NodeError::SelfLoop),
            GraphError::SelfLoopNotAllowed
        );
    }

    #[test]
    fn bulk_failure_reports_cause() {
        let err = GraphError::BulkOperationPartialFailure {
            applied: 2,
            source: Box::new(GraphError::EdgeAlreadyExists),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("after 2 applied"));
    }
}
