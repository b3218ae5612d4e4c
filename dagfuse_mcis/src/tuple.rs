use std::fmt;

/// Ordered tuple of node ids, one per input graph.
///
/// Serves both as a product-graph vertex and as a KPT hyperedge; equality
/// and ordering are lexicographic over the component ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeTuple {
    ids: Vec<String>,
}

impl NodeTuple {
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Component id for the given graph index.
    pub fn get(&self, graph_idx: usize) -> &str {
        &self.ids[graph_idx]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Canonical result-node name: the component ids joined with `_`.
    pub fn joined_id(&self) -> String {
        self.ids.join("_")
    }
}

impl fmt::Display for NodeTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_lexicographically() {
        let a = NodeTuple::new(vec!["a".into(), "z".into()]);
        let b = NodeTuple::new(vec!["b".into(), "a".into()]);
        assert!(a < b);
    }

    #[test]
    fn joins_ids_with_underscores() {
        let t = NodeTuple::new(vec!["x_0".into(), "s1_0".into(), "X_0".into()]);
        assert_eq!(t.joined_id(), "x_0_s1_0_X_0");
        assert_eq!(t.to_string(), t.joined_id());
    }
}
