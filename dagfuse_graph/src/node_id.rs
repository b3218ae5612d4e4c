use contracts::*;
use std::fmt;

/// Stable handle to a node slot inside its owning [`Graph`](crate::Graph).
///
/// Handles are only meaningful for the graph that issued them. Removing a
/// node detaches every incident edge first, so no live neighbour map retains
/// a handle to a vacated slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    inner: u32,
}

impl NodeId {
    #[ensures(ret.inner == raw)]
    pub(crate) const fn new(raw: u32) -> Self {
        Self { inner: raw }
    }

    /// Returns the handle as a usize for arena indexing.
    #[ensures(ret == self.inner as usize)]
    pub const fn as_usize(self) -> usize {
        self.inner as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.inner)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(raw: usize) -> Self {
        Self::new(raw as u32)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.inner as Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_usize() {
        let id = NodeId::new(7);
        assert_eq!(id.as_usize(), 7);
        assert_eq!(NodeId::from(7usize), id);
        assert_eq!(usize::from(id), 7);
    }

    #[test]
    fn orders_by_raw_index() {
        assert!(NodeId::new(1) < NodeId::new(2));
        assert_eq!(NodeId::new(3).to_string(), "n3");
    }
}
