use ahash::AHashMap;

use crate::node_id::NodeId;

/// A single graph node: an immutable id, a mutable grouping tag, and weighted
/// edge mirrors to its neighbours.
///
/// All edge mutation goes through [`Graph`](crate::Graph) so the parent/child
/// mirrors of both endpoints stay consistent; the node itself only answers
/// queries.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    tag: String,
    children: AHashMap<NodeId, i32>,
    parents: AHashMap<NodeId, i32>,
}

impl Node {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            tag: String::new(),
            children: AHashMap::new(),
            parents: AHashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The grouping tag; the empty string means untagged.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub(crate) fn set_tag(&mut self, tag: String) {
        self.tag = tag;
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn num_parents(&self) -> usize {
        self.parents.len()
    }

    /// Total degree: incoming plus outgoing edges.
    pub fn degree(&self) -> usize {
        self.children.len() + self.parents.len()
    }

    /// True when the node has no incoming edges.
    pub fn is_source(&self) -> bool {
        self.parents.is_empty()
    }

    /// True when the node has no outgoing edges.
    pub fn is_sink(&self) -> bool {
        self.children.is_empty()
    }

    /// True when there is a directed edge from this node to `child`.
    pub fn contains_edge(&self, child: NodeId) -> bool {
        self.children.contains_key(&child)
    }

    /// True when there is a directed edge from `parent` to this node.
    pub fn check_parent(&self, parent: NodeId) -> bool {
        self.parents.contains_key(&parent)
    }

    /// Weight of the outgoing edge to `child`, if present.
    pub fn edge_weight(&self, child: NodeId) -> Option<i32> {
        self.children.get(&child).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (NodeId, i32)> + '_ {
        self.children.iter().map(|(&id, &w)| (id, w))
    }

    pub fn parents(&self) -> impl Iterator<Item = (NodeId, i32)> + '_ {
        self.parents.iter().map(|(&id, &w)| (id, w))
    }

    // Mirror primitives. Only `Graph` calls these, and it is responsible for
    // validation and for updating the opposite endpoint in the same step.

    pub(crate) fn insert_child(&mut self, child: NodeId, weight: i32) {
        self.children.insert(child, weight);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.remove(&child);
    }

    pub(crate) fn insert_parent(&mut self, parent: NodeId, weight: i32) {
        self.parents.insert(parent, weight);
    }

    pub(crate) fn remove_parent(&mut self, parent: NodeId) {
        self.parents.remove(&parent);
    }
}
