use std::cell::Cell;
use std::fmt;

use ahash::{AHashMap, AHashSet};

use crate::error::{GraphError, NodeError};
use crate::node::Node;
use crate::node_id::NodeId;

/// Directed, weighted, node-tagged graph backed by an arena of nodes.
///
/// Nodes are owned by the graph and addressed either by their string id or by
/// the [`NodeId`] arena handle. Every mutation bumps the version counter and
/// invalidates the memoized acyclicity answer.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    index: AHashMap<String, NodeId>,
    version: u64,
    dag_cache: Cell<Option<bool>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Colour {
    White,
    Grey,
    Black,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_num_nodes(&self) -> usize {
        self.index.len()
    }

    /// Monotonically increasing mutation counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Capacity hint; no semantic effect.
    pub fn reserve_nodes(&mut self, additional: usize) {
        self.slots.reserve(additional);
        self.index.reserve(additional);
    }

    /// Resolves an arena handle to its node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.as_usize()).and_then(Option::as_ref)
    }

    /// Resolves a string id to its arena handle.
    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_id(id).and_then(|handle| self.node(handle))
    }

    /// String id behind an arena handle.
    pub fn id_of(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(Node::id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Node ids in ascending order; callers that need a reproducible
    /// enumeration (the MCIS engines do) start from this.
    pub fn sorted_node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.index.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// True iff any present edge carries a non-zero weight.
    pub fn is_weighted(&self) -> bool {
        self.nodes().any(|n| n.children().any(|(_, w)| w != 0))
    }

    fn touch(&mut self) {
        self.version += 1;
        self.dag_cache.set(None);
    }

    pub fn add_node(&mut self, id: impl Into<String>) -> Result<NodeId, GraphError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(GraphError::NodeAlreadyExists);
        }
        let node = Node::new(id.clone());
        let handle = match self.free.pop() {
            Some(handle) => {
                self.slots[handle.as_usize()] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                NodeId::from(self.slots.len() - 1)
            }
        };
        self.index.insert(id, handle);
        self.touch();
        Ok(handle)
    }

    /// Adds every id or none: a duplicate anywhere (against the graph or
    /// within the batch) fails the whole call before any insertion.
    pub fn add_node_set<I, S>(&mut self, ids: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        let mut batch: AHashSet<&str> = AHashSet::with_capacity(ids.len());
        for id in &ids {
            if self.index.contains_key(id.as_str()) || !batch.insert(id.as_str()) {
                return Err(GraphError::NodeAlreadyExists);
            }
        }
        for id in ids {
            self.add_node(id)?;
        }
        Ok(())
    }

    /// Removes the node after detaching every incident edge, in both
    /// directions, from its neighbours.
    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphError> {
        let handle = self.node_id(id).ok_or(GraphError::NodeDoesNotExist)?;
        let Some(node) = self.slots[handle.as_usize()].take() else {
            return Err(GraphError::NodeDoesNotExist);
        };
        for (child, _) in node.children() {
            if let Some(child_node) = self.slots[child.as_usize()].as_mut() {
                child_node.remove_parent(handle);
            }
        }
        for (parent, _) in node.parents() {
            if let Some(parent_node) = self.slots[parent.as_usize()].as_mut() {
                parent_node.remove_child(handle);
            }
        }
        self.index.remove(node.id());
        self.free.push(handle);
        self.touch();
        Ok(())
    }

    /// Removes each listed node that exists; returns the number removed.
    pub fn remove_nodes_bulk(&mut self, ids: &[&str]) -> usize {
        ids.iter().filter(|id| self.remove_node(id).is_ok()).count()
    }

    /// Adds a directed edge. Re-adding an existing edge with the same weight
    /// is an idempotent success; a different weight is rejected.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: i32) -> Result<(), GraphError> {
        let (from_h, to_h) = self.edge_handles(from, to)?;
        if from_h == to_h {
            return Err(NodeError::SelfLoop.into());
        }
        match self.node(from_h).and_then(|n| n.edge_weight(to_h)) {
            Some(existing) if existing == weight => return Ok(()),
            Some(_) => return Err(NodeError::EdgeAlreadyExists.into()),
            None => {}
        }
        if let Some(node) = self.slots[from_h.as_usize()].as_mut() {
            node.insert_child(to_h, weight);
        }
        if let Some(node) = self.slots[to_h.as_usize()].as_mut() {
            node.insert_parent(from_h, weight);
        }
        self.touch();
        Ok(())
    }

    /// Adds edges from `from` to every target, all or nothing. `weights`
    /// defaults each edge to 0 when absent and must otherwise match
    /// `to_ids` in length.
    pub fn add_edge_set(
        &mut self,
        from: &str,
        to_ids: &[&str],
        weights: Option<&[i32]>,
    ) -> Result<(), GraphError> {
        if let Some(weights) = weights {
            if weights.len() != to_ids.len() {
                return Err(GraphError::BulkOperationPartialFailure {
                    applied: 0,
                    source: Box::new(GraphError::InvalidParameters(
                        "weights length does not match target count".into(),
                    )),
                });
            }
        }

        let from_h = self.node_id(from).ok_or(GraphError::NodeDoesNotExist)?;
        let mut batch: AHashSet<NodeId> = AHashSet::with_capacity(to_ids.len());
        for (i, to) in to_ids.iter().enumerate() {
            let to_h = self.node_id(to).ok_or(GraphError::NodeDoesNotExist)?;
            if to_h == from_h {
                return Err(NodeError::SelfLoop.into());
            }
            if !batch.insert(to_h) {
                return Err(NodeError::EdgeAlreadyExists.into());
            }
            let intended = weights.map_or(0, |w| w[i]);
            if let Some(existing) = self.node(from_h).and_then(|n| n.edge_weight(to_h)) {
                if existing != intended {
                    return Err(NodeError::EdgeAlreadyExists.into());
                }
            }
        }

        for (applied, to) in to_ids.iter().enumerate() {
            let weight = weights.map_or(0, |w| w[applied]);
            if let Err(source) = self.add_edge(from, to, weight) {
                for rolled_back in &to_ids[..applied] {
                    let _ = self.remove_edge(from, rolled_back);
                }
                return Err(GraphError::BulkOperationPartialFailure {
                    applied,
                    source: Box::new(source),
                });
            }
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let (from_h, to_h) = self.edge_handles(from, to)?;
        if !self.node(from_h).is_some_and(|n| n.contains_edge(to_h)) {
            return Err(NodeError::EdgeDoesNotExist.into());
        }
        if let Some(node) = self.slots[from_h.as_usize()].as_mut() {
            node.remove_child(to_h);
        }
        if let Some(node) = self.slots[to_h.as_usize()].as_mut() {
            node.remove_parent(from_h);
        }
        self.touch();
        Ok(())
    }

    /// Overwrites both mirrors of an existing edge with the new weight.
    pub fn change_edge_weight(
        &mut self,
        from: &str,
        to: &str,
        weight: i32,
    ) -> Result<(), GraphError> {
        let (from_h, to_h) = self.edge_handles(from, to)?;
        if !self.node(from_h).is_some_and(|n| n.contains_edge(to_h)) {
            return Err(NodeError::EdgeDoesNotExist.into());
        }
        if let Some(node) = self.slots[from_h.as_usize()].as_mut() {
            node.insert_child(to_h, weight);
        }
        if let Some(node) = self.slots[to_h.as_usize()].as_mut() {
            node.insert_parent(from_h, weight);
        }
        self.touch();
        Ok(())
    }

    pub fn set_node_tag(&mut self, id: &str, tag: impl Into<String>) -> Result<(), GraphError> {
        let handle = self.node_id(id).ok_or(GraphError::NodeDoesNotExist)?;
        if let Some(node) = self.slots[handle.as_usize()].as_mut() {
            node.set_tag(tag.into());
        }
        self.touch();
        Ok(())
    }

    /// True when there is a directed edge between the named endpoints.
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Weight of the directed edge between the named endpoints, if present.
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<i32> {
        let from_h = self.node_id(from)?;
        let to_h = self.node_id(to)?;
        self.node(from_h)?.edge_weight(to_h)
    }

    /// New graph holding exactly the nodes whose tag equals `tag` (tags
    /// preserved) and the edges induced between them.
    pub fn get_subgraph_with_tag(&self, tag: &str) -> Graph {
        let mut keep: Vec<&Node> = self.nodes().filter(|n| n.tag() == tag).collect();
        keep.sort_by(|a, b| a.id().cmp(b.id()));

        let mut sub = Graph::new();
        sub.reserve_nodes(keep.len());
        for node in &keep {
            let _ = sub.add_node(node.id());
            let _ = sub.set_node_tag(node.id(), node.tag());
        }
        for node in &keep {
            for (child, weight) in node.children() {
                if let Some(child_node) = self.node(child) {
                    if child_node.tag() == tag {
                        let _ = sub.add_edge(node.id(), child_node.id(), weight);
                    }
                }
            }
        }
        sub
    }

    /// Three-colour depth-first acyclicity check, memoized until the next
    /// mutation.
    pub fn is_dag(&self) -> bool {
        if let Some(cached) = self.dag_cache.get() {
            return cached;
        }
        let result = self.check_acyclic();
        self.dag_cache.set(Some(result));
        result
    }

    fn check_acyclic(&self) -> bool {
        let mut colour = vec![Colour::White; self.slots.len()];
        for &start in self.index.values() {
            if colour[start.as_usize()] != Colour::White {
                continue;
            }
            colour[start.as_usize()] = Colour::Grey;
            let mut stack = vec![(start, self.child_handles(start).into_iter())];
            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                match frame.1.next() {
                    Some(next) => match colour[next.as_usize()] {
                        Colour::Grey => return false,
                        Colour::White => {
                            colour[next.as_usize()] = Colour::Grey;
                            stack.push((next, self.child_handles(next).into_iter()));
                        }
                        Colour::Black => {}
                    },
                    None => {
                        colour[node.as_usize()] = Colour::Black;
                        stack.pop();
                    }
                }
            }
        }
        true
    }

    fn child_handles(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| n.children().map(|(child, _)| child).collect())
            .unwrap_or_default()
    }

    fn edge_handles(&self, from: &str, to: &str) -> Result<(NodeId, NodeId), GraphError> {
        let from_h = self.node_id(from).ok_or(GraphError::NodeDoesNotExist)?;
        let to_h = self.node_id(to).ok_or(GraphError::NodeDoesNotExist)?;
        Ok((from_h, to_h))
    }
}

/// Structural equality: same node ids, and per node the same child set
/// compared by neighbour id and weight. Parent-side equality follows from the
/// mirror invariant; tags and versions are not compared.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        if self.get_num_nodes() != other.get_num_nodes() {
            return false;
        }
        self.nodes().all(|node| {
            let Some(other_node) = other.get_node(node.id()) else {
                return false;
            };
            if node.num_children() != other_node.num_children()
                || node.num_parents() != other_node.num_parents()
            {
                return false;
            }
            node.children().all(|(child, weight)| match self.id_of(child) {
                Some(child_id) => other.edge_weight(node.id(), child_id) == Some(weight),
                None => false,
            })
        })
    }
}

impl Eq for Graph {}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nodes: Vec<&Node> = self.nodes().collect();
        nodes.sort_by(|a, b| a.id().cmp(b.id()));
        for node in nodes {
            let mut children: Vec<(&str, i32)> = node
                .children()
                .filter_map(|(child, weight)| self.id_of(child).map(|id| (id, weight)))
                .collect();
            children.sort();
            let entries: Vec<String> = children
                .iter()
                .map(|(child, weight)| format!("{child}({weight})"))
                .collect();
            writeln!(f, "{}: [{}]", node.id(), entries.join(", "))?;
        }
        Ok(())
    }
}
