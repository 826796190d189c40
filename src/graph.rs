//! The directed multigraph builder spec.md §3/§4.1 describes: densely
//! numbered vertices, per-vertex value lists of [`Ctx`], optionally labeled
//! edges, and the `shift`/`union`/`concat`/`merge` composition operators
//! the structural embedders are built from.
//!
//! Ids are handles assigned by an internal allocator (`add_node` always
//! returns the next free id) rather than threaded through call sites as
//! explicit parameters — the option spec.md §9's design notes recommend
//! over replaying the source's `len(g)` arithmetic everywhere. `shift` is
//! still the one place a caller chooses an explicit offset, exactly at the
//! sub-graph composition boundary where spec.md expects it.

use std::collections::HashMap;

use crate::ctx::Ctx;
use crate::error::CfgError;
use crate::macros::{cfg_trace, cfg_warn};

/// A vertex handle. Dense and 0-based within a given [`CfgGraph`] once
/// [`CfgGraph::reset_node_order`] has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Edge label alphabet (spec.md §6): a branch condition, or arbitrary
/// source text for switch case labels, catch dispatch, and
/// uncaught-exception edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLabel {
    True,
    False,
    Text(String),
}

impl EdgeLabel {
    pub fn text(s: impl Into<String>) -> Self {
        EdgeLabel::Text(s.into())
    }
}

/// A vertex promoted to terminal status by a jump redirector or the
/// null-node resolver: it either returns, falls off the body, or throws
/// uncaught. Carried out-of-band for the (out-of-scope) renderer to wire
/// to a synthetic end vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitNode {
    pub node: NodeId,
    pub values: Vec<Ctx>,
    pub label: Option<EdgeLabel>,
}

/// A directed multigraph with densely numbered vertices. Multi-edges
/// between the same ordered pair are never produced by this crate's
/// embedders, so edges are stored one-per-ordered-pair.
#[derive(Debug, Clone)]
pub struct CfgGraph {
    // `None` is a hole: a reserved id with no vertex in it yet (the
    // leading padding `shifted` introduces) or one removed mid-pass by
    // `remove_node`/`remove_nodes_from` before `reset_node_order` compacts
    // everything back to dense. `Some(vec![])` is a legitimate null node.
    nodes: Vec<Option<Vec<Ctx>>>,
    edges: HashMap<(usize, usize), Option<EdgeLabel>>,
    head: NodeId,
    last: NodeId,
}

impl CfgGraph {
    pub fn new() -> Self {
        CfgGraph {
            nodes: Vec::new(),
            edges: HashMap::new(),
            head: NodeId(0),
            last: NodeId(0),
        }
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn last(&self) -> NodeId {
        self.last
    }

    /// Total allocated ids, holes included. This is the `len(g)` the
    /// original implementation leans on to mint a fresh, never-colliding
    /// id; `add_node` uses the same arithmetic internally.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn exists(&self, v: NodeId) -> bool {
        matches!(self.nodes.get(v.0), Some(Some(_)))
    }

    pub fn node_value(&self, v: NodeId) -> Option<&Vec<Ctx>> {
        self.nodes.get(v.0).and_then(|slot| slot.as_ref())
    }

    pub fn set_node_value(&mut self, v: NodeId, values: Vec<Ctx>) {
        if let Some(slot) = self.nodes.get_mut(v.0) {
            *slot = Some(values);
        }
    }

    /// All live `(id, values)` pairs, in id order.
    pub fn node_items(&self) -> impl Iterator<Item = (NodeId, &Vec<Ctx>)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (NodeId(i), v)))
    }

    pub fn add_node(&mut self, values: Vec<Ctx>) -> NodeId {
        let id = NodeId(self.nodes.len());
        cfg_trace!("add_node {:?} ({} fragments)", id, values.len());
        self.nodes.push(Some(values));
        if id.0 == 0 {
            self.head = id;
        }
        self.last = id;
        id
    }

    pub fn add_nodes_from(&mut self, values_list: Vec<Vec<Ctx>>) -> Vec<NodeId> {
        values_list.into_iter().map(|v| self.add_node(v)).collect()
    }

    pub fn add_edge(
        &mut self,
        u: NodeId,
        v: NodeId,
        label: Option<EdgeLabel>,
    ) -> Result<(), CfgError> {
        if !self.exists(u) {
            return Err(CfgError::MissingEndpoint(u));
        }
        if !self.exists(v) {
            return Err(CfgError::MissingEndpoint(v));
        }
        cfg_trace!("add_edge {:?} -> {:?} ({:?})", u, v, label);
        // Duplicate unlabeled edges are idempotent: don't clobber a label
        // that's already there with `None`.
        self.edges.entry((u.0, v.0)).or_insert(label);
        Ok(())
    }

    pub fn add_edges_from(
        &mut self,
        edges: impl IntoIterator<Item = (NodeId, NodeId, Option<EdgeLabel>)>,
    ) -> Result<(), CfgError> {
        for (u, v, label) in edges {
            self.add_edge(u, v, label)?;
        }
        Ok(())
    }

    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) {
        self.edges.remove(&(u.0, v.0));
    }

    pub fn remove_edges_from(&mut self, edges: impl IntoIterator<Item = (NodeId, NodeId)>) {
        for (u, v) in edges {
            self.remove_edge(u, v);
        }
    }

    pub fn remove_node(&mut self, v: NodeId) {
        if let Some(slot) = self.nodes.get_mut(v.0) {
            *slot = None;
        }
        self.edges.retain(|&(a, b), _| a != v.0 && b != v.0);
    }

    pub fn remove_nodes_from(&mut self, nodes: impl IntoIterator<Item = NodeId>) {
        for v in nodes {
            self.remove_node(v);
        }
    }

    /// The label carried by edge `u -> v`, if that edge exists. Does not
    /// distinguish a missing edge from an edge with no label — callers that
    /// care use [`CfgGraph::successors`]/[`CfgGraph::predecessors`] first.
    pub fn edge_label(&self, u: NodeId, v: NodeId) -> Option<EdgeLabel> {
        self.edges.get(&(u.0, v.0)).and_then(|l| l.clone())
    }

    pub fn predecessors(&self, v: NodeId) -> Vec<NodeId> {
        self.edges
            .keys()
            .filter(|&&(_, b)| b == v.0)
            .map(|&(a, _)| NodeId(a))
            .collect()
    }

    pub fn successors(&self, v: NodeId) -> Vec<NodeId> {
        self.edges
            .keys()
            .filter(|&&(a, _)| a == v.0)
            .map(|&(_, b)| NodeId(b))
            .collect()
    }

    /// Transitive successor set, excluding `v` itself. O(V+E), as spec.md
    /// §5 calls out for the throw-handling use of this query.
    pub fn descendants(&self, v: NodeId) -> std::collections::HashSet<NodeId> {
        let mut seen = std::collections::HashSet::new();
        let mut stack = self.successors(v);
        while let Some(n) = stack.pop() {
            if seen.insert(n) {
                stack.extend(self.successors(n));
            }
        }
        seen
    }

    /// A copy of `self` with every vertex id offset by `k`. Pure: `self`
    /// is left untouched.
    pub fn shifted(&self, k: usize) -> CfgGraph {
        let mut nodes = Vec::with_capacity(k + self.nodes.len());
        nodes.extend(std::iter::repeat_with(|| None).take(k));
        nodes.extend(self.nodes.iter().cloned());
        let edges = self
            .edges
            .iter()
            .map(|(&(a, b), label)| ((a + k, b + k), label.clone()))
            .collect();
        CfgGraph {
            nodes,
            edges,
            head: NodeId(self.head.0 + k),
            last: NodeId(self.last.0 + k),
        }
    }

    /// Disjoint-set union. Errors if any id is occupied in both operands —
    /// the caller is expected to have shifted one side to a disjoint range
    /// first (see [`CfgGraph::concat`] / [`CfgGraph::merge`]).
    pub fn union(mut self, other: CfgGraph) -> Result<CfgGraph, CfgError> {
        let total = self.nodes.len().max(other.nodes.len());
        for i in 0..self.nodes.len().min(other.nodes.len()) {
            if self.nodes[i].is_some() && other.nodes[i].is_some() {
                return Err(CfgError::OverlappingUnion);
            }
        }
        self.nodes.resize(total, None);
        for (i, slot) in other.nodes.into_iter().enumerate() {
            if let Some(v) = slot {
                self.nodes[i] = Some(v);
            }
        }
        for (k, v) in other.edges {
            self.edges.entry(k).or_insert(v);
        }
        self.last = NodeId(self.last.0.max(other.last.0));
        Ok(self)
    }

    /// Like [`CfgGraph::union`], but a single overlapping vertex is allowed
    /// at `fuse_at`: its two value lists are concatenated instead of
    /// raising `OverlappingUnion`. Used only by [`CfgGraph::merge`].
    fn union_fused(mut self, other: CfgGraph, fuse_at: usize) -> CfgGraph {
        let total = self.nodes.len().max(other.nodes.len());
        self.nodes.resize(total, None);
        for (i, slot) in other.nodes.into_iter().enumerate() {
            let Some(other_values) = slot else { continue };
            match (i == fuse_at, self.nodes[i].take()) {
                (true, Some(mut own_values)) => {
                    own_values.extend(other_values);
                    self.nodes[i] = Some(own_values);
                }
                (_, existing) => {
                    self.nodes[i] = existing.or(Some(other_values));
                }
            }
        }
        for (k, v) in other.edges {
            self.edges.entry(k).or_insert(v);
        }
        self.last = NodeId(self.last.0.max(other.last.0));
        self
    }

    /// `L -> R`: shifts `R` by `|L|`, unions, and wires an unlabeled edge
    /// `L.last -> R.head`. Result has `head = L.head`, `last = shifted
    /// R.last`.
    pub fn concat(left: CfgGraph, right: CfgGraph) -> Result<CfgGraph, CfgError> {
        let left_head = left.head;
        let left_last = left.last;
        let shifted_right = right.shifted(left.len());
        let right_head = shifted_right.head;
        let right_last = shifted_right.last;
        let mut g = left.union(shifted_right)?;
        g.add_edge(left_last, right_head, None)?;
        g.head = left_head;
        g.last = right_last;
        Ok(g)
    }

    /// Glues a block head onto a trailer that must share its entry: `R` (if
    /// present) is shifted so `R.head` fuses with `L.last`, and the two
    /// vertices' value lists are concatenated at that shared vertex
    /// (spec.md §9 Open Question: the source doesn't say what happens to
    /// the overlapping node's data; this crate keeps both).
    pub fn merge(left: CfgGraph, right: Option<CfgGraph>) -> CfgGraph {
        match right {
            None => left,
            Some(right) => {
                let fuse_at = left.last.0;
                let k = left.len() - 1;
                let left_head = left.head;
                let shifted_right = right.shifted(k);
                let new_last = NodeId(left.last.0.max(shifted_right.last.0));
                let mut g = left.union_fused(shifted_right, fuse_at);
                g.head = left_head;
                g.last = new_last;
                g
            }
        }
    }

    /// Compacts vertex ids to `0..|V|-1` in ascending order of the current
    /// id, preserving insertion order among the survivors, and relabels
    /// every incident edge. Returns the old-id -> new-id mapping so
    /// out-of-band exit-node lists can be relabeled the same way
    /// ([`CfgGraph::reset_list_order`]).
    pub fn reset_node_order(&mut self) -> HashMap<usize, usize> {
        let mut mapping = HashMap::new();
        let mut new_nodes = Vec::with_capacity(self.nodes.len());
        for (old_id, slot) in self.nodes.drain(..).enumerate() {
            if let Some(values) = slot {
                mapping.insert(old_id, new_nodes.len());
                new_nodes.push(Some(values));
            }
        }
        let new_edges = self
            .edges
            .drain()
            .filter_map(|((a, b), label)| {
                let (Some(&na), Some(&nb)) = (mapping.get(&a), mapping.get(&b)) else {
                    return None;
                };
                Some(((na, nb), label))
            })
            .collect();
        self.nodes = new_nodes;
        self.edges = new_edges;
        self.head = NodeId(0);
        self.last = NodeId(self.nodes.len().saturating_sub(1));
        mapping
    }

    /// Relabels an externally held exit-node list with the mapping most
    /// recently returned by [`CfgGraph::reset_node_order`].
    pub fn reset_list_order(
        exit_nodes: Vec<ExitNode>,
        mapping: &HashMap<usize, usize>,
    ) -> Vec<ExitNode> {
        exit_nodes
            .into_iter()
            .filter_map(|e| {
                mapping.get(&e.node.0).map(|&new_id| ExitNode {
                    node: NodeId(new_id),
                    ..e
                })
            })
            .collect()
    }

    /// Checks the invariants spec.md §3 requires of every public
    /// operation's result: dense numbering, and `head`/`last` at the
    /// extremes. Embedders call this before returning.
    pub fn check_invariants(&self) -> Result<(), CfgError> {
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| if slot.is_none() { Some(NodeId(i)) } else { None })
            .collect();
        if !ids.is_empty() {
            return Err(CfgError::NonDense(ids));
        }
        if self.nodes.is_empty() {
            return Ok(());
        }
        let expected_last = NodeId(self.nodes.len() - 1);
        if self.head != NodeId(0) || self.last != expected_last {
            cfg_warn!(
                "head/last mismatch: head={:?} last={:?} expected_last={:?}",
                self.head,
                self.last,
                expected_last
            );
            return Err(CfgError::HeadLastMismatch {
                head: self.head,
                last: self.last,
                node_count: self.nodes.len(),
            });
        }
        Ok(())
    }
}

impl Default for CfgGraph {
    fn default() -> Self {
        Self::new()
    }
}
