//! The null-node resolver (spec.md §4.5): the pass that collapses every
//! empty-value-list vertex an embedder left behind, reconnecting its
//! predecessors directly to its successors and preserving edge labels, or
//! promoting the predecessor to exit status when the null node has no
//! successors of its own.

use crate::graph::{CfgGraph, ExitNode, NodeId};

/// A catch sub-graph unioned in after `resolve_null_node`'s main pass,
/// independently cleaned of its own null nodes by `resolve_catch_null_nodes`.
pub type CatchCandidate = (CfgGraph, crate::ctx::CatchClause);

/// Collapses every null node in `graph`, then unions and cleans each of
/// `catches` in turn. Reads predecessor/successor/edge-label state off the
/// working copy as it mutates (so later null nodes in the same pass see
/// earlier ones' rewiring), matching the source this is grounded on — not a
/// snapshot-before-mutate pass like [`crate::redirect::split_on_throw`].
pub fn resolve_null_node(
    graph: &CfgGraph,
    catches: Vec<CatchCandidate>,
    last_nodes: Vec<ExitNode>,
) -> (CfgGraph, Vec<ExitNode>) {
    let mut h = graph.clone();
    let mut new_last_nodes = last_nodes;

    let null_nodes: Vec<NodeId> = graph
        .node_items()
        .filter(|(_, values)| values.is_empty())
        .map(|(id, _)| id)
        .collect();

    for node in null_nodes {
        let preds = h.predecessors(node);
        let succs = h.successors(node);

        if !succs.is_empty() {
            for pred in &preds {
                let label = h.edge_label(*pred, node);
                for s in &succs {
                    h.add_edge(*pred, *s, label.clone())
                        .expect("pred and successor are existing vertices");
                }
                h.remove_edge(*pred, node);
            }
        } else {
            for pred in &preds {
                let label = h.edge_label(*pred, node);
                let values = h.node_value(*pred).cloned().unwrap_or_default();
                new_last_nodes.push(ExitNode {
                    node: *pred,
                    values,
                    label,
                });
                h.remove_edge(*pred, node);
            }
        }

        h.remove_node(node);
    }

    let mapping = h.reset_node_order();
    new_last_nodes = CfgGraph::reset_list_order(new_last_nodes, &mapping);

    for (catch_graph, _clause) in catches {
        let shifted = catch_graph.shifted(h.len());
        h = h.union(shifted).expect("catch graph occupies fresh ids");
        h = resolve_catch_null_nodes(&h);
    }

    (h, new_last_nodes)
}

/// Cleans null nodes introduced inside an already-attached catch sub-graph.
/// Structurally the same collapse as [`resolve_null_node`]'s main pass, but
/// reads predecessor/successor/edge state off the original snapshot (the
/// sub-graph is freshly unioned and never touched by an earlier iteration of
/// this same loop).
pub fn resolve_catch_null_nodes(graph: &CfgGraph) -> CfgGraph {
    let mut h = graph.clone();

    let null_nodes: Vec<NodeId> = graph
        .node_items()
        .filter(|(_, values)| values.is_empty())
        .map(|(id, _)| id)
        .collect();

    for node in null_nodes {
        let succs = graph.successors(node);
        for pred in graph.predecessors(node) {
            let label = graph.edge_label(pred, node);
            if !succs.is_empty() {
                for &s in &succs {
                    h.add_edge(pred, s, label.clone())
                        .expect("pred and successor are existing vertices");
                }
                h.remove_edge(pred, node);
                for &s in &succs {
                    h.remove_edge(node, s);
                }
            } else {
                h.remove_edge(pred, node);
            }
        }
        h.remove_node(node);
    }

    h.reset_node_order();
    h
}
