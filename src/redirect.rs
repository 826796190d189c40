//! Jump redirectors (spec.md §4.4): post-embedding passes that rewrite
//! edges out of vertices holding `break`/`continue`/`return`/`throw`
//! fragments to implement their control-flow semantics.

use crate::ctx::{Ctx, FragmentKind};
use crate::graph::{CfgGraph, EdgeLabel, ExitNode, NodeId};
use crate::macros::cfg_trace;

/// A catch sub-graph paired with the clause it matches against.
pub type CatchCandidate = (CfgGraph, crate::ctx::CatchClause);

/// The single transformation every named redirector specializes: scan
/// every `(vertex, ctx)` pair whose `ctx.kind` matches `predicate`, strip
/// every outgoing edge the vertex has, and either rewire it to `target` or
/// (when `target` is absent) record it as an exit node. The edge removal
/// runs before the `target` branch either way, so a matched vertex with
/// successors never keeps a stale edge past this pass — a `return` nested
/// inside a branch can't fall through into whatever used to follow it.
///
/// Never removes a node, only truncates value lists and rewires edges —
/// so the `reset_node_order` spec.md calls for at the end of this pass is
/// a no-op renumbering here, and exit-node ids stay valid without needing
/// the mapping it would otherwise return.
pub fn direct_nodes_to(
    graph: &CfgGraph,
    target: Option<NodeId>,
    predicate: impl Fn(&Ctx) -> bool,
) -> (CfgGraph, Vec<ExitNode>) {
    let mut h = graph.clone();
    let mut exit_nodes = Vec::new();

    for (label, data) in graph.node_items() {
        for (idx, ctx) in data.iter().enumerate() {
            if !predicate(ctx) {
                continue;
            }
            let has_successors = !graph.successors(label).is_empty();
            if has_successors {
                for s in graph.successors(label) {
                    h.remove_edge(label, s);
                }
                match target {
                    Some(t) => {
                        h.add_edge(label, t, None)
                            .expect("label and target are existing vertices");
                        h.set_node_value(label, data[..idx].to_vec());
                        cfg_trace!("redirected {:?} -> {:?}, eliding jump", label, t);
                    }
                    None => {
                        exit_nodes.push(ExitNode {
                            node: label,
                            values: data.clone(),
                            label: None,
                        });
                        h.set_node_value(label, data[..=idx].to_vec());
                    }
                }
            } else if target.is_none() {
                exit_nodes.push(ExitNode {
                    node: label,
                    values: data.clone(),
                    label: None,
                });
                h.set_node_value(label, data[..=idx].to_vec());
            }
            // has_successors == false && target.is_some(): the existing
            // fall-off-the-end path already leads to the intended join.
            // Nothing to do.
        }
    }

    h.reset_node_order();
    (h, exit_nodes)
}

pub fn split_on_break(graph: &CfgGraph, join: NodeId) -> CfgGraph {
    direct_nodes_to(graph, Some(join), |c| c.kind == FragmentKind::Break).0
}

pub fn split_on_continue(graph: &CfgGraph, target: NodeId) -> CfgGraph {
    direct_nodes_to(graph, Some(target), |c| c.kind == FragmentKind::Continue).0
}

pub fn split_on_return(graph: &CfgGraph) -> (CfgGraph, Vec<ExitNode>) {
    direct_nodes_to(graph, None, |c| c.kind == FragmentKind::Return)
}

/// Special-cased redirector: a `throw` terminates its straight-line block
/// and everything downstream, and either routes to a matching catch, a
/// synthetic uncaught-exception vertex, or bubbles unmatched catches up as
/// "free catches" for the caller to attach later.
///
/// Preserves the source's over-collection: a catch that doesn't match the
/// current throw is recorded as free even if a *later* throw in the same
/// graph would have matched it, and the same catch can be recorded as free
/// once per throw that doesn't match it (spec.md §9 Open Question — kept
/// intentionally, not fixed).
pub fn split_on_throw(
    graph: CfgGraph,
    catches: Vec<CatchCandidate>,
) -> (CfgGraph, Vec<CatchCandidate>) {
    let original = graph.clone();
    let mut h = graph;
    let mut free_catches = Vec::new();
    let mut throw_seen = false;

    for (label, data) in original.node_items() {
        let Some((idx, thrown_ctx)) = data
            .iter()
            .enumerate()
            .find(|(_, c)| c.kind == FragmentKind::Throw)
        else {
            continue;
        };
        throw_seen = true;
        let thrown_type = thrown_ctx
            .thrown_type()
            .expect("THROW fragments always carry a thrown type")
            .to_string();

        h.remove_nodes_from(original.descendants(label));

        let mut catch_matched = false;
        if !catches.is_empty() {
            for (catch_graph, clause) in &catches {
                if clause.caught_type == thrown_type {
                    let shifted = catch_graph.shifted(h.len());
                    let catch_head = shifted.head;
                    h = h.union(shifted).expect("catch graph occupies fresh ids");
                    h.add_edge(label, catch_head, Some(EdgeLabel::text(clause.clause_text.clone())))
                        .expect("label and catch head exist");
                    catch_matched = true;
                    cfg_trace!("matched throw {} at {:?} to {:?}", thrown_type, label, clause.caught_type);
                } else {
                    free_catches.push((catch_graph.clone(), clause.clone()));
                }
            }
            if !catch_matched {
                let uncaught = h.add_node(vec![]);
                h.add_edge(label, uncaught, Some(EdgeLabel::text(thrown_type.clone())))
                    .expect("label and uncaught vertex exist");
            }
        } else {
            let uncaught = h.add_node(vec![]);
            h.add_edge(label, uncaught, Some(EdgeLabel::text(thrown_type.clone())))
                .expect("label and uncaught vertex exist");
        }

        h.set_node_value(label, data[..=idx].to_vec());
    }

    if !throw_seen && !catches.is_empty() {
        free_catches.extend(catches);
    }

    h.reset_node_order();
    (h, free_catches)
}
