//! Structural embedders (spec.md §4.3): the public surface a parse-tree
//! visitor drives bottom-up, one call per structured construct, each
//! producing a single-entry CFG fragment wired around the constituent
//! sub-graphs a visitor already built for the construct's children.

use crate::ctx::{CaseLabel, CatchClause, Ctx};
use crate::error::CfgError;
use crate::graph::{CfgGraph, EdgeLabel, ExitNode, NodeId};
use crate::macros::cfg_warn;
use crate::redirect::{split_on_break, split_on_continue, split_on_return, split_on_throw, CatchCandidate};
use crate::resolve::resolve_null_node;

pub fn embed_in_if(condition: Ctx, then_part: CfgGraph) -> Result<CfgGraph, CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(vec![condition]);
    let then_part = then_part.shifted(g.len());
    let then_head = then_part.head();
    let then_last = then_part.last();
    let mut g = g.union(then_part)?;
    let last = g.add_node(vec![]);
    g.add_edge(head, last, Some(EdgeLabel::False))?;
    g.add_edge(head, then_head, Some(EdgeLabel::True))?;
    g.add_edge(then_last, last, None)?;
    Ok(g)
}

pub fn embed_in_if_else(
    condition: Ctx,
    then_part: CfgGraph,
    else_part: CfgGraph,
) -> Result<CfgGraph, CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(vec![condition]);
    let then_part = then_part.shifted(g.len());
    let then_head = then_part.head();
    let then_last = then_part.last();
    let else_part = else_part.shifted(g.len() + then_part.len());
    let else_head = else_part.head();
    let else_last = else_part.last();
    let mut g = g.union(then_part)?.union(else_part)?;
    let last = g.add_node(vec![]);
    g.add_edge(head, else_head, Some(EdgeLabel::False))?;
    g.add_edge(head, then_head, Some(EdgeLabel::True))?;
    g.add_edge(then_last, last, None)?;
    g.add_edge(else_last, last, None)?;
    Ok(g)
}

/// `groups` is a `(case labels, body)` pair per switch arm, laid out in
/// source order. An arm with no `break` falls through into the *next* arm
/// (real `switch` semantics) rather than joining directly — only the final
/// arm's tail reaches the switch's join vertex. `break` anywhere redirects
/// there instead, via the trailing [`split_on_break`].
///
/// A group sharing one body across several labels (`case 1: case 2: ...`)
/// still gets exactly one edge into that body, carrying only the first
/// label's text — the graph has no slot for a second edge on the same
/// `(head, body_head)` pair.
pub fn embed_in_switch_case(
    switcher: Option<Ctx>,
    groups: Vec<(Vec<CaseLabel>, CfgGraph)>,
) -> Result<CfgGraph, CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(switcher.into_iter().collect());

    let mut start = g.len();
    let mut arms: Vec<(Vec<CaseLabel>, NodeId, NodeId)> = Vec::with_capacity(groups.len());
    for (labels, body) in groups {
        let body = body.shifted(start);
        let body_head = body.head();
        let body_last = body.last();
        start = body.len();
        g = g.union(body)?;
        arms.push((labels, body_head, body_last));
    }

    let last = g.add_node(vec![]);
    for (i, (labels, body_head, body_last)) in arms.iter().enumerate() {
        // one edge per ordered pair (this crate's graph has no multi-edges):
        // a fall-through run of labels only gets its first label's text.
        let text = labels[0].text.clone();
        g.add_edge(head, *body_head, Some(EdgeLabel::text(text)))?;
        let fall_through_to = arms.get(i + 1).map(|(_, h, _)| *h).unwrap_or(last);
        g.add_edge(*body_last, fall_through_to, None)?;
    }

    Ok(split_on_break(&g, last))
}

pub fn embed_in_while(condition: Ctx, body: CfgGraph) -> Result<CfgGraph, CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(vec![]);
    let cond = g.add_node(vec![condition]);
    let body = body.shifted(g.len());
    let body_head = body.head();
    let body_last = body.last();
    let mut g = g.union(body)?;
    let last = g.add_node(vec![]);
    g.add_edge(head, cond, None)?;
    g.add_edge(cond, body_head, Some(EdgeLabel::True))?;
    g.add_edge(cond, last, Some(EdgeLabel::False))?;
    g.add_edge(body_last, cond, None)?;
    let g = split_on_continue(&g, cond);
    Ok(split_on_break(&g, last))
}

pub fn embed_in_do_while(condition: Ctx, body: CfgGraph) -> Result<CfgGraph, CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(vec![]);
    let body = body.shifted(g.len());
    let body_head = body.head();
    let body_last = body.last();
    let mut g = g.union(body)?;
    let cond = g.add_node(vec![condition]);
    let last = g.add_node(vec![]);
    g.add_edge(head, body_head, None)?;
    g.add_edge(body_last, cond, None)?;
    g.add_edge(cond, body_head, Some(EdgeLabel::True))?;
    g.add_edge(cond, last, Some(EdgeLabel::False))?;
    let g = split_on_continue(&g, cond);
    Ok(split_on_break(&g, last))
}

fn embed_in_conditional_for(
    condition: Ctx,
    initializer: Option<Ctx>,
    successor: Option<Ctx>,
    body: CfgGraph,
) -> Result<(CfgGraph, NodeId), CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(initializer.into_iter().collect());
    let cond = g.add_node(vec![condition]);
    let body = body.shifted(g.len());
    let body_head = body.head();
    let body_last = body.last();
    let mut g = g.union(body)?;
    let succ = g.add_node(successor.into_iter().collect());
    let last = g.add_node(vec![]);
    g.add_edge(head, cond, None)?;
    g.add_edge(cond, body_head, Some(EdgeLabel::True))?;
    g.add_edge(cond, last, Some(EdgeLabel::False))?;
    g.add_edge(body_last, succ, None)?;
    g.add_edge(succ, cond, None)?;
    let g = split_on_continue(&g, succ);
    Ok((g, last))
}

fn embed_in_unconditional_for(
    initializer: Option<Ctx>,
    successor: Option<Ctx>,
    body: CfgGraph,
) -> Result<(CfgGraph, NodeId), CfgError> {
    let mut g = CfgGraph::new();
    let head = g.add_node(initializer.into_iter().collect());
    let body = body.shifted(g.len());
    let body_head = body.head();
    let body_last = body.last();
    let mut g = g.union(body)?;
    let succ = g.add_node(successor.into_iter().collect());
    let last = g.add_node(vec![]);
    g.add_edge(head, body_head, None)?;
    g.add_edge(body_last, succ, None)?;
    g.add_edge(succ, body_head, None)?;
    let g = split_on_continue(&g, succ);
    Ok((g, last))
}

/// `condition.is_none()` is the infinite-loop `for (;;)` shape: the
/// successor feeds straight back into the body instead of through a
/// condition vertex.
pub fn embed_in_for(
    condition: Option<Ctx>,
    initializer: Option<Ctx>,
    successor: Option<Ctx>,
    body: CfgGraph,
) -> Result<CfgGraph, CfgError> {
    let (g, last) = match condition {
        Some(c) => embed_in_conditional_for(c, initializer, successor, body)?,
        None => embed_in_unconditional_for(initializer, successor, body)?,
    };
    Ok(split_on_break(&g, last))
}

/// A try/catch embeds to nothing more than its own body with `throw`
/// redirected to whichever `catches` match — the surrounding fall-through
/// wiring is the same as any other straight-line block, so the caller just
/// `concat`s this result into its enclosing sequence. Catches that don't
/// match any throw in `try_body` come back as free catches for the caller
/// to either attach to an enclosing try or, at the function boundary, hand
/// to [`embed_in_function`].
pub fn embed_in_try_catch(
    try_body: CfgGraph,
    catches: Vec<(CfgGraph, CatchClause)>,
) -> (CfgGraph, Vec<CatchCandidate>) {
    split_on_throw(try_body, catches)
}

/// The outermost embedder: closes off a function body by resolving its
/// `return`s to exit nodes and collapsing every null node the preceding
/// passes left behind.
///
/// `catches` is accepted for symmetry with [`embed_in_try_catch`] but is
/// never actually consulted — a function body's own unmatched throws are
/// the only catches that can reach this point, since nothing encloses a
/// function. Logged rather than silently accepted so a caller that passes
/// a non-empty list notices its catches are going nowhere.
pub fn embed_in_function(
    body: Option<CfgGraph>,
    catches: Vec<CatchCandidate>,
) -> (CfgGraph, Vec<ExitNode>) {
    if !catches.is_empty() {
        cfg_warn!(
            "embed_in_function: dropping {} catch candidate(s) passed at the function boundary, \
             nothing encloses a function body to catch against",
            catches.len()
        );
    }
    let g = match body {
        Some(body) => body,
        None => {
            let mut empty = CfgGraph::new();
            empty.add_node(vec![]);
            empty
        }
    };
    let (g, free_catches) = split_on_throw(g, vec![]);
    let (g, last_nodes) = split_on_return(&g);
    resolve_null_node(&g, free_catches, last_nodes)
}
