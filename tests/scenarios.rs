//! End-to-end scenarios driving the public embedder/redirector/resolver
//! surface the way a parse-tree visitor would: build leaves, embed
//! structures bottom-up, and close off with the null-node resolver.

use cfg_assembler::embedders::{
    embed_in_for, embed_in_function, embed_in_if, embed_in_switch_case, embed_in_try_catch,
    embed_in_while,
};
use cfg_assembler::redirect::split_on_throw;
use cfg_assembler::resolve::resolve_null_node;
use cfg_assembler::{CaseLabel, CatchClause, CfgGraph, Ctx, EdgeLabel, FragmentKind, NodeId};

fn leaf(kind: FragmentKind) -> Ctx {
    Ctx::new(1, (0, 0), kind)
}

fn leaf_graph(kind: FragmentKind) -> CfgGraph {
    let mut g = CfgGraph::new();
    g.add_node(vec![leaf(kind)]);
    g
}

/// S1 — a function whose whole body is `return;`.
#[test]
fn s1_empty_body_is_a_single_return_exit() {
    let (g, exits) = embed_in_function(Some(leaf_graph(FragmentKind::Return)), vec![]);
    g.check_invariants().unwrap();
    assert_eq!(g.len(), 1);
    assert!(g.successors(g.head()).is_empty());
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].node, NodeId(0));
    assert_eq!(exits[0].label, None);
}

/// `if (x) return; z;`: a `return` nested inside a branch must lose its
/// edge to the enclosing join, or `resolve_null_node` would reconnect it
/// straight through to `z` once the join collapses — the bug this guards
/// against left the return vertex with a dangling edge downstream code
/// could fall into.
#[test]
fn return_nested_in_if_has_no_successors_and_cannot_reach_what_follows() {
    let if_graph = embed_in_if(leaf(FragmentKind::Other), leaf_graph(FragmentKind::Return)).unwrap();
    let sequenced = CfgGraph::concat(if_graph, leaf_graph(FragmentKind::Other)).unwrap();

    let (g, exits) = embed_in_function(Some(sequenced), vec![]);
    g.check_invariants().unwrap();
    assert_eq!(exits.len(), 1);

    let return_node = exits[0].node;
    assert!(g.successors(return_node).is_empty());
    assert!(g.descendants(return_node).is_empty());
}

/// S2 — `if (x) y; z;`: the if's null join collapses into `z` once the
/// statement following it is concatenated on and the result resolved.
#[test]
fn s2_simple_if_joins_through_the_following_statement() {
    let if_graph = embed_in_if(leaf(FragmentKind::Other), leaf_graph(FragmentKind::Other)).unwrap();
    let sequenced = CfgGraph::concat(if_graph, leaf_graph(FragmentKind::Other)).unwrap();
    let (g, exits) = resolve_null_node(&sequenced, vec![], vec![]);
    g.check_invariants().unwrap();
    assert!(exits.is_empty());

    assert_eq!(g.len(), 3);
    assert_eq!(g.successors(NodeId(0)).len(), 2); // x: true -> y, false -> z
    assert_eq!(g.successors(NodeId(1)), vec![NodeId(2)]); // y -> z
    assert_eq!(g.edge_label(NodeId(0), NodeId(1)), Some(EdgeLabel::True));
    assert_eq!(g.edge_label(NodeId(0), NodeId(2)), Some(EdgeLabel::False));
    assert_eq!(g.edge_label(NodeId(1), NodeId(2)), None);
}

/// S3 — `while(c) { if(d) break; e; }`: a `break` inside a nested `if`
/// redirects straight to the loop's join, not to the inner if's own join.
/// Checked on the loop embedder's direct output — null-node resolution is
/// a separate pass a driving visitor runs once the whole body is in place,
/// not after every nested construct.
#[test]
fn s3_while_with_break_redirects_past_the_inner_if() {
    let inner_if = embed_in_if(leaf(FragmentKind::Other), leaf_graph(FragmentKind::Break)).unwrap();
    let body = CfgGraph::concat(inner_if, leaf_graph(FragmentKind::Other)).unwrap();

    let g = embed_in_while(leaf(FragmentKind::Other), body).unwrap();
    g.check_invariants().unwrap();

    // head(0) -> cond(1); body_head d sits right after cond once shifted.
    let cond = NodeId(1);
    let d = NodeId(2);
    assert_eq!(g.successors(NodeId(0)), vec![cond]);
    let loop_exit = g
        .successors(cond)
        .into_iter()
        .find(|&t| g.edge_label(cond, t) == Some(EdgeLabel::False))
        .unwrap();
    // d's true branch leads to the break statement, whose own successor
    // (after redirection) lands on the same vertex the loop condition's
    // false branch does: both leave the loop the same way.
    let break_node = g
        .successors(d)
        .into_iter()
        .find(|&t| g.edge_label(d, t) == Some(EdgeLabel::True))
        .unwrap();
    assert_eq!(g.successors(break_node), vec![loop_exit]);
}

/// S4 — `try { throw new IOException(); } catch(IOException e) { handle; }`.
#[test]
fn s4_try_catch_match_attaches_directly_no_uncaught_vertex() {
    let mut try_body = CfgGraph::new();
    let throw = try_body.add_node(vec![Ctx::new_throw(1, (0, 0), "IOException")]);
    let catch_body = leaf_graph(FragmentKind::Other);
    let clause = CatchClause::new("IOException", "catch(IOException e)");

    let (g, free) = embed_in_try_catch(try_body, vec![(catch_body, clause)]);
    g.check_invariants().unwrap();
    assert!(free.is_empty());
    assert_eq!(g.len(), 2);
    assert_eq!(g.successors(throw), vec![NodeId(1)]);
    assert_eq!(
        g.edge_label(throw, NodeId(1)),
        Some(EdgeLabel::text("catch(IOException e)"))
    );
}

/// S5 — same, but `catch(SQLException e)`: the mismatch surfaces a
/// synthetic uncaught vertex and bubbles the catch as free, which then
/// attaches once the enclosing function is closed off.
#[test]
fn s5_try_catch_mismatch_frees_the_catch_and_exits_uncaught() {
    let mut try_body = CfgGraph::new();
    try_body.add_node(vec![Ctx::new_throw(1, (0, 0), "IOException")]);
    let catch_body = leaf_graph(FragmentKind::Other);
    let clause = CatchClause::new("SQLException", "catch(SQLException e)");

    let (g, free) = split_on_throw(try_body, vec![(catch_body, clause.clone())]);
    g.check_invariants().unwrap();
    assert_eq!(free.len(), 1);
    assert_eq!(free[0].1, clause);
    assert_eq!(g.len(), 2);
    assert_eq!(
        g.edge_label(NodeId(0), NodeId(1)),
        Some(EdgeLabel::text("IOException"))
    );

    let (g, exits) = resolve_null_node(&g, free, vec![]);
    g.check_invariants().unwrap();
    assert_eq!(exits.len(), 1);
    assert_eq!(exits[0].node, NodeId(0));
    assert_eq!(exits[0].label, Some(EdgeLabel::text("IOException")));
    // the free SQLException catch was unioned in even though nothing
    // throws into it here — it's orphaned, reachable from nowhere.
    assert_eq!(g.len(), 2);
}

/// S6 — `switch(s){ case 1: a; case 2: b; break; case 3: c; }`.
#[test]
fn s6_switch_fall_through_and_break() {
    let mut body_a = CfgGraph::new();
    body_a.add_node(vec![leaf(FragmentKind::Other)]);
    let mut body_b = CfgGraph::new();
    body_b.add_node(vec![leaf(FragmentKind::Other)]);
    body_b.add_node(vec![leaf(FragmentKind::Break)]);
    body_b.add_edge(NodeId(0), NodeId(1), None).unwrap();
    let mut body_c = CfgGraph::new();
    body_c.add_node(vec![leaf(FragmentKind::Other)]);

    let g = embed_in_switch_case(
        Some(leaf(FragmentKind::Other)),
        vec![
            (vec![CaseLabel::new("1")], body_a),
            (vec![CaseLabel::new("2")], body_b),
            (vec![CaseLabel::new("3")], body_c),
        ],
    )
    .unwrap();
    g.check_invariants().unwrap();

    let head = g.head();
    assert_eq!(g.successors(head).len(), 3);

    // case 1's body falls through into case 2's body.
    let a = g
        .successors(head)
        .into_iter()
        .find(|&t| g.edge_label(head, t) == Some(EdgeLabel::text("1")))
        .unwrap();
    let b_head = g
        .successors(head)
        .into_iter()
        .find(|&t| g.edge_label(head, t) == Some(EdgeLabel::text("2")))
        .unwrap();
    assert_eq!(g.successors(a), vec![b_head]);

    // case 2's break lands on the switch's join, not on case 3.
    let join = g.last();
    let c = g
        .successors(head)
        .into_iter()
        .find(|&t| g.edge_label(head, t) == Some(EdgeLabel::text("3")))
        .unwrap();
    assert_eq!(g.successors(c), vec![join]);
}

/// Quantified invariant (dense numbering, single entry, full reachability)
/// checked across every embedder's direct output, not just the collapsed
/// scenarios above.
#[test]
fn every_embedder_output_is_dense_and_fully_reachable_from_head() {
    let graphs: Vec<CfgGraph> = vec![
        embed_in_if(leaf(FragmentKind::Other), leaf_graph(FragmentKind::Other)).unwrap(),
        embed_in_while(leaf(FragmentKind::Other), leaf_graph(FragmentKind::Other)).unwrap(),
        embed_in_for(
            Some(leaf(FragmentKind::Other)),
            Some(leaf(FragmentKind::Other)),
            Some(leaf(FragmentKind::Other)),
            leaf_graph(FragmentKind::Other),
        )
        .unwrap(),
    ];
    for g in graphs {
        g.check_invariants().unwrap();
        let reachable = g.descendants(g.head());
        assert_eq!(reachable.len(), g.len() - 1);
    }
}
