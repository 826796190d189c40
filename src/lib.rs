//! Compositional assembler for intraprocedural control-flow graphs.
//!
//! A parse-tree visitor drives this crate bottom-up: build a [`CfgGraph`]
//! leaf per statement, combine leaves with [`CfgGraph::concat`] along a
//! straight-line run, and call one of the `embed_in_*` functions whenever
//! the visitor descends into a structured construct (`if`, `while`, `try`,
//! ...). [`embedders::embed_in_function`] closes off the whole thing,
//! redirecting `return`s to exit nodes and collapsing the null nodes the
//! other passes leave behind.
//!
//! Nothing here parses source text or walks a concrete parse tree — a
//! caller's own visitor supplies the leaf [`Ctx`] values (optionally via
//! [`ctx::ParseQuery`] to pull the few string attributes thrown/caught type
//! matching needs) and owns the order in which it calls these functions.

mod ctx;
mod error;
mod graph;
mod macros;

pub mod embedders;
pub mod redirect;
pub mod resolve;

pub use ctx::{CaseLabel, CatchClause, Ctx, FragmentKind, ParseQuery};
pub use error::CfgError;
pub use graph::{CfgGraph, EdgeLabel, ExitNode, NodeId};
pub use redirect::CatchCandidate;
