//! Structural failure modes for the CFG assembler.
//!
//! Every failure here is a programmer bug, not a runtime condition a caller
//! is expected to recover from (spec: there is no user-visible I/O in the
//! core). Callers still get a typed `Result` rather than a panic so the
//! driving visitor can attach its own context (current function name, parse
//! position) before propagating.

use crate::graph::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum CfgError {
    #[error("vertex ids {0:?} are not dense after reset_node_order")]
    NonDense(Vec<NodeId>),

    #[error("add_edge referenced unknown vertex {0:?}")]
    MissingEndpoint(NodeId),

    #[error("union of two graphs with overlapping vertex ranges")]
    OverlappingUnion,

    #[error("head/last mismatch: head={head:?} last={last:?} node_count={node_count}")]
    HeadLastMismatch {
        head: NodeId,
        last: NodeId,
        node_count: usize,
    },

    #[error("malformed parse-tree input: {0}")]
    MalformedInput(String),
}
