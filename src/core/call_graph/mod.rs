// src/core/call_graph/mod.rs
//! Call-flow discovery for Java sources
//!
//! Starting from one method, the builder resolves field types, extracts call
//! sites, decides interface dispatch and recurses depth-first until every
//! reachable method has been visited once.

mod builder;
mod call_graph;
mod call_site_extractor;
pub(crate) mod consts;
mod dispatch;
mod field_collector;
mod type_resolver;

pub use builder::CallGraphBuilder;
pub use call_graph::{
    CallGraph, CallNode, Edge, EdgeKind, MethodKey, NodeStatus, SkippedBranch, TerminalReason,
};
