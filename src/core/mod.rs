// src/core/mod.rs
mod engine;
mod parser;
mod report;
mod source;

// Call graph discovery engine
mod call_graph;

// Java analyzer strategies
mod languages;

#[cfg(test)]
pub(crate) mod test_support;

pub use parser::{
    annotation_simple_name, erase_type_arguments, line_of, simple_type_name, FieldAssignment,
    Invocation, ParsedConstructor, ParsedField, ParsedMethod, ParsedType, ParsedUnit, Parameter,
    Receiver, TypeKind,
};
pub use languages::{create_analyzer, Analyzer, StructuralAnalyzer};
pub use source::{FsSourceLocator, SourceFile, SourceLocator};
pub use report::ReportRenderer;

pub use call_graph::{
    CallGraph, CallGraphBuilder, CallNode, Edge, EdgeKind, MethodKey, NodeStatus,
    SkippedBranch, TerminalReason,
};

// Export the main engine
pub use engine::Engine;
