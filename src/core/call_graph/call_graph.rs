// src/core/call_graph/call_graph.rs - Method nodes and their outgoing call edges
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Unique identifier for a method in the graph: qualified type plus method name.
/// Overloads share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodKey {
    pub type_name: String,
    pub method: String,
}

impl MethodKey {
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Type name without its package
    pub fn simple_type(&self) -> &str {
        self.type_name.rsplit('.').next().unwrap_or(&self.type_name)
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.method)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Invocation found in the caller's body
    Call,
    /// Interface method to a concrete implementor
    Dispatch,
    /// Subclass method to the superclass that declares it
    Inherited,
}

/// Resolved call from one node to a callee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Identifier the call went through (`this` for implicit receivers)
    pub receiver: String,
    pub callee_type: String,
    pub callee_method: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(receiver: &str, callee_type: &str, callee_method: &str, kind: EdgeKind) -> Self {
        Self {
            receiver: receiver.to_string(),
            callee_type: callee_type.to_string(),
            callee_method: callee_method.to_string(),
            kind,
        }
    }

    pub fn callee(&self) -> MethodKey {
        MethodKey::new(self.callee_type.clone(), self.callee_method.clone())
    }
}

/// Why a node carries no edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerminalReason {
    /// No declaration and no superclass to fall back to
    MethodNotFound,
    /// Derived-query method on a persistence repository
    DerivedQuery,
    /// Generic CRUD operation of a persistence repository
    FrameworkCrud,
    /// Repository method carrying a hand-written query
    CustomQuery,
    /// Interface method with no implementor among the files read so far
    UnresolvedDispatch,
}

impl TerminalReason {
    pub fn describe(&self) -> &'static str {
        match self {
            TerminalReason::MethodNotFound => "method not found",
            TerminalReason::DerivedQuery => "derived query",
            TerminalReason::FrameworkCrud => "framework CRUD",
            TerminalReason::CustomQuery => "custom query",
            TerminalReason::UnresolvedDispatch => "unresolved dispatch",
        }
    }

    /// Satisfied by the persistence framework rather than project code
    pub fn is_framework(&self) -> bool {
        matches!(
            self,
            TerminalReason::DerivedQuery | TerminalReason::FrameworkCrud | TerminalReason::CustomQuery
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "reason")]
pub enum NodeStatus {
    Expanded,
    Terminal(TerminalReason),
}

/// Node in the call graph representing a method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallNode {
    pub key: MethodKey,
    pub status: NodeStatus,
    /// Outgoing edges in source-appearance order
    pub edges: Vec<Edge>,
    /// File the node's type was read from
    pub source_path: Option<PathBuf>,
    pub line_range: Option<(usize, usize)>,
    /// Declaration text of the method, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl CallNode {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, NodeStatus::Terminal(_))
    }

    pub fn terminal_reason(&self) -> Option<TerminalReason> {
        match self.status {
            NodeStatus::Terminal(reason) => Some(reason),
            NodeStatus::Expanded => None,
        }
    }
}

/// A branch of the traversal given up because its source was unusable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBranch {
    pub key: MethodKey,
    pub reason: String,
}

/// Result of one traversal: nodes in discovery order, keyed by method
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraph {
    start: MethodKey,
    nodes: Vec<CallNode>,
    skipped: Vec<SkippedBranch>,
    #[serde(skip)]
    index: HashMap<MethodKey, usize>,
}

impl CallGraph {
    pub fn new(start: MethodKey) -> Self {
        Self {
            start,
            nodes: Vec::new(),
            skipped: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a node unless its key is already present; the first insertion wins
    pub(crate) fn insert(&mut self, node: CallNode) -> bool {
        if self.index.contains_key(&node.key) {
            return false;
        }
        self.index.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub(crate) fn record_skipped(&mut self, key: MethodKey, reason: impl Into<String>) {
        self.skipped.push(SkippedBranch {
            key,
            reason: reason.into(),
        });
    }

    pub fn start(&self) -> &MethodKey {
        &self.start
    }

    pub fn node(&self, key: &MethodKey) -> Option<&CallNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[CallNode] {
        &self.nodes
    }

    /// Outgoing edges of a method, empty when the method is not in the graph
    pub fn calls(&self, type_name: &str, method: &str) -> &[Edge] {
        self.node(&MethodKey::new(type_name, method))
            .map(|n| n.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Every edge with its caller, in node order
    pub fn all_edges(&self) -> Vec<(&MethodKey, &Edge)> {
        self.nodes
            .iter()
            .flat_map(|n| n.edges.iter().map(move |e| (&n.key, e)))
            .collect()
    }

    /// Distinct types of all nodes and edge targets, sorted
    pub fn types(&self) -> Vec<String> {
        let mut types = BTreeSet::new();
        for node in &self.nodes {
            types.insert(node.key.type_name.clone());
            for edge in &node.edges {
                types.insert(edge.callee_type.clone());
            }
        }
        types.into_iter().collect()
    }

    pub fn terminal_nodes(&self) -> Vec<&CallNode> {
        self.nodes.iter().filter(|n| n.is_terminal()).collect()
    }

    pub fn skipped(&self) -> &[SkippedBranch] {
        &self.skipped
    }

    /// Files the nodes were read from, deduplicated in discovery order
    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files: Vec<&PathBuf> = Vec::new();
        for path in self.nodes.iter().filter_map(|n| n.source_path.as_ref()) {
            if !files.contains(&path) {
                files.push(path);
            }
        }
        files
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// SHA-256 over the ordered node and edge listing
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.start.to_string().as_bytes());
        for node in &self.nodes {
            let status = match node.status {
                NodeStatus::Expanded => "expanded",
                NodeStatus::Terminal(reason) => reason.describe(),
            };
            hasher.update(format!("\n{}|{}", node.key, status).as_bytes());
            for edge in &node.edges {
                hasher.update(
                    format!(
                        "\n  {:?}|{}|{}.{}",
                        edge.kind, edge.receiver, edge.callee_type, edge.callee_method
                    )
                    .as_bytes(),
                );
            }
        }
        format!("{:x}", hasher.finalize())
    }
}
