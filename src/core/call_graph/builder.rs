// src/core/call_graph/builder.rs - Depth-first, cycle-safe call graph traversal
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::AnalysisConfig;
use crate::error::{CallflowError, Result};
use super::super::languages::Analyzer;
use super::super::source::SourceLocator;
use super::super::{ParsedMethod, ParsedType, ParsedUnit};
use super::call_graph::{CallGraph, CallNode, Edge, EdgeKind, MethodKey, NodeStatus, TerminalReason};
use super::call_site_extractor::CallSiteExtractor;
use super::consts::UNIVERSAL_ROOT;
use super::dispatch::{Dispatch, DispatchResolver};
use super::field_collector::{FieldTypeCollector, FieldTypeMap};
use super::type_resolver::{ResolutionScope, TypeResolver};

/// Traversal state of a method key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Expanding,
    Expanded,
    Terminal,
    /// Source missing, type missing or unparsable; no node was recorded
    Abandoned,
}

/// A parsed source file together with where it came from
#[derive(Debug)]
struct LoadedUnit {
    path: PathBuf,
    content: String,
    unit: ParsedUnit,
}

#[derive(Debug, Clone)]
enum Loaded {
    Ready(Rc<LoadedUnit>),
    Unusable(String),
}

/// Everything one `analyze` call owns. Nothing here outlives the call.
struct TraversalContext {
    graph: CallGraph,
    visited: HashMap<MethodKey, VisitState>,
    /// Parse results by requested type name, failures included
    units: HashMap<String, Loaded>,
    /// Successfully parsed files in the order they were read
    encountered: Vec<Rc<LoadedUnit>>,
    field_maps: HashMap<String, Rc<FieldTypeMap>>,
}

impl TraversalContext {
    fn new(start: MethodKey) -> Self {
        Self {
            graph: CallGraph::new(start),
            visited: HashMap::new(),
            units: HashMap::new(),
            encountered: Vec::new(),
            field_maps: HashMap::new(),
        }
    }
}

/// Builds call graphs from a starting method.
///
/// The builder itself is immutable and can be shared across threads; every
/// call to [`CallGraphBuilder::analyze`] gets its own visited set, parse cache
/// and graph.
pub struct CallGraphBuilder {
    analyzer: Arc<dyn Analyzer>,
    sources: Arc<dyn SourceLocator>,
    resolver: TypeResolver,
    fields: FieldTypeCollector,
    extractor: CallSiteExtractor,
    dispatch: DispatchResolver,
}

impl CallGraphBuilder {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        sources: Arc<dyn SourceLocator>,
        config: &AnalysisConfig,
    ) -> Self {
        Self {
            analyzer,
            sources,
            resolver: TypeResolver::new(config.conventions.clone()),
            fields: FieldTypeCollector::new(config.injection_annotations.clone()),
            extractor: CallSiteExtractor::new(&config.extra_ignored_methods),
            dispatch: DispatchResolver::new(),
        }
    }

    /// Discover everything reachable from `type_name.method`.
    ///
    /// Never fails: unexpected errors and panics are logged and turn into an
    /// empty graph rooted at the requested key.
    pub fn analyze(&self, type_name: &str, method: &str) -> CallGraph {
        let start = MethodKey::new(type_name, method);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<CallGraph> {
            let mut ctx = TraversalContext::new(start.clone());
            self.visit(&mut ctx, start.clone())?;
            Ok(ctx.graph)
        }));

        match outcome {
            Ok(Ok(graph)) => {
                debug!(
                    "Analyzed {}: {} nodes, {} skipped branches",
                    start,
                    graph.len(),
                    graph.skipped().len()
                );
                graph
            }
            Ok(Err(e)) => {
                error!("Analysis of {} failed: {}", start, e);
                CallGraph::new(start)
            }
            Err(_) => {
                error!("Analysis of {} panicked", start);
                CallGraph::new(start)
            }
        }
    }

    fn visit(&self, ctx: &mut TraversalContext, key: MethodKey) -> Result<()> {
        if ctx.visited.contains_key(&key) {
            return Ok(());
        }
        ctx.visited.insert(key.clone(), VisitState::Expanding);

        let loaded = match self.load(ctx, &key.type_name)? {
            Loaded::Ready(loaded) => loaded,
            Loaded::Unusable(reason) => {
                self.abandon(ctx, key, reason);
                return Ok(());
            }
        };
        let Some(ty) = loaded.unit.find_type(key.simple_type()) else {
            let reason = format!("{} is not declared in {}", key.simple_type(), loaded.path.display());
            self.abandon(ctx, key, reason);
            return Ok(());
        };

        if ty.is_interface() {
            return self.visit_interface(ctx, key, &loaded, ty);
        }

        match ty.find_method(&key.method) {
            Some(method) => self.expand(ctx, key, &loaded, ty, method),
            None => self.visit_superclass(ctx, key, &loaded, ty),
        }
    }

    /// Record an expanded node for a declared method, then follow its call sites
    fn expand(
        &self,
        ctx: &mut TraversalContext,
        key: MethodKey,
        loaded: &Rc<LoadedUnit>,
        ty: &ParsedType,
        method: &ParsedMethod,
    ) -> Result<()> {
        let fields = self.field_map(ctx, &key.type_name, loaded, ty);
        let edges = self.extractor.extract(method, &fields);
        debug!("{}: expanded with {} call sites", key, edges.len());

        self.finish(ctx, key, NodeStatus::Expanded, edges.clone(), loaded, Some(method));
        for edge in edges {
            self.visit(ctx, edge.callee())?;
        }
        Ok(())
    }

    /// Single-inheritance fallback for a method the class does not declare
    fn visit_superclass(
        &self,
        ctx: &mut TraversalContext,
        key: MethodKey,
        loaded: &Rc<LoadedUnit>,
        ty: &ParsedType,
    ) -> Result<()> {
        let superclass = ty
            .superclass
            .as_deref()
            .filter(|s| !UNIVERSAL_ROOT.contains(s))
            .and_then(|s| self.resolver.resolve(s, &ResolutionScope::from_unit(&loaded.unit)));

        let Some(superclass) = superclass else {
            debug!("{}: no declaration and no superclass", key);
            self.finish(
                ctx,
                key,
                NodeStatus::Terminal(TerminalReason::MethodNotFound),
                vec![],
                loaded,
                None,
            );
            return Ok(());
        };

        debug!("{}: falling back to superclass {}", key, superclass);
        let edge = Edge::new("super", &superclass, &key.method, EdgeKind::Inherited);
        let callee = edge.callee();
        self.finish(ctx, key, NodeStatus::Expanded, vec![edge], loaded, None);
        self.visit(ctx, callee)
    }

    fn visit_interface(
        &self,
        ctx: &mut TraversalContext,
        key: MethodKey,
        loaded: &Rc<LoadedUnit>,
        ty: &ParsedType,
    ) -> Result<()> {
        let encountered = ctx.encountered.clone();
        let decision = self
            .dispatch
            .resolve(ty, &key.method, encountered.iter().map(|l| &l.unit));

        match decision {
            Dispatch::DefaultBody(method) => {
                debug!("{}: following default body", key);
                self.expand(ctx, key, loaded, ty, method)
            }
            Dispatch::FrameworkContract(reason) => {
                debug!("{}: {}", key, reason.describe());
                let method = ty.find_method(&key.method);
                self.finish(ctx, key, NodeStatus::Terminal(reason), vec![], loaded, method);
                Ok(())
            }
            Dispatch::Implementors(implementors) => {
                debug!("{}: dispatching to {} implementors", key, implementors.len());
                let edges: Vec<Edge> = implementors
                    .iter()
                    .map(|i| Edge::new("this", i, &key.method, EdgeKind::Dispatch))
                    .collect();
                let method = ty.find_method(&key.method);
                self.finish(ctx, key, NodeStatus::Expanded, edges.clone(), loaded, method);
                for edge in edges {
                    self.visit(ctx, edge.callee())?;
                }
                Ok(())
            }
            Dispatch::Unresolved => {
                debug!("{}: no implementor among {} files read", key, encountered.len());
                let method = ty.find_method(&key.method);
                self.finish(
                    ctx,
                    key,
                    NodeStatus::Terminal(TerminalReason::UnresolvedDispatch),
                    vec![],
                    loaded,
                    method,
                );
                Ok(())
            }
        }
    }

    fn finish(
        &self,
        ctx: &mut TraversalContext,
        key: MethodKey,
        status: NodeStatus,
        edges: Vec<Edge>,
        loaded: &LoadedUnit,
        method: Option<&ParsedMethod>,
    ) {
        let state = match status {
            NodeStatus::Expanded => VisitState::Expanded,
            NodeStatus::Terminal(_) => VisitState::Terminal,
        };
        ctx.visited.insert(key.clone(), state);

        let snippet = method.and_then(|m| loaded.content.get(m.span.0..m.span.1)).map(str::to_string);
        ctx.graph.insert(CallNode {
            key,
            status,
            edges,
            source_path: Some(loaded.path.clone()),
            line_range: method.map(|m| m.line_range),
            snippet,
        });
    }

    fn abandon(&self, ctx: &mut TraversalContext, key: MethodKey, reason: String) {
        warn!("Skipping {}: {}", key, reason);
        ctx.visited.insert(key.clone(), VisitState::Abandoned);
        ctx.graph.record_skipped(key, reason);
    }

    /// Locate and parse the file declaring `type_name`, once per traversal
    fn load(&self, ctx: &mut TraversalContext, type_name: &str) -> Result<Loaded> {
        if let Some(cached) = ctx.units.get(type_name) {
            return Ok(cached.clone());
        }

        let located = match self.sources.source_for(type_name) {
            Ok(located) => located,
            Err(
                e @ (CallflowError::SourceLookup { .. }
                | CallflowError::Io(_)
                | CallflowError::FileSystem(_)),
            ) => {
                let loaded = Loaded::Unusable(e.to_string());
                ctx.units.insert(type_name.to_string(), loaded.clone());
                return Ok(loaded);
            }
            Err(e) => return Err(e),
        };

        let loaded = match located {
            None => Loaded::Unusable(format!("no source found for {}", type_name)),
            Some(file) => match self.analyzer.parse(&file.content, &file.path) {
                Ok(unit) => {
                    let loaded = Rc::new(LoadedUnit {
                        path: file.path,
                        content: file.content,
                        unit,
                    });
                    ctx.encountered.push(Rc::clone(&loaded));
                    Loaded::Ready(loaded)
                }
                Err(CallflowError::Parser(reason)) => Loaded::Unusable(reason),
                Err(e) => return Err(e),
            },
        };

        ctx.units.insert(type_name.to_string(), loaded.clone());
        Ok(loaded)
    }

    fn field_map(
        &self,
        ctx: &mut TraversalContext,
        type_name: &str,
        loaded: &LoadedUnit,
        ty: &ParsedType,
    ) -> Rc<FieldTypeMap> {
        if let Some(map) = ctx.field_maps.get(type_name) {
            return Rc::clone(map);
        }
        let scope = ResolutionScope::from_unit(&loaded.unit);
        let map = Rc::new(self.fields.collect(ty, type_name, &scope, &self.resolver));
        ctx.field_maps.insert(type_name.to_string(), Rc::clone(&map));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Strategy;
    use crate::core::test_support::{builder, crud_sources, MemorySources, STRATEGIES};

    fn key(type_name: &str, method: &str) -> MethodKey {
        MethodKey::new(type_name, method)
    }

    fn call(receiver: &str, type_name: &str, method: &str) -> Edge {
        Edge::new(receiver, type_name, method, EdgeKind::Call)
    }

    #[test]
    fn test_this_and_field_calls() {
        let sources = MemorySources::new()
            .with(
                "demo.A",
                r#"
package demo;

public class A {
    private B b;

    public void m1() {
        this.m2();
        b.m3();
    }

    void m2() {}
}
"#,
            )
            .with("demo.B", "package demo;\npublic class B { void m3() {} }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.A", "m1");

            assert_eq!(
                graph.calls("demo.A", "m1"),
                &[call("this", "demo.A", "m2"), call("b", "demo.B", "m3")],
                "{:?}",
                strategy
            );
            assert_eq!(graph.len(), 3);
            assert_eq!(graph.nodes()[0].key, key("demo.A", "m1"));
        }
    }

    #[test]
    fn test_interface_dispatches_to_encountered_implementor() {
        let sources = MemorySources::new()
            .with(
                "demo.Impl",
                r#"
package demo;

public class Impl implements IFoo {
    private IFoo next;

    public void run() {
        next.bar();
    }

    public void bar() {
        helper();
    }

    private void helper() {}
}
"#,
            )
            .with("demo.IFoo", "package demo;\npublic interface IFoo { void bar(); }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.Impl", "run");

            let dispatch = graph.node(&key("demo.IFoo", "bar")).unwrap();
            assert_eq!(dispatch.status, NodeStatus::Expanded);
            assert_eq!(
                dispatch.edges,
                vec![Edge::new("this", "demo.Impl", "bar", EdgeKind::Dispatch)]
            );
            assert_eq!(
                graph.calls("demo.Impl", "bar"),
                &[call("this", "demo.Impl", "helper")]
            );
        }
    }

    #[test]
    fn test_interface_without_encountered_implementor_is_unresolved() {
        let sources = MemorySources::new()
            .with(
                "demo.Client",
                "package demo;\npublic class Client { private IFoo foo; void go() { foo.bar(); } }\n",
            )
            .with("demo.IFoo", "package demo;\npublic interface IFoo { void bar(); }\n")
            .with("demo.Impl", "package demo;\npublic class Impl implements IFoo { public void bar() {} }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.Client", "go");
            let node = graph.node(&key("demo.IFoo", "bar")).unwrap();

            assert_eq!(node.terminal_reason(), Some(TerminalReason::UnresolvedDispatch));
            assert!(graph.node(&key("demo.Impl", "bar")).is_none());
        }
    }

    #[test]
    fn test_derived_query_is_terminal_without_search() {
        for strategy in STRATEGIES {
            let graph = builder(strategy, crud_sources())
                .analyze("com.sbtl1.mod1.rest.UserController", "getUsersByAge");

            let repo = key("com.sbtl1.mod1.dao.UserRepository", "findByAgeGreaterThan");
            let node = graph.node(&repo).unwrap();
            assert_eq!(node.terminal_reason(), Some(TerminalReason::DerivedQuery));
            assert!(node.edges.is_empty());
            assert_eq!(
                graph.calls("com.sbtl1.mod1.service.UserService", "getUsersByAge"),
                &[call("userRepository", "com.sbtl1.mod1.dao.UserRepository", "findByAgeGreaterThan")]
            );
        }
    }

    #[test]
    fn test_crud_flow_through_constructor_injection() {
        for strategy in STRATEGIES {
            let graph = builder(strategy, crud_sources())
                .analyze("com.sbtl1.mod1.rest.UserController", "createUser");

            let order: Vec<String> = graph.nodes().iter().map(|n| n.key.to_string()).collect();
            assert_eq!(
                order,
                vec![
                    "com.sbtl1.mod1.rest.UserController.createUser",
                    "com.sbtl1.mod1.service.UserService.saveUser",
                    "com.sbtl1.mod1.service.UserService.validate",
                    "com.sbtl1.mod1.dao.UserRepository.save",
                ]
            );
            let save = graph.node(&key("com.sbtl1.mod1.dao.UserRepository", "save")).unwrap();
            assert_eq!(save.terminal_reason(), Some(TerminalReason::FrameworkCrud));
            assert!(graph.skipped().is_empty());
        }
    }

    #[test]
    fn test_custom_query_is_terminal() {
        for strategy in STRATEGIES {
            let graph = builder(strategy, crud_sources())
                .analyze("com.sbtl1.mod1.service.UserService", "findByNickname");

            let node = graph
                .node(&key("com.sbtl1.mod1.dao.UserRepository", "lookupByNickname"))
                .unwrap();
            assert_eq!(node.terminal_reason(), Some(TerminalReason::CustomQuery));
            assert!(node.snippet.as_deref().unwrap_or("").contains("@Query"));
        }
    }

    #[test]
    fn test_self_recursion_terminates_with_self_edge() {
        let sources = MemorySources::new().with(
            "demo.A",
            "package demo;\npublic class A { void m(int n) { if (n > 0) { m(n - 1); } } }\n",
        );

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.A", "m");

            assert_eq!(graph.len(), 1);
            assert_eq!(graph.calls("demo.A", "m"), &[call("this", "demo.A", "m")]);
        }
    }

    #[test]
    fn test_mutual_recursion_expands_each_node_once() {
        let sources = MemorySources::new()
            .with("demo.A", "package demo;\npublic class A { private B b; void ping() { b.pong(); } }\n")
            .with("demo.B", "package demo;\npublic class B { private A a; void pong() { a.ping(); } }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.A", "ping");

            assert_eq!(graph.len(), 2);
            assert_eq!(graph.calls("demo.B", "pong"), &[call("a", "demo.A", "ping")]);
        }
    }

    #[test]
    fn test_missing_start_source_gives_empty_graph() {
        for strategy in STRATEGIES {
            let graph = builder(strategy, crud_sources()).analyze("com.nowhere.Ghost", "haunt");

            assert!(graph.is_empty());
            assert_eq!(graph.start(), &key("com.nowhere.Ghost", "haunt"));
            assert_eq!(graph.skipped().len(), 1);
        }
    }

    #[test]
    fn test_unparsable_branch_is_abandoned() {
        let sources = MemorySources::new()
            .with(
                "demo.A",
                "package demo;\npublic class A { private B b; private C c; void m() { b.x(); c.y(); } }\n",
            )
            .with("demo.B", "package demo;\npublic class B { void x() { \n")
            .with("demo.C", "package demo;\npublic class C { void y() {} }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.A", "m");

            assert!(graph.node(&key("demo.B", "x")).is_none());
            assert!(graph.node(&key("demo.C", "y")).is_some());
            assert_eq!(graph.skipped()[0].key, key("demo.B", "x"));
            assert_eq!(graph.calls("demo.A", "m").len(), 2);
        }
    }

    #[test]
    fn test_superclass_fallback_and_missing_method() {
        let sources = MemorySources::new()
            .with(
                "demo.Child",
                "package demo;\npublic class Child extends Base { void run() { start(); stop(); } }\n",
            )
            .with("demo.Base", "package demo;\npublic class Base { void start() { boot(); } void boot() {} }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.Child", "run");

            assert_eq!(
                graph.calls("demo.Child", "start"),
                &[Edge::new("super", "demo.Base", "start", EdgeKind::Inherited)]
            );
            assert_eq!(graph.calls("demo.Base", "start"), &[call("this", "demo.Base", "boot")]);

            let stop = graph.node(&key("demo.Base", "stop")).unwrap();
            assert_eq!(stop.terminal_reason(), Some(TerminalReason::MethodNotFound));
        }
    }

    #[test]
    fn test_object_superclass_is_not_followed() {
        let sources = MemorySources::new().with(
            "demo.A",
            "package demo;\npublic class A extends Object { void m() { other(); } }\n",
        );

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.A", "m");
            let other = graph.node(&key("demo.A", "other")).unwrap();

            assert_eq!(other.terminal_reason(), Some(TerminalReason::MethodNotFound));
            assert!(graph.node(&key("java.lang.Object", "other")).is_none());
        }
    }

    #[test]
    fn test_default_method_body_is_traversed() {
        let sources = MemorySources::new()
            .with(
                "demo.Client",
                "package demo;\npublic class Client { private Greeter greeter; void go() { greeter.greet(); } }\n",
            )
            .with(
                "demo.Greeter",
                "package demo;\npublic interface Greeter { String name(); default String greet() { return name(); } }\n",
            );

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.Client", "go");

            assert_eq!(graph.calls("demo.Greeter", "greet"), &[call("this", "demo.Greeter", "name")]);
            let name = graph.node(&key("demo.Greeter", "name")).unwrap();
            assert_eq!(name.terminal_reason(), Some(TerminalReason::UnresolvedDispatch));
        }
    }

    #[test]
    fn test_terminal_nodes_have_no_edges_and_reruns_are_identical() {
        for strategy in STRATEGIES {
            let builder = builder(strategy, crud_sources());
            let first = builder.analyze("com.sbtl1.mod1.rest.UserController", "createUser");
            let second = builder.analyze("com.sbtl1.mod1.rest.UserController", "createUser");

            assert!(!first.terminal_nodes().is_empty());
            assert!(first.terminal_nodes().iter().all(|n| n.edges.is_empty()));
            assert_eq!(first.fingerprint(), second.fingerprint());
        }
    }

    #[test]
    fn test_strategies_build_identical_graphs() {
        let heuristic = builder(Strategy::Heuristic, crud_sources())
            .analyze("com.sbtl1.mod1.rest.UserController", "createUser");
        let structural = builder(Strategy::Structural, crud_sources())
            .analyze("com.sbtl1.mod1.rest.UserController", "createUser");

        assert_eq!(heuristic.fingerprint(), structural.fingerprint());
    }

    #[test]
    fn test_strategies_agree_on_calls_after_comparisons() {
        let sources = MemorySources::new().with(
            "demo.A",
            "package demo;\npublic class A { boolean m(int n) { return n > limit(); } int limit() { return 3; } }\n",
        );
        let heuristic = builder(Strategy::Heuristic, sources.clone()).analyze("demo.A", "m");
        let structural = builder(Strategy::Structural, sources).analyze("demo.A", "m");

        assert_eq!(heuristic.calls("demo.A", "m"), &[call("this", "demo.A", "limit")]);
        assert_eq!(heuristic.fingerprint(), structural.fingerprint());
    }

    #[test]
    fn test_unreadable_source_abandons_only_its_branch() {
        let failing = MemorySources::new().failing_on("demo.Broken");
        let sources = failing
            .with(
                "demo.A",
                "package demo;\npublic class A { private Broken broken; private C c; void m() { broken.go(); c.y(); } }\n",
            )
            .with("demo.C", "package demo;\npublic class C { void y() {} }\n");

        for strategy in STRATEGIES {
            let graph = builder(strategy, sources.clone()).analyze("demo.A", "m");

            assert_eq!(graph.len(), 2, "{:?}", strategy);
            assert!(graph.node(&key("demo.C", "y")).is_some());
            assert!(graph.node(&key("demo.Broken", "go")).is_none());
            assert_eq!(graph.skipped().len(), 1);
            assert_eq!(graph.skipped()[0].key, key("demo.Broken", "go"));
        }
    }

    #[test]
    fn test_non_utf8_source_on_disk_keeps_sibling_branches() {
        use assert_fs::prelude::*;
        use crate::config::Config;
        use crate::core::{create_analyzer, FsSourceLocator};

        let temp = assert_fs::TempDir::new().unwrap();
        let root = temp.child("src/main/java/demo");
        root.child("A.java")
            .write_str("package demo;\npublic class A { private B b; private C c; void m() { c.y(); b.x(); } }\n")
            .unwrap();
        let mut latin1 = b"package demo;\n// Gr".to_vec();
        latin1.push(0xE9);
        latin1.extend_from_slice(b"goire\npublic class B { void x() {} }\n");
        root.child("B.java").write_binary(&latin1).unwrap();
        root.child("C.java")
            .write_str("package demo;\npublic class C { void y() {} }\n")
            .unwrap();

        let config = Config::default();
        for strategy in STRATEGIES {
            let builder = CallGraphBuilder::new(
                create_analyzer(strategy).unwrap(),
                Arc::new(FsSourceLocator::new(temp.path(), &config)),
                &config.analysis,
            );
            let graph = builder.analyze("demo.A", "m");

            assert_eq!(
                graph.calls("demo.A", "m"),
                &[call("c", "demo.C", "y"), call("b", "demo.B", "x")],
                "{:?}",
                strategy
            );
            assert!(graph.node(&key("demo.C", "y")).is_some());
            assert!(graph.node(&key("demo.B", "x")).is_some());
        }
    }

    #[test]
    fn test_panics_become_empty_graph() {
        let sources = MemorySources::new().panicking_on("demo.A");
        let graph = builder(Strategy::Heuristic, sources).analyze("demo.A", "m");
        assert!(graph.is_empty());
    }
}
