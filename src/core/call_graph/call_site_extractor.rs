// src/core/call_graph/call_site_extractor.rs - Invocations of one method body as edges
use std::collections::HashSet;
use tracing::trace;

use super::super::{ParsedMethod, Receiver};
use super::call_graph::{Edge, EdgeKind};
use super::consts::IGNORED_METHODS;
use super::field_collector::FieldTypeMap;

#[derive(Debug, Clone)]
pub struct CallSiteExtractor {
    ignored: HashSet<String>,
}

impl CallSiteExtractor {
    pub fn new(extra_ignored: &[String]) -> Self {
        let ignored = IGNORED_METHODS
            .iter()
            .map(|m| m.to_string())
            .chain(extra_ignored.iter().cloned())
            .collect();
        Self { ignored }
    }

    pub fn is_ignored(&self, method: &str) -> bool {
        self.ignored.contains(method)
    }

    /// Edges for every invocation whose receiver resolves through `fields`, in source order.
    /// Receivers that do not resolve (locals, parameters, chained calls) yield nothing.
    pub fn extract(&self, method: &ParsedMethod, fields: &FieldTypeMap) -> Vec<Edge> {
        let mut edges = Vec::new();

        for invocation in &method.invocations {
            if self.is_ignored(&invocation.method) {
                continue;
            }

            let receiver = match &invocation.receiver {
                Receiver::Implicit | Receiver::This => "this",
                Receiver::Named(name) => name.as_str(),
                Receiver::Complex => {
                    trace!("{}: dropping chained call {}", method.name, invocation.method);
                    continue;
                }
            };

            match fields.get(receiver) {
                Some(callee_type) => {
                    edges.push(Edge::new(receiver, callee_type, &invocation.method, EdgeKind::Call));
                }
                None => trace!(
                    "{}: unresolved receiver {} for {}",
                    method.name,
                    receiver,
                    invocation.method
                ),
            }
        }

        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Invocation;

    fn method(invocations: Vec<Invocation>) -> ParsedMethod {
        ParsedMethod {
            name: "m1".to_string(),
            annotations: vec![],
            is_default: false,
            is_static: false,
            has_body: true,
            invocations,
            span: (0, 0),
            line_range: (1, 1),
        }
    }

    #[test]
    fn test_resolves_this_and_fields_in_order() {
        let fields = FieldTypeMap::new("a.A");
        let body = method(vec![
            Invocation::new(Receiver::This, "m2"),
            Invocation::new(Receiver::Implicit, "m3"),
            Invocation::new(Receiver::Named("local".to_string()), "m4"),
            Invocation::new(Receiver::Complex, "m5"),
        ]);

        let edges = CallSiteExtractor::new(&[]).extract(&body, &fields);
        assert_eq!(
            edges,
            vec![
                Edge::new("this", "a.A", "m2", EdgeKind::Call),
                Edge::new("this", "a.A", "m3", EdgeKind::Call),
            ]
        );
    }

    #[test]
    fn test_blacklist_and_extras_are_dropped() {
        let fields = FieldTypeMap::new("a.A");
        let body = method(vec![
            Invocation::new(Receiver::This, "toString"),
            Invocation::new(Receiver::Implicit, "stream"),
            Invocation::new(Receiver::Implicit, "audit"),
            Invocation::new(Receiver::Implicit, "run"),
        ]);

        let edges = CallSiteExtractor::new(&["audit".to_string()]).extract(&body, &fields);
        assert_eq!(edges, vec![Edge::new("this", "a.A", "run", EdgeKind::Call)]);
    }
}
