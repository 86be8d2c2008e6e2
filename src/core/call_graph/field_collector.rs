// src/core/call_graph/field_collector.rs - Identifier to type maps for one declared type
use std::collections::HashMap;
use tracing::trace;

use super::super::ParsedType;
use super::type_resolver::{ResolutionScope, TypeResolver};

/// Identifier -> resolved type for the members of one type. Always maps `this`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTypeMap {
    types: HashMap<String, String>,
}

impl FieldTypeMap {
    pub fn new(self_type: &str) -> Self {
        let mut types = HashMap::new();
        types.insert("this".to_string(), self_type.to_string());
        Self { types }
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.types.get(identifier).map(String::as_str)
    }

    /// Map an identifier unless an earlier pass already did
    fn insert_if_absent(&mut self, identifier: &str, type_name: String) {
        self.types.entry(identifier.to_string()).or_insert(type_name);
    }
}

#[derive(Debug, Clone)]
pub struct FieldTypeCollector {
    injection_annotations: Vec<String>,
}

impl FieldTypeCollector {
    pub fn new(injection_annotations: Vec<String>) -> Self {
        Self { injection_annotations }
    }

    /// Three passes, first mapping wins: injected fields, constructor-injected
    /// fields, then any other instance field with a resolvable type.
    pub fn collect(
        &self,
        ty: &ParsedType,
        self_type: &str,
        scope: &ResolutionScope,
        resolver: &TypeResolver,
    ) -> FieldTypeMap {
        let mut map = FieldTypeMap::new(self_type);

        for field in &ty.fields {
            let injected = field
                .annotations
                .iter()
                .any(|a| self.injection_annotations.contains(a));
            if injected {
                if let Some(resolved) = resolver.resolve(&field.type_name, scope) {
                    trace!("{}: injected {} -> {}", ty.name, field.name, resolved);
                    map.insert_if_absent(&field.name, resolved);
                }
            }
        }

        for constructor in ty.constructors.iter().filter(|c| c.is_public) {
            for assignment in &constructor.assignments {
                let Some(parameter) = constructor
                    .parameters
                    .iter()
                    .find(|p| p.name == assignment.value)
                else {
                    continue;
                };
                if let Some(resolved) = resolver.resolve(&parameter.type_name, scope) {
                    trace!("{}: constructor-injected {} -> {}", ty.name, assignment.field, resolved);
                    map.insert_if_absent(&assignment.field, resolved);
                }
            }
        }

        for field in ty.fields.iter().filter(|f| !f.is_static) {
            if let Some(resolved) = resolver.resolve(&field.type_name, scope) {
                map.insert_if_absent(&field.name, resolved);
            }
        }

        map
    }
}
