// src/core/call_graph/dispatch.rs - Deciding where an interface method call goes
use super::super::{simple_type_name, ParsedMethod, ParsedType, ParsedUnit};
use super::call_graph::TerminalReason;
use super::consts::{CRUD_METHODS, CUSTOM_QUERY_ANNOTATION, DERIVED_QUERY_PREFIXES, REPOSITORY_CONTRACTS};

/// Outcome for an interface method, tried in this order
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch<'a> {
    /// The interface carries a default body; traverse it like any method
    DefaultBody(&'a ParsedMethod),
    /// Satisfied by the persistence framework
    FrameworkContract(TerminalReason),
    /// Concrete types, qualified, that declare they implement the interface
    Implementors(Vec<String>),
    /// No implementor among the files read so far
    Unresolved,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchResolver;

impl DispatchResolver {
    pub fn new() -> Self {
        Self
    }

    /// `encountered` is only consulted when neither a default body nor a
    /// framework contract applies.
    pub fn resolve<'a, 'u, I>(&self, interface: &'a ParsedType, method: &str, encountered: I) -> Dispatch<'a>
    where
        I: IntoIterator<Item = &'u ParsedUnit>,
    {
        if let Some(body) = interface.find_default_method(method) {
            return Dispatch::DefaultBody(body);
        }

        if let Some(reason) = self.framework_contract(interface, method) {
            return Dispatch::FrameworkContract(reason);
        }

        let mut implementors: Vec<String> = Vec::new();
        for unit in encountered {
            for ty in unit.types.iter().filter(|t| t.implements(&interface.name)) {
                let qualified = unit.qualify(&ty.name);
                if !implementors.contains(&qualified) {
                    implementors.push(qualified);
                }
            }
        }

        if implementors.is_empty() {
            Dispatch::Unresolved
        } else {
            Dispatch::Implementors(implementors)
        }
    }

    pub fn is_repository(&self, interface: &ParsedType) -> bool {
        interface
            .interfaces
            .iter()
            .any(|s| REPOSITORY_CONTRACTS.contains(&simple_type_name(s)))
    }

    fn framework_contract(&self, interface: &ParsedType, method: &str) -> Option<TerminalReason> {
        if !self.is_repository(interface) {
            return None;
        }

        if DERIVED_QUERY_PREFIXES.iter().any(|p| method.starts_with(p)) {
            return Some(TerminalReason::DerivedQuery);
        }
        if CRUD_METHODS.contains(&method) {
            return Some(TerminalReason::FrameworkCrud);
        }
        let custom_query = interface
            .find_method(method)
            .is_some_and(|m| m.has_annotation(CUSTOM_QUERY_ANNOTATION));
        if custom_query {
            return Some(TerminalReason::CustomQuery);
        }
        None
    }
}
