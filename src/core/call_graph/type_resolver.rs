// src/core/call_graph/type_resolver.rs - Short type name to qualified name
use std::collections::HashMap;

use crate::config::ConventionRule;
use super::super::{erase_type_arguments, ParsedUnit};
use super::consts::{BUILTIN_TYPES, CONTAINER_TYPES};

/// Lexical context a type name is resolved in
#[derive(Debug, Clone, Copy)]
pub struct ResolutionScope<'a> {
    pub package: &'a str,
    pub imports: &'a HashMap<String, String>,
}

impl<'a> ResolutionScope<'a> {
    pub fn from_unit(unit: &'a ParsedUnit) -> Self {
        Self {
            package: &unit.package,
            imports: &unit.imports,
        }
    }
}

/// Resolves declared type names heuristically. Never fails; `None` means
/// the name can produce no edge.
#[derive(Debug, Clone)]
pub struct TypeResolver {
    conventions: Vec<ConventionRule>,
}

impl TypeResolver {
    pub fn new(conventions: Vec<ConventionRule>) -> Self {
        Self { conventions }
    }

    pub fn resolve(&self, short_name: &str, scope: &ResolutionScope) -> Option<String> {
        let name = erase_type_arguments(short_name);
        if name.is_empty() || name.ends_with(']') || name.ends_with("...") {
            return None;
        }

        // Already qualified
        if name.contains('.') {
            return Some(name.to_string());
        }

        if Self::is_builtin(name) {
            return None;
        }

        if let Some(qualified) = scope.imports.get(name) {
            return Some(qualified.clone());
        }

        if let Some(rule) = self.conventions.iter().find(|r| name.contains(r.marker.as_str())) {
            let package = match scope.package.rsplit_once('.') {
                Some((parent, _)) => format!("{}.{}", parent, rule.package),
                None => rule.package.clone(),
            };
            return Some(format!("{}.{}", package, name));
        }

        if scope.package.is_empty() {
            Some(name.to_string())
        } else {
            Some(format!("{}.{}", scope.package, name))
        }
    }

    /// Primitives, boxed forms, platform types and container families
    pub fn is_builtin(simple_name: &str) -> bool {
        let name = erase_type_arguments(simple_name);
        BUILTIN_TYPES.contains(&name) || CONTAINER_TYPES.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn resolver() -> TypeResolver {
        TypeResolver::new(AnalysisConfig::default().conventions)
    }

    fn imports() -> HashMap<String, String> {
        let mut imports = HashMap::new();
        imports.insert("User".to_string(), "com.sbtl1.mod1.entities.User".to_string());
        imports.insert("OrderService".to_string(), "com.other.OrderService".to_string());
        imports
    }

    #[test]
    fn test_qualified_names_pass_through() {
        let imports = HashMap::new();
        let scope = ResolutionScope { package: "a.b", imports: &imports };
        assert_eq!(
            resolver().resolve("java.util.List<Foo>", &scope).as_deref(),
            Some("java.util.List")
        );
    }

    #[test]
    fn test_builtins_and_containers_resolve_to_none() {
        let imports = HashMap::new();
        let scope = ResolutionScope { package: "a.b", imports: &imports };
        for name in ["int", "Long", "String", "List<User>", "Map<String, User>", "Optional<User>", "User[]"] {
            assert_eq!(resolver().resolve(name, &scope), None, "{}", name);
        }
    }

    #[test]
    fn test_import_wins_over_convention() {
        let imports = imports();
        let scope = ResolutionScope { package: "com.sbtl1.mod1.rest", imports: &imports };
        assert_eq!(
            resolver().resolve("OrderService", &scope).as_deref(),
            Some("com.other.OrderService")
        );
        assert_eq!(
            resolver().resolve("User", &scope).as_deref(),
            Some("com.sbtl1.mod1.entities.User")
        );
    }

    #[test]
    fn test_convention_replaces_trailing_package_segment() {
        let imports = HashMap::new();
        let scope = ResolutionScope { package: "com.sbtl1.mod1.rest", imports: &imports };
        let resolver = resolver();

        assert_eq!(
            resolver.resolve("UserService", &scope).as_deref(),
            Some("com.sbtl1.mod1.service.UserService")
        );
        assert_eq!(
            resolver.resolve("UserRepository", &scope).as_deref(),
            Some("com.sbtl1.mod1.dao.UserRepository")
        );
        assert_eq!(
            resolver.resolve("AuditEntity", &scope).as_deref(),
            Some("com.sbtl1.mod1.entities.AuditEntity")
        );
    }

    #[test]
    fn test_default_is_same_package() {
        let imports = HashMap::new();
        let scope = ResolutionScope { package: "com.acme", imports: &imports };
        assert_eq!(resolver().resolve("Helper", &scope).as_deref(), Some("com.acme.Helper"));

        let root = ResolutionScope { package: "", imports: &imports };
        assert_eq!(resolver().resolve("Helper", &root).as_deref(), Some("Helper"));
    }
}
