// src/core/parser.rs - Language-neutral summary of a parsed Java compilation unit
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Structural summary of one `.java` file, produced by either analyzer strategy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedUnit {
    /// Declared package (empty for the default package)
    pub package: String,

    /// Single-type imports: simple name -> qualified name
    pub imports: HashMap<String, String>,

    /// Top-level type declarations in source order
    pub types: Vec<ParsedType>,
}

impl ParsedUnit {
    /// Find a top-level type by simple name
    pub fn find_type(&self, simple_name: &str) -> Option<&ParsedType> {
        self.types.iter().find(|t| t.name == simple_name)
    }

    /// Qualify a simple type name with this unit's package
    pub fn qualify(&self, simple_name: &str) -> String {
        if self.package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", self.package, simple_name)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedType {
    pub name: String,
    pub kind: TypeKind,

    /// Declared superclass, as written (classes only)
    pub superclass: Option<String>,

    /// `implements` list for classes, enums and records; `extends` list for interfaces
    pub interfaces: Vec<String>,

    pub annotations: Vec<String>,
    pub fields: Vec<ParsedField>,
    pub constructors: Vec<ParsedConstructor>,
    pub methods: Vec<ParsedMethod>,

    /// Line range in source file
    pub line_range: (usize, usize),
}

impl ParsedType {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// First method declared with this name (overloads are not distinguished)
    pub fn find_method(&self, name: &str) -> Option<&ParsedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// First `default` method with this name and a body
    pub fn find_default_method(&self, name: &str) -> Option<&ParsedMethod> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.is_default && m.has_body)
    }

    /// Whether this type declares `implements` of the given interface, by simple name
    pub fn implements(&self, interface_simple_name: &str) -> bool {
        !self.is_interface()
            && self
                .interfaces
                .iter()
                .any(|i| simple_type_name(i) == interface_simple_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedField {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<String>,
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}

/// A `this.<field> = <value>;` statement found in a constructor body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedConstructor {
    pub is_public: bool,
    pub parameters: Vec<Parameter>,
    pub assignments: Vec<FieldAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedMethod {
    pub name: String,
    pub annotations: Vec<String>,
    pub is_default: bool,
    pub is_static: bool,
    pub has_body: bool,

    /// Invocation expressions in the body, ordered by the position of the invoked name
    pub invocations: Vec<Invocation>,

    /// Byte range of the whole declaration in the original source
    pub span: (usize, usize),

    /// Line range in source file
    pub line_range: (usize, usize),
}

impl ParsedMethod {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|a| a == name)
    }
}

/// What an invocation was called on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Receiver {
    /// `m()`
    Implicit,
    /// `this.m()`
    This,
    /// `ident.m()`, including the trailing identifier of `a.ident.m()`
    Named(String),
    /// Chained calls, array access, `super`, parenthesized expressions...
    Complex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub receiver: Receiver,
    pub method: String,
}

impl Invocation {
    pub fn new(receiver: Receiver, method: &str) -> Self {
        Self {
            receiver,
            method: method.to_string(),
        }
    }
}

/// Strip generic arguments, array brackets and qualifiers: `java.util.List<Foo>` -> `List`
pub fn simple_type_name(type_name: &str) -> &str {
    let base = erase_type_arguments(type_name);
    let base = base.trim_end_matches("[]").trim_end_matches("...").trim();
    base.rsplit('.').next().unwrap_or(base)
}

/// Drop generic arguments but keep qualifiers: `a.b.Repo<T, ID>` -> `a.b.Repo`
pub fn erase_type_arguments(type_name: &str) -> &str {
    let trimmed = type_name.trim();
    match trimmed.find('<') {
        Some(pos) => trimmed[..pos].trim(),
        None => trimmed,
    }
}

/// Last segment of a possibly qualified annotation name: `@javax.inject.Inject` -> `Inject`
pub fn annotation_simple_name(raw: &str) -> String {
    let name = raw.trim().trim_start_matches('@');
    let name = name.split('(').next().unwrap_or(name).trim();
    name.rsplit('.').next().unwrap_or(name).to_string()
}

/// 1-based line number of a byte offset
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
}
