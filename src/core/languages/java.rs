// src/core/languages/java.rs - Syntax-tree Java summarizer
use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Language, Node, Parser};
use tracing::trace;

use crate::config::Strategy;
use crate::error::{CallflowError, Result};
use super::super::{
    annotation_simple_name, FieldAssignment, Invocation, ParsedConstructor, ParsedField,
    ParsedMethod, ParsedType, ParsedUnit, Parameter, Receiver, TypeKind,
};
use super::Analyzer;

/// Java analyzer backed by a Tree-sitter grammar
pub struct StructuralAnalyzer {
    language: Language,
}

impl StructuralAnalyzer {
    pub fn new() -> Result<Self> {
        let language = tree_sitter_java::language();

        // Surface grammar/runtime version mismatches at construction time
        let mut parser = Parser::new();
        parser.set_language(&language)
            .map_err(|e| CallflowError::Parser(format!("Failed to set Java language: {}", e)))?;

        Ok(Self { language })
    }

    /// A fresh parser per call keeps the analyzer shareable across threads
    fn parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)
            .map_err(|e| CallflowError::Parser(format!("Failed to set Java language: {}", e)))?;
        Ok(parser)
    }
}

impl Analyzer for StructuralAnalyzer {
    fn parse(&self, content: &str, file_path: &Path) -> Result<ParsedUnit> {
        let tree = self.parser()?.parse(content, None)
            .ok_or_else(|| CallflowError::Parser("Failed to parse Java code".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(CallflowError::Parser(format!(
                "Syntax errors in {}",
                file_path.display()
            )));
        }

        let mut unit = ParsedUnit::default();
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name) = self.qualified_name_child(child) {
                        unit.package = self.node_text(name, content);
                    }
                }
                "import_declaration" => self.record_import(child, content, &mut unit.imports),
                "class_declaration" | "interface_declaration" | "enum_declaration"
                | "record_declaration" => {
                    if let Some(parsed) = self.parse_type(child, content) {
                        unit.types.push(parsed);
                    }
                }
                _ => {}
            }
        }

        trace!("{}: {} top-level types", file_path.display(), unit.types.len());
        Ok(unit)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Structural
    }
}

impl StructuralAnalyzer {
    fn record_import(&self, node: Node, source: &str, imports: &mut HashMap<String, String>) {
        let mut cursor = node.walk();
        let is_static_or_wildcard = node
            .children(&mut cursor)
            .any(|c| c.kind() == "static" || c.kind() == "asterisk");
        if is_static_or_wildcard {
            return;
        }

        if let Some(name) = self.qualified_name_child(node) {
            let qualified = self.node_text(name, source);
            let simple = qualified.rsplit('.').next().unwrap_or(&qualified).to_string();
            imports.insert(simple, qualified);
        }
    }

    /// Parse a class, interface, enum or record declaration
    fn parse_type(&self, node: Node, source: &str) -> Option<ParsedType> {
        let name = self.node_text(node.child_by_field_name("name")?, source);
        let kind = match node.kind() {
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            _ => TypeKind::Class,
        };

        let superclass = self
            .find_child_by_kind(node, "superclass")
            .and_then(|s| s.named_child(0))
            .map(|t| self.node_text(t, source));

        let list_owner = match kind {
            TypeKind::Interface => "extends_interfaces",
            _ => "super_interfaces",
        };
        let interfaces = self
            .find_child_by_kind(node, list_owner)
            .and_then(|n| self.find_child_by_kind(n, "type_list"))
            .map(|list| {
                let mut cursor = list.walk();
                list.named_children(&mut cursor)
                    .map(|t| self.node_text(t, source))
                    .collect()
            })
            .unwrap_or_default();

        let (annotations, _) = self.modifiers(node, source);

        let mut parsed = ParsedType {
            name,
            kind,
            superclass,
            interfaces,
            annotations,
            fields: vec![],
            constructors: vec![],
            methods: vec![],
            line_range: (node.start_position().row + 1, node.end_position().row + 1),
        };

        if let Some(body) = node.child_by_field_name("body") {
            let members = match body.kind() {
                "enum_body" => self.find_child_by_kind(body, "enum_body_declarations"),
                _ => Some(body),
            };
            if let Some(members) = members {
                self.parse_members(members, source, &mut parsed);
            }
        }

        Some(parsed)
    }

    fn parse_members(&self, body: Node, source: &str, target: &mut ParsedType) {
        let mut cursor = body.walk();

        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" | "constant_declaration" => {
                    let (annotations, keywords) = self.modifiers(member, source);
                    let is_static = keywords.iter().any(|k| k == "static")
                        || target.is_interface()
                        || member.kind() == "constant_declaration";
                    let Some(type_node) = member.child_by_field_name("type") else {
                        continue;
                    };
                    let type_name = self.node_text(type_node, source);

                    let mut declarators = member.walk();
                    for declarator in member.children_by_field_name("declarator", &mut declarators) {
                        if let Some(name) = declarator.child_by_field_name("name") {
                            target.fields.push(ParsedField {
                                name: self.node_text(name, source),
                                type_name: type_name.clone(),
                                annotations: annotations.clone(),
                                is_static,
                            });
                        }
                    }
                }
                "constructor_declaration" => {
                    let (_, keywords) = self.modifiers(member, source);
                    let parameters = member
                        .child_by_field_name("parameters")
                        .map(|p| self.parameters(p, source))
                        .unwrap_or_default();
                    let assignments = member
                        .child_by_field_name("body")
                        .map(|b| self.field_assignments(b, source))
                        .unwrap_or_default();

                    target.constructors.push(ParsedConstructor {
                        is_public: keywords.iter().any(|k| k == "public"),
                        parameters,
                        assignments,
                    });
                }
                "method_declaration" => {
                    if let Some(method) = self.parse_method(member, source) {
                        target.methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }

    fn parse_method(&self, node: Node, source: &str) -> Option<ParsedMethod> {
        let name = self.node_text(node.child_by_field_name("name")?, source);
        let (annotations, keywords) = self.modifiers(node, source);
        let body = node.child_by_field_name("body");

        let invocations = body
            .map(|b| {
                let mut found = Vec::new();
                self.collect_invocations(b, source, &mut found);
                found.sort_by_key(|(position, _)| *position);
                found.into_iter().map(|(_, invocation)| invocation).collect()
            })
            .unwrap_or_default();

        Some(ParsedMethod {
            name,
            annotations,
            is_default: keywords.iter().any(|k| k == "default"),
            is_static: keywords.iter().any(|k| k == "static"),
            has_body: body.is_some(),
            invocations,
            span: (node.start_byte(), node.end_byte()),
            line_range: (node.start_position().row + 1, node.end_position().row + 1),
        })
    }

    /// Every `method_invocation` below `node`, keyed by the position of the invoked name
    fn collect_invocations(&self, node: Node, source: &str, found: &mut Vec<(usize, Invocation)>) {
        if node.kind() == "method_invocation" {
            if let Some(name) = node.child_by_field_name("name") {
                let receiver = match node.child_by_field_name("object") {
                    None => Receiver::Implicit,
                    Some(object) => match object.kind() {
                        "this" => Receiver::This,
                        "identifier" => Receiver::Named(self.node_text(object, source)),
                        "field_access" => object
                            .child_by_field_name("field")
                            .map(|f| Receiver::Named(self.node_text(f, source)))
                            .unwrap_or(Receiver::Complex),
                        _ => Receiver::Complex,
                    },
                };
                let method = self.node_text(name, source);
                found.push((name.start_byte(), Invocation::new(receiver, &method)));
            }
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_invocations(child, source, found);
        }
    }

    /// `this.<field> = <identifier>` statements anywhere in a constructor body
    fn field_assignments(&self, body: Node, source: &str) -> Vec<FieldAssignment> {
        let mut assignments = Vec::new();
        let mut stack = vec![body];

        while let Some(node) = stack.pop() {
            if node.kind() == "assignment_expression" {
                let left = node.child_by_field_name("left");
                let right = node.child_by_field_name("right");
                if let (Some(left), Some(right)) = (left, right) {
                    let targets_this = left.kind() == "field_access"
                        && left.child_by_field_name("object").map(|o| o.kind()) == Some("this");
                    if targets_this && right.kind() == "identifier" {
                        if let Some(field) = left.child_by_field_name("field") {
                            assignments.push((
                                node.start_byte(),
                                FieldAssignment {
                                    field: self.node_text(field, source),
                                    value: self.node_text(right, source),
                                },
                            ));
                        }
                    }
                }
            }

            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor));
        }

        assignments.sort_by_key(|(position, _)| *position);
        assignments.into_iter().map(|(_, a)| a).collect()
    }

    fn parameters(&self, node: Node, source: &str) -> Vec<Parameter> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter_map(|param| match param.kind() {
                "formal_parameter" => Some(Parameter {
                    name: self.node_text(param.child_by_field_name("name")?, source),
                    type_name: self.node_text(param.child_by_field_name("type")?, source),
                }),
                "spread_parameter" => {
                    let mut inner = param.walk();
                    let children: Vec<Node> = param.named_children(&mut inner).collect();
                    let type_node = children.iter().find(|c| c.kind() != "modifiers" && c.kind() != "variable_declarator")?;
                    let declarator = children.iter().find(|c| c.kind() == "variable_declarator")?;
                    Some(Parameter {
                        name: self.node_text(declarator.child_by_field_name("name")?, source),
                        type_name: format!("{}...", self.node_text(*type_node, source)),
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Annotation simple names and keyword modifiers of a declaration
    fn modifiers(&self, node: Node, source: &str) -> (Vec<String>, Vec<String>) {
        let mut annotations = Vec::new();
        let mut keywords = Vec::new();

        if let Some(modifiers) = self.find_child_by_kind(node, "modifiers") {
            let mut cursor = modifiers.walk();
            for child in modifiers.children(&mut cursor) {
                match child.kind() {
                    "marker_annotation" | "annotation" => {
                        if let Some(name) = child.child_by_field_name("name") {
                            annotations.push(annotation_simple_name(&self.node_text(name, source)));
                        }
                    }
                    kind if !child.is_named() => keywords.push(kind.to_string()),
                    _ => {}
                }
            }
        }

        (annotations, keywords)
    }

    fn qualified_name_child<'a>(&self, node: Node<'a>) -> Option<Node<'a>> {
        self.find_child_by_kind(node, "scoped_identifier")
            .or_else(|| self.find_child_by_kind(node, "identifier"))
    }

    /// Extract text content of a node
    fn node_text(&self, node: Node, source: &str) -> String {
        source[node.byte_range()].to_string()
    }

    /// Find a child node by its kind
    fn find_child_by_kind<'a>(&self, node: Node<'a>, kind: &str) -> Option<Node<'a>> {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor).find(|child| child.kind() == kind);
        found
    }
}
