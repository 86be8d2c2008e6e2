// src/core/report.rs - Rendering call graphs as text trees, JSON and Markdown bundles
use std::collections::{BTreeMap, HashSet};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::config::OutputFormat;
use crate::error::Result;
use super::call_graph::{CallGraph, CallNode, EdgeKind, MethodKey, SkippedBranch};

const MARKDOWN_TEMPLATE: &str = r#"# Code Execution Path Analysis

Entry point: `{{ start }}`

## Call Graph Overview

```text
{{ tree }}
```

## Method Code Snippets
{% for section in sections %}
### {{ section.role }}: {{ section.name }}

Type: `{{ section.type_name }}`{% if section.path %} ({{ section.path }}){% endif %}
{% for method in section.methods %}
#### {{ method.name }}
{% if method.note %}
> {{ method.note }}
{% endif %}{% if method.snippet %}
```java
{{ method.snippet }}
```
{% endif %}{% endfor %}{% endfor %}
{% if skipped %}
## Skipped Branches
{% for branch in skipped %}
- `{{ branch.key }}`: {{ branch.reason }}{% endfor %}
{% endif %}
## End of Analysis
"#;

/// JSON shape of one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub start_class: String,
    pub start_method: String,
    pub call_graph: CallHierarchy,
    pub files_involved: Vec<String>,
    pub nodes: Vec<CallNode>,
    pub skipped: Vec<SkippedBranch>,
    pub fingerprint: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHierarchy {
    /// `Type.method` -> callees as `Type.method`
    pub call_hierarchy: BTreeMap<String, Vec<String>>,
}

impl FlowReport {
    pub fn from_graph(graph: &CallGraph) -> Self {
        let call_hierarchy = graph
            .nodes()
            .iter()
            .map(|n| {
                let callees = n.edges.iter().map(|e| e.callee().to_string()).collect();
                (n.key.to_string(), callees)
            })
            .collect();

        Self {
            start_class: graph.start().type_name.clone(),
            start_method: graph.start().method.clone(),
            call_graph: CallHierarchy { call_hierarchy },
            files_involved: graph.files().iter().map(|p| p.display().to_string()).collect(),
            nodes: graph.nodes().to_vec(),
            skipped: graph.skipped().to_vec(),
            fingerprint: graph.fingerprint(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct MarkdownContext {
    start: String,
    tree: String,
    sections: Vec<TypeSection>,
    skipped: Vec<SkippedView>,
}

#[derive(Serialize)]
struct TypeSection {
    role: String,
    name: String,
    type_name: String,
    path: Option<String>,
    methods: Vec<MethodView>,
}

#[derive(Serialize)]
struct MethodView {
    name: String,
    note: Option<String>,
    snippet: Option<String>,
}

#[derive(Serialize)]
struct SkippedView {
    key: String,
    reason: String,
}

pub struct ReportRenderer {
    include_snippets: bool,
    /// Type-name markers that title Markdown sections, in priority order
    role_markers: Vec<String>,
}

impl ReportRenderer {
    pub fn new(include_snippets: bool, role_markers: Vec<String>) -> Self {
        Self {
            include_snippets,
            role_markers,
        }
    }

    pub fn render(&self, graph: &CallGraph, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Tree => Ok(self.tree(graph)),
            OutputFormat::Json => self.json(graph),
            OutputFormat::Markdown => self.markdown(graph),
        }
    }

    /// Indented call tree; repeats are marked instead of expanded again
    pub fn tree(&self, graph: &CallGraph) -> String {
        let mut lines = Vec::new();
        if graph.is_empty() {
            lines.push(format!("{} (no call graph)", self.label(graph.start())));
            return lines.join("\n");
        }

        let mut printed = HashSet::new();
        self.tree_lines(graph, graph.start(), None, 0, &mut printed, &mut lines);
        lines.join("\n")
    }

    fn tree_lines(
        &self,
        graph: &CallGraph,
        key: &MethodKey,
        via: Option<EdgeKind>,
        depth: usize,
        printed: &mut HashSet<MethodKey>,
        lines: &mut Vec<String>,
    ) {
        let indent = "  ".repeat(depth);
        let kind = match via {
            Some(EdgeKind::Dispatch) => " (implementation)",
            Some(EdgeKind::Inherited) => " (inherited)",
            _ => "",
        };

        let Some(node) = graph.node(key) else {
            lines.push(format!("{}{}{} [skipped]", indent, self.label(key), kind));
            return;
        };
        if !printed.insert(key.clone()) {
            lines.push(format!("{}{}{} (recursive call)", indent, self.label(key), kind));
            return;
        }

        let reason = node
            .terminal_reason()
            .map(|r| format!(" [{}]", r.describe()))
            .unwrap_or_default();
        lines.push(format!("{}{}{}{}", indent, self.label(key), kind, reason));

        for edge in &node.edges {
            self.tree_lines(graph, &edge.callee(), Some(edge.kind), depth + 1, printed, lines);
        }
    }

    fn label(&self, key: &MethodKey) -> String {
        format!("{}.{}", key.simple_type(), key.method)
    }

    pub fn json(&self, graph: &CallGraph) -> Result<String> {
        Ok(serde_json::to_string_pretty(&FlowReport::from_graph(graph))?)
    }

    /// Context bundle: the call tree, then method sources grouped by type
    pub fn markdown(&self, graph: &CallGraph) -> Result<String> {
        let mut sections: Vec<TypeSection> = Vec::new();

        for node in graph.nodes() {
            let view = MethodView {
                name: node.key.method.clone(),
                note: self.note(node),
                snippet: node.snippet.clone().filter(|_| self.include_snippets),
            };
            match sections.iter_mut().find(|s| s.type_name == node.key.type_name) {
                Some(section) => section.methods.push(view),
                None => sections.push(TypeSection {
                    role: self.role(node.key.simple_type()).to_string(),
                    name: node.key.simple_type().to_string(),
                    type_name: node.key.type_name.clone(),
                    path: node.source_path.as_ref().map(|p| p.display().to_string()),
                    methods: vec![view],
                }),
            }
        }

        let context = MarkdownContext {
            start: graph.start().to_string(),
            tree: self.tree(graph),
            sections,
            skipped: graph
                .skipped()
                .iter()
                .map(|s| SkippedView {
                    key: s.key.to_string(),
                    reason: s.reason.clone(),
                })
                .collect(),
        };

        let context = Context::from_serialize(&context)?;
        Ok(Tera::one_off(MARKDOWN_TEMPLATE, &context, false)?)
    }

    fn role(&self, simple_type: &str) -> &str {
        self.role_markers
            .iter()
            .find(|m| simple_type.contains(m.as_str()))
            .map(String::as_str)
            .unwrap_or("Class")
    }

    fn note(&self, node: &CallNode) -> Option<String> {
        let reason = node.terminal_reason()?;
        if reason.is_framework() {
            Some(format!(
                "Implemented by the persistence framework ({}); no project code runs here.",
                reason.describe()
            ))
        } else {
            Some(format!("No further code could be followed ({}).", reason.describe()))
        }
    }
}
