// src/core/languages/java_text.rs - Pattern-based Java summarizer
use std::collections::HashMap;
use std::path::Path;
use regex::Regex;
use tracing::trace;

use crate::config::Strategy;
use crate::error::{CallflowError, Result};
use super::super::call_graph::consts::{CALL_LIKE_KEYWORDS, MODIFIERS};
use super::super::{
    annotation_simple_name, line_of, FieldAssignment, Invocation, ParsedConstructor, ParsedField,
    ParsedMethod, ParsedType, ParsedUnit, Parameter, Receiver, TypeKind,
};
use super::Analyzer;

/// Java analyzer working on source text with regular expressions.
///
/// Comments and literals are blanked out first so that braces, parentheses
/// and identifiers inside them never confuse the scanners. Offsets in the
/// masked text match the original byte for byte.
pub struct HeuristicAnalyzer {
    package: Regex,
    import: Regex,
    type_header: Regex,
    annotation: Regex,
    assignment: Regex,
    call: Regex,
    trailing_ident: Regex,
}

impl HeuristicAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            package: compile(r"(?m)^\s*package\s+([\w.]+)\s*;")?,
            import: compile(r"(?m)^\s*import\s+(static\s+)?([\w.]+?)(\.\*)?\s*;")?,
            type_header: compile(r"\b(class|interface|enum|record)\s+([A-Za-z_$][\w$]*)")?,
            annotation: compile(r"^@\s*([A-Za-z_$][\w$.]*)")?,
            assignment: compile(r"this\s*\.\s*([A-Za-z_$][\w$]*)\s*=\s*([A-Za-z_$][\w$]*)\s*;")?,
            call: compile(r"\b([A-Za-z_][\w$]*)\s*\(")?,
            trailing_ident: compile(r"([A-Za-z_$][\w$]*)\s*((?:\[\s*\]\s*)*|\.\.\.\s*)$")?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| CallflowError::Parser(format!("Invalid analyzer pattern {}: {}", pattern, e)))
}

impl Analyzer for HeuristicAnalyzer {
    fn parse(&self, content: &str, file_path: &Path) -> Result<ParsedUnit> {
        let masked = mask_source(content);
        check_balance(&masked, file_path)?;

        let package = self
            .package
            .captures(&masked)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let mut imports = HashMap::new();
        for caps in self.import.captures_iter(&masked) {
            if caps.get(1).is_some() || caps.get(3).is_some() {
                continue;
            }
            if let Some(qualified) = caps.get(2) {
                let qualified = qualified.as_str();
                let simple = qualified.rsplit('.').next().unwrap_or(qualified);
                imports.insert(simple.to_string(), qualified.to_string());
            }
        }

        let types = self.extract_types(content, &masked, file_path)?;
        trace!("{}: {} top-level types", file_path.display(), types.len());

        Ok(ParsedUnit {
            package,
            imports,
            types,
        })
    }

    fn strategy(&self) -> Strategy {
        Strategy::Heuristic
    }
}

impl HeuristicAnalyzer {
    /// Extract every type declared at brace depth zero
    fn extract_types(&self, content: &str, masked: &str, file_path: &Path) -> Result<Vec<ParsedType>> {
        let bytes = masked.as_bytes();
        let mut types = Vec::new();
        let mut depth = 0usize;
        let mut scanned = 0usize;

        for caps in self.type_header.captures_iter(masked) {
            let (Some(keyword), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            if keyword.start() < scanned {
                // Inside a type we already consumed
                continue;
            }
            for &b in &bytes[scanned..keyword.start()] {
                match b {
                    b'{' => depth += 1,
                    b'}' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            scanned = keyword.start();
            if depth != 0 {
                continue;
            }
            let preceding = masked[..keyword.start()].trim_end();
            if preceding.ends_with('.') || preceding.ends_with('@') {
                // `Foo.class` literal or `@interface`
                continue;
            }

            let Some(open) = masked[name.end()..].find('{').map(|p| p + name.end()) else {
                continue;
            };
            let close = matching_brace(masked, open).ok_or_else(|| {
                CallflowError::Parser(format!(
                    "Unterminated body for {} in {}",
                    name.as_str(),
                    file_path.display()
                ))
            })?;

            let kind = match keyword.as_str() {
                "interface" => TypeKind::Interface,
                "enum" => TypeKind::Enum,
                "record" => TypeKind::Record,
                _ => TypeKind::Class,
            };
            let decl_start = declaration_start(masked, keyword.start());
            let annotations = self.annotations_in(&masked[decl_start..keyword.start()]);
            let (extends, implements) = header_clauses(&masked[name.end()..open]);

            let mut parsed = ParsedType {
                name: name.as_str().to_string(),
                kind,
                superclass: None,
                interfaces: vec![],
                annotations,
                fields: vec![],
                constructors: vec![],
                methods: vec![],
                line_range: (line_of(content, decl_start), line_of(content, close)),
            };
            match kind {
                TypeKind::Interface => parsed.interfaces = extends,
                TypeKind::Class => {
                    parsed.superclass = extends.into_iter().next();
                    parsed.interfaces = implements;
                }
                TypeKind::Enum | TypeKind::Record => parsed.interfaces = implements,
            }

            for member in split_members(masked, open + 1, close) {
                self.parse_member(content, masked, member, &mut parsed);
            }

            types.push(parsed);
            scanned = close + 1;
        }

        Ok(types)
    }

    /// Classify one member declaration and record it on the enclosing type
    fn parse_member(&self, content: &str, masked: &str, range: (usize, usize), target: &mut ParsedType) {
        let text = &masked[range.0..range.1];
        let decl_start = range.0 + (text.len() - text.trim_start().len());
        let (annotations, consumed) = self.take_annotations(&masked[decl_start..range.1]);
        let rest_start = decl_start + consumed;
        let rest = &masked[rest_start..range.1];

        let Some((header_len, terminator)) = header_end(rest) else {
            return;
        };
        let header = &rest[..header_len];
        let (modifiers, remainder) = split_modifiers(header);
        if remainder.is_empty() {
            // Initializer block
            return;
        }
        let first_word = remainder.split_whitespace().next().unwrap_or("");
        if matches!(first_word, "class" | "interface" | "enum" | "record" | "@interface") {
            return;
        }

        let paren = remainder.find('(');
        let assignment = first_top_level(remainder, b'=');
        match (paren, assignment) {
            (Some(p), a) if a.map_or(true, |a| p < a) => {
                let remainder_offset = rest_start + (remainder.as_ptr() as usize - header.as_ptr() as usize);
                let body_open = (terminator == b'{').then(|| rest_start + header_len);
                self.parse_callable(
                    content,
                    masked,
                    (decl_start, range.1),
                    remainder,
                    remainder_offset + p,
                    body_open,
                    annotations,
                    &modifiers,
                    target,
                );
            }
            _ => {
                if terminator == b'{' && assignment.is_none() {
                    return;
                }
                let declaration = match assignment {
                    Some(a) => &remainder[..a],
                    None => remainder,
                };
                let is_static = modifiers.contains(&"static") || target.is_interface();
                for (name, type_name) in self.field_declarators(declaration) {
                    target.fields.push(ParsedField {
                        name,
                        type_name,
                        annotations: annotations.clone(),
                        is_static,
                    });
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_callable(
        &self,
        content: &str,
        masked: &str,
        span: (usize, usize),
        remainder: &str,
        paren_pos: usize,
        body_open: Option<usize>,
        annotations: Vec<String>,
        modifiers: &[&str],
        target: &mut ParsedType,
    ) {
        let Some(paren_rel) = remainder.find('(') else {
            return;
        };
        let pre = remainder[..paren_rel].trim_end();
        let name = trailing_identifier(pre);
        if name.is_empty() {
            return;
        }
        let return_type = strip_type_parameters(pre[..pre.len() - name.len()].trim());

        let body = body_open.map(|open| &masked[open + 1..span.1.saturating_sub(1).max(open + 1)]);

        if return_type.is_empty() {
            if name != target.name {
                // Enum constant with arguments, or something we do not model
                return;
            }
            let parameters = matching_paren(masked, paren_pos)
                .map(|close| self.parameters(&masked[paren_pos + 1..close]))
                .unwrap_or_default();
            let assignments = body
                .map(|b| {
                    self.assignment
                        .captures_iter(b)
                        .filter_map(|c| {
                            Some(FieldAssignment {
                                field: c.get(1)?.as_str().to_string(),
                                value: c.get(2)?.as_str().to_string(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            target.constructors.push(ParsedConstructor {
                is_public: modifiers.contains(&"public"),
                parameters,
                assignments,
            });
            return;
        }

        target.methods.push(ParsedMethod {
            name: name.to_string(),
            annotations,
            is_default: modifiers.contains(&"default"),
            is_static: modifiers.contains(&"static"),
            has_body: body.is_some(),
            invocations: body.map(|b| self.scan_invocations(b)).unwrap_or_default(),
            span,
            line_range: (line_of(content, span.0), line_of(content, span.1.saturating_sub(1))),
        });
    }

    /// Find invocation expressions in a masked method body, in source order
    fn scan_invocations(&self, body: &str) -> Vec<Invocation> {
        let mut invocations = Vec::new();

        for caps in self.call.captures_iter(body) {
            let Some(name) = caps.get(1) else { continue };
            let method = name.as_str();
            if CALL_LIKE_KEYWORDS.contains(&method) {
                continue;
            }

            let before = body[..name.start()].trim_end();
            let receiver = if let Some(qualifier) = before.strip_suffix('.') {
                qualified_receiver(qualifier)
            } else if before.ends_with('@') || before.ends_with(']') {
                continue;
            } else if before.ends_with('>') && !before.ends_with("->") {
                match type_arguments_start(before) {
                    Some(open) => match before[..open].trim_end().strip_suffix('.') {
                        // Explicit type arguments: `recv.<T>m(`
                        Some(qualifier) => qualified_receiver(qualifier),
                        // Generic declaration such as `List<T> helper(`
                        None => continue,
                    },
                    // Right operand of `>` or `>>`
                    None => Receiver::Implicit,
                }
            } else {
                match trailing_identifier(before) {
                    "" => Receiver::Implicit,
                    "new" => continue,
                    "return" | "else" | "throw" | "case" | "yield" | "assert" | "do" => {
                        Receiver::Implicit
                    }
                    // A type name precedes the identifier: a local declaration, not a call
                    _ => continue,
                }
            };

            invocations.push(Invocation::new(receiver, method));
        }

        invocations
    }

    /// `Type name` plus any further `, name` declarators
    fn field_declarators(&self, declaration: &str) -> Vec<(String, String)> {
        let parts = split_top_level(declaration, b',');
        let Some((first, others)) = parts.split_first() else {
            return vec![];
        };
        let Some(caps) = self.trailing_ident.captures(first.trim()) else {
            return vec![];
        };
        let Some(name) = caps.get(1) else {
            return vec![];
        };
        let type_name = first.trim()[..name.start()].trim();
        if type_name.is_empty() {
            return vec![];
        }
        let type_name = match caps.get(2).map(|d| d.as_str().trim()) {
            Some(dims) if !dims.is_empty() => format!("{}{}", type_name, dims.replace(' ', "")),
            _ => type_name.to_string(),
        };

        let mut declarators = vec![(name.as_str().to_string(), type_name.clone())];
        for other in others {
            let ident = trailing_identifier(other.trim().trim_end_matches(|c| c == '[' || c == ']' || c == ' '));
            if !ident.is_empty() {
                declarators.push((ident.to_string(), type_name.clone()));
            }
        }
        declarators
    }

    fn parameters(&self, text: &str) -> Vec<Parameter> {
        split_top_level(text, b',')
            .into_iter()
            .filter_map(|raw| {
                let raw = raw.trim();
                let (_, consumed) = self.take_annotations(raw);
                let (_, declaration) = split_modifiers(&raw[consumed..]);
                let caps = self.trailing_ident.captures(declaration)?;
                let name = caps.get(1)?;
                let type_name = declaration[..name.start()].trim();
                if type_name.is_empty() {
                    return None;
                }
                Some(Parameter {
                    name: name.as_str().to_string(),
                    type_name: type_name.to_string(),
                })
            })
            .collect()
    }

    /// Leading annotations of a declaration and the byte length they occupy
    fn take_annotations(&self, text: &str) -> (Vec<String>, usize) {
        let mut names = Vec::new();
        let mut offset = 0;

        loop {
            let rest = &text[offset..];
            let trimmed = rest.trim_start();
            let skipped = rest.len() - trimmed.len();
            if trimmed.starts_with("@interface") {
                break;
            }
            let Some(caps) = self.annotation.captures(trimmed) else {
                break;
            };
            let Some(whole) = caps.get(0) else { break };
            names.push(annotation_simple_name(whole.as_str()));
            offset += skipped + whole.end();

            let after = &text[offset..];
            let args = after.trim_start();
            if args.starts_with('(') {
                let open = offset + (after.len() - args.len());
                match matching_paren(text, open) {
                    Some(close) => offset = close + 1,
                    None => break,
                }
            }
        }

        (names, offset)
    }

    fn annotations_in(&self, text: &str) -> Vec<String> {
        self.take_annotations(text).0
    }
}

/// Blank out comments and the contents of string, text-block and char literals.
/// Every replaced byte becomes a space (newlines are kept), so offsets are stable.
pub(crate) fn mask_source(source: &str) -> String {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut out = bytes.to_vec();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < len && bytes[i] != b'\n' {
                    out[i] = b' ';
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_from(bytes, i + 2, b"*/").map_or(len, |p| p + 2);
                blank(&mut out, i, end);
                i = end;
            }
            b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                let end = find_from(bytes, i + 3, b"\"\"\"").map_or(len, |p| p + 3);
                blank(&mut out, i + 3, end.saturating_sub(3).max(i + 3));
                i = end;
            }
            quote @ (b'"' | b'\'') => {
                let mut j = i + 1;
                while j < len && bytes[j] != quote && bytes[j] != b'\n' {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                let close = j.min(len);
                blank(&mut out, i + 1, close);
                i = close + 1;
            }
            _ => i += 1,
        }
    }

    // Only ASCII spaces replaced whole characters, so this cannot fail
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

fn blank(out: &mut [u8], start: usize, end: usize) {
    for b in out.iter_mut().take(end).skip(start) {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

fn find_from(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn check_balance(masked: &str, file_path: &Path) -> Result<()> {
    let mut depth: i64 = 0;
    for b in masked.bytes() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth < 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(CallflowError::Parser(format!(
            "Unbalanced braces in {}",
            file_path.display()
        )));
    }
    Ok(())
}

fn matching_delimiter(masked: &str, open: usize, opening: u8, closing: u8) -> Option<usize> {
    let bytes = masked.as_bytes();
    if bytes.get(open) != Some(&opening) {
        return None;
    }
    let mut depth = 0usize;
    for (offset, &b) in bytes[open..].iter().enumerate() {
        if b == opening {
            depth += 1;
        } else if b == closing {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

fn matching_brace(masked: &str, open: usize) -> Option<usize> {
    matching_delimiter(masked, open, b'{', b'}')
}

fn matching_paren(masked: &str, open: usize) -> Option<usize> {
    matching_delimiter(masked, open, b'(', b')')
}

/// Split a type body into member declarations
fn split_members(masked: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let bytes = masked.as_bytes();
    let mut members = Vec::new();
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut member_start = start;

    for i in start..end {
        match bytes[i] {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && parens == 0 && !has_initializer(&masked[member_start..i]) {
                    members.push((member_start, i + 1));
                    member_start = i + 1;
                }
            }
            b';' if depth == 0 && parens == 0 => {
                members.push((member_start, i + 1));
                member_start = i + 1;
            }
            _ => {}
        }
    }

    if !masked[member_start..end].trim().is_empty() {
        members.push((member_start, end));
    }
    members
}

/// Whether `=` appears before the first top-level `{` (array initializer, lambda, anonymous class)
fn has_initializer(text: &str) -> bool {
    let mut parens = 0usize;
    for b in text.bytes() {
        match b {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' if parens == 0 => return false,
            b'=' if parens == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Length of a member header and the terminator that ended it (`{` or `;`)
fn header_end(text: &str) -> Option<(usize, u8)> {
    let mut parens = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'{' | b';' if parens == 0 => return Some((i, b)),
            _ => {}
        }
    }
    None
}

fn first_top_level(text: &str, needle: u8) -> Option<usize> {
    let mut parens = 0usize;
    let mut angles = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'<' => angles += 1,
            b'>' => angles = angles.saturating_sub(1),
            _ if b == needle && parens == 0 && angles == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split on a separator outside of parentheses and angle brackets
fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut parens = 0usize;
    let mut angles = 0usize;
    let mut start = 0;

    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => parens += 1,
            b')' => parens = parens.saturating_sub(1),
            b'<' => angles += 1,
            b'>' => angles = angles.saturating_sub(1),
            _ if b == separator && parens == 0 && angles == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !text[start..].trim().is_empty() {
        parts.push(&text[start..]);
    }
    parts
}

/// Leading modifier keywords and the text after them
fn split_modifiers(text: &str) -> (Vec<&str>, &str) {
    let mut modifiers = Vec::new();
    let mut rest = text.trim_start();

    loop {
        let word_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..word_end];
        if word.is_empty() || !MODIFIERS.contains(&word) {
            break;
        }
        modifiers.push(word);
        rest = rest[word_end..].trim_start();
    }

    (modifiers, rest.trim())
}

/// Drop a leading `<T extends Foo>` type-parameter list
fn strip_type_parameters(text: &str) -> &str {
    if !text.starts_with('<') {
        return text;
    }
    let mut angles = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'<' => angles += 1,
            b'>' => {
                angles -= 1;
                if angles == 0 {
                    return text[i + 1..].trim();
                }
            }
            _ => {}
        }
    }
    text
}

/// Receiver of a call whose name follows `qualifier.`
fn qualified_receiver(qualifier: &str) -> Receiver {
    match trailing_identifier(qualifier.trim_end()) {
        "" | "super" => Receiver::Complex,
        "this" => Receiver::This,
        ident => Receiver::Named(ident.to_string()),
    }
}

/// Offset of the `<` matching the `>` that `text` ends with, when the bracketed
/// text reads as type arguments rather than comparisons or shifts
fn type_arguments_start(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;

    for i in (0..bytes.len()).rev() {
        match bytes[i] {
            b'>' => depth += 1,
            b'<' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            b'&' if i > 0 && bytes[i - 1] == b'&' => return None,
            b'.' | b',' | b'?' | b'[' | b']' | b'&' | b'_' | b'$' => {}
            c if c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || c >= 0x80 => {}
            _ => return None,
        }
    }
    None
}

fn trailing_identifier(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_' || *c == '$')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[start..]
}

/// Start of the annotations and modifiers preceding a type keyword
fn declaration_start(masked: &str, keyword_start: usize) -> usize {
    let prefix = &masked[..keyword_start];
    let start = prefix
        .rfind(|c| c == ';' || c == '}' || c == '{')
        .map_or(0, |p| p + 1);
    start + (prefix[start..].len() - prefix[start..].trim_start().len())
}

/// `extends` and `implements` lists from the text between a type name and its body
fn header_clauses(header: &str) -> (Vec<String>, Vec<String>) {
    let header = strip_type_parameters(header.trim());
    let keywords = ["extends", "implements", "permits"];

    let positions: Vec<(usize, &str)> = keywords
        .iter()
        .filter_map(|k| find_keyword(header, k).map(|p| (p, *k)))
        .collect();

    let clause = |keyword: &str| -> Vec<String> {
        let Some(&(start, _)) = positions.iter().find(|(_, k)| *k == keyword) else {
            return vec![];
        };
        let body_start = start + keyword.len();
        let end = positions
            .iter()
            .map(|(p, _)| *p)
            .filter(|p| *p > start)
            .min()
            .unwrap_or(header.len());
        split_top_level(&header[body_start..end], b',')
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    };

    (clause("extends"), clause("implements"))
}

fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    text.match_indices(keyword).map(|(p, _)| p).find(|&p| {
        let before_ok = p == 0 || !is_ident_byte(bytes[p - 1]);
        let after = p + keyword.len();
        let after_ok = after >= bytes.len() || !is_ident_byte(bytes[after]);
        before_ok && after_ok
    })
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> HeuristicAnalyzer {
        HeuristicAnalyzer::new().unwrap()
    }

    #[test]
    fn test_mask_source_keeps_offsets() {
        let source = "a(\"x{y\"); // b.c()\n/* d.e() */ f('}');";
        let masked = mask_source(source);

        assert_eq!(masked.len(), source.len());
        assert!(!masked.contains("b.c"));
        assert!(!masked.contains("d.e"));
        assert!(!masked.contains("x{y"));
        assert_eq!(masked.matches('}').count(), 0);
        assert!(masked.contains("f(' ')"));
    }

    #[test]
    fn test_unbalanced_braces_are_a_parse_failure() {
        let result = analyzer().parse("class A { void m() { ", Path::new("A.java"));
        assert!(matches!(result, Err(CallflowError::Parser(_))));
    }

    #[test]
    fn test_scan_tells_operators_from_type_arguments() {
        let calls = analyzer().scan_invocations(
            " { if (n > limit()) { return x >> shift(); } List<String> names(); Collections.<String>emptyList(); int k = a < b && c > d(); } ",
        );
        assert_eq!(
            calls,
            vec![
                Invocation::new(Receiver::Implicit, "limit"),
                Invocation::new(Receiver::Implicit, "shift"),
                Invocation::new(Receiver::Named("Collections".to_string()), "emptyList"),
                Invocation::new(Receiver::Implicit, "d"),
            ]
        );
    }

    #[test]
    fn test_scan_skips_keywords_constructors_and_declarations() {
        let calls = analyzer().scan_invocations(
            " if (ready()) { return compute(x); } Foo f = new Foo(1); Runnable r = new Runnable() { public void run() { helper(); } }; list.add(y); ",
        );
        assert_eq!(
            calls,
            vec![
                Invocation::new(Receiver::Implicit, "ready"),
                Invocation::new(Receiver::Implicit, "compute"),
                Invocation::new(Receiver::Implicit, "helper"),
                Invocation::new(Receiver::Named("list".to_string()), "add"),
            ]
        );
    }

    #[test]
    fn test_interface_with_default_and_query_methods() {
        let source = r#"
package com.acme.dao;

public interface UserRepository extends JpaRepository<User, Long> {
    List<User> findByAgeGreaterThan(int age);

    @Query("select u from User u where u.name = ?1 and u.tags = '{}'")
    List<User> lookup(String name);

    default List<User> adults() {
        return findByAgeGreaterThan(17);
    }
}
"#;
        let unit = analyzer().parse(source, Path::new("UserRepository.java")).unwrap();
        let repo = unit.find_type("UserRepository").unwrap();

        assert!(repo.is_interface());
        assert_eq!(repo.interfaces, vec!["JpaRepository<User, Long>".to_string()]);
        assert_eq!(repo.methods.len(), 3);
        assert!(!repo.methods[0].has_body);
        assert!(repo.methods[1].has_annotation("Query"));
        let adults = repo.find_default_method("adults").unwrap();
        assert_eq!(
            adults.invocations,
            vec![Invocation::new(Receiver::Implicit, "findByAgeGreaterThan")]
        );
    }

    #[test]
    fn test_fields_with_initializers_and_nested_types() {
        let source = r#"
class Holder {
    private final int[] sizes = {1, 2, 3};
    private Runnable task = () -> { tick(); };
    private Helper a, b;

    static class Inner {
        private Other other;
    }

    void tick() {}
}
"#;
        let unit = analyzer().parse(source, Path::new("Holder.java")).unwrap();
        let holder = unit.find_type("Holder").unwrap();
        let fields: Vec<_> = holder
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();

        assert_eq!(
            fields,
            vec![("sizes", "int[]"), ("task", "Runnable"), ("a", "Helper"), ("b", "Helper")]
        );
        assert_eq!(holder.methods.len(), 1);
        assert_eq!(unit.types.len(), 1);
    }

    #[test]
    fn test_span_covers_annotations_and_body() {
        let source = "class A {\n    @Override\n    public String name() {\n        return \"a\";\n    }\n}\n";
        let unit = analyzer().parse(source, Path::new("A.java")).unwrap();
        let method = unit.find_type("A").unwrap().find_method("name").unwrap();

        let text = &source[method.span.0..method.span.1];
        assert!(text.starts_with("@Override"));
        assert!(text.ends_with('}'));
        assert_eq!(method.line_range, (2, 5));
    }
}
