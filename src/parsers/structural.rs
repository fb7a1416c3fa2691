//! Filepath: src/parsers/structural.rs
//! Tree-sitter backed specifier extraction for JavaScript and TypeScript.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator};

use crate::core::extract::{ExtractError, SpecifierExtractor};
use crate::core::specifier::RawSpecifier;

// Import declarations, re-exports and `import("...")` calls whose first
// argument is a plain string literal. Shared by both grammars.
const SPECIFIER_QUERY: &str = r#"
    (import_statement source: (string) @literal) @statement

    (export_statement source: (string) @literal) @statement

    (call_expression
      function: (import)
      arguments: (arguments . (string) @literal)) @statement
"#;

/// Grammar flavor picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Grammar {
    /// `.js/.mjs/.cjs/.jsx` → JavaScript, `.tsx` → TSX, otherwise TypeScript
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("js" | "mjs" | "cjs" | "jsx") => Self::JavaScript,
            Some("tsx") => Self::Tsx,
            _ => Self::TypeScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

pub struct StructuralExtractor {
    language: Language,
    query: Query,
}

impl StructuralExtractor {
    pub fn new(grammar: Grammar) -> Result<Self, ExtractError> {
        let language = grammar.language();
        let query = Query::new(&language, SPECIFIER_QUERY)
            .map_err(|e| ExtractError::Setup(format!("{grammar:?} specifier query: {e}")))?;

        Ok(Self { language, query })
    }

    pub fn for_path(path: &Path) -> Result<Self, ExtractError> {
        Self::new(Grammar::from_path(path))
    }
}

impl SpecifierExtractor for StructuralExtractor {
    fn extract_raw(&self, content: &str) -> Result<Vec<RawSpecifier>, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Setup(e.to_string()))?;

        let tree = parser.parse(content, None).ok_or(ExtractError::NoTree)?;
        let root = tree.root_node();

        // Fail fast: a partially understood file is not rewritten
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let pos = bad.start_position();
            return Err(ExtractError::Syntax {
                line: pos.row + 1,
                column: pos.column + 1,
            });
        }

        let bytes = content.as_bytes();
        let statement_idx = self.query.capture_index_for_name("statement");
        let literal_idx = self.query.capture_index_for_name("literal");

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, root, bytes);

        let mut found: Vec<(usize, RawSpecifier)> = Vec::new();

        while let Some(m) = matches.next() {
            let pick = |idx: Option<u32>| {
                idx.and_then(|i| m.captures.iter().find(|c| c.index == i))
                    .map(|c| c.node)
            };

            let (Some(statement), Some(literal)) = (pick(statement_idx), pick(literal_idx))
            else {
                continue;
            };

            let (Ok(source), Some(specifier)) =
                (statement.utf8_text(bytes), string_value(literal, bytes))
            else {
                continue;
            };

            if let Some(raw) = RawSpecifier::new(source, specifier) {
                found.push((statement.start_byte(), raw));
            }
        }

        // Depth-first document order regardless of pattern index
        found.sort_by_key(|(start, _)| *start);

        Ok(found.into_iter().map(|(_, raw)| raw).collect())
    }
}

/// Text between the quotes of a `string` node
fn string_value<'a>(node: Node, bytes: &'a [u8]) -> Option<&'a str> {
    let text = node.utf8_text(bytes).ok()?;

    // Both quote characters are one byte wide
    if text.len() < 2 {
        return None;
    }

    text.get(1..text.len() - 1)
}

/// Pre-order search for the first ERROR or MISSING node
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut walk = node.walk();
    for child in node.children(&mut walk) {
        if child.has_error() {
            if let Some(hit) = first_error(child) {
                return Some(hit);
            }
        }
    }

    None
}
