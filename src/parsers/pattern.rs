//! Filepath: src/parsers/pattern.rs
//! Regex-driven specifier scanning.
//!
//! Fast and grammar-free, but text inside comments or strings that happens
//! to look like an import statement is picked up as well.

use regex::{Captures, Regex};

use crate::core::extract::{ExtractError, SpecifierExtractor};
use crate::core::specifier::RawSpecifier;

// Statement shapes, each ending at (or just past) the module literal.
const STATEMENT_PATTERN: &str = r#"(?x)
    # dynamic import("...") with an optional second argument
    \bimport\s*\(\s*(?:'[^'\n]*'|"[^"\n]*")\s*[,)]
  | # import [type] [default,] {names} | * as ns | default  from "..."
    \bimport\s+(?:type\s+)?(?:[\w$]+\s*,\s*)?
        (?:\{[^{}]*\}|\*\s*as\s+[\w$]+|[\w$]+)
        \s*from\s*(?:'[^'\n]*'|"[^"\n]*")
  | # side-effect import "..."
    \bimport\s*(?:'[^'\n]*'|"[^"\n]*")
  | # export [type] {names} | * [as ns]  from "..."
    \bexport\s+(?:type\s+)?
        (?:\{[^{}]*\}|\*(?:\s*as\s+[\w$]+)?)
        \s*from\s*(?:'[^'\n]*'|"[^"\n]*")
"#;

// Literal at the end of a static statement
const STATIC_LITERAL: &str = r#"(?:'(?P<single>[^'\n]*)'|"(?P<double>[^"\n]*)")\s*$"#;

// Literal as first argument of a dynamic import
const DYNAMIC_LITERAL: &str = r#"\bimport\s*\(\s*(?:'(?P<single>[^'\n]*)'|"(?P<double>[^"\n]*)")"#;

pub struct PatternExtractor {
    statement: Regex,
    static_literal: Regex,
    dynamic_literal: Regex,
}

impl PatternExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        let compile =
            |src: &str| Regex::new(src).map_err(|e| ExtractError::Setup(e.to_string()));

        Ok(Self {
            statement: compile(STATEMENT_PATTERN)?,
            static_literal: compile(STATIC_LITERAL)?,
            dynamic_literal: compile(DYNAMIC_LITERAL)?,
        })
    }

    /// Pull the literal out of one matched statement: the `from "..."`
    /// or bare form first, then the dynamic-import form.
    fn literal_of<'t>(&self, statement: &'t str) -> Option<&'t str> {
        self.static_literal
            .captures(statement)
            .or_else(|| self.dynamic_literal.captures(statement))
            .and_then(|caps| quoted_group(&caps))
    }
}

fn quoted_group<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("single")
        .or_else(|| caps.name("double"))
        .map(|m| m.as_str())
}

impl SpecifierExtractor for PatternExtractor {
    fn extract_raw(&self, content: &str) -> Result<Vec<RawSpecifier>, ExtractError> {
        let out = self
            .statement
            .find_iter(content)
            .filter_map(|m| {
                let statement = m.as_str();
                let literal = self.literal_of(statement)?;
                RawSpecifier::new(statement, literal)
            })
            .collect::<Vec<_>>();

        tracing::trace!(count = out.len(), "pattern scan complete");

        Ok(out)
    }
}
