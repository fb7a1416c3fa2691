//! Extraction strategies behind a single trait, selected by mode.
//!
//! Both strategies yield raw `(source, specifier)` pairs; classification is
//! applied here so downstream stages never see which strategy ran.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::classify::Classifier;
use crate::core::specifier::{RawSpecifier, Specifier};
use crate::parsers::{PatternExtractor, StructuralExtractor};

/// Caller-selected extraction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode
{
    /// Regular-expression scanning over raw text
    #[default]
    #[serde(alias = "regex")]
    Pattern,

    /// Syntax-tree traversal with tree-sitter
    #[serde(alias = "ast")]
    Structural,
}

impl std::fmt::Display for ExtractionMode
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            ExtractionMode::Pattern => write!(f, "pattern"),
            ExtractionMode::Structural => write!(f, "structural"),
        }
    }
}

/// Extraction failures
#[derive(Debug, thiserror::Error)]
pub enum ExtractError
{
    /// Grammar or query could not be set up
    #[error("extractor setup failed: {0}")]
    Setup(String),

    /// Tree construction failed outright
    #[error("parser produced no syntax tree")]
    NoTree,

    /// Tree contains error nodes
    #[error("syntax error at line {line}, column {column}")]
    Syntax
    {
        line: usize,
        column: usize,
    },
}

pub trait SpecifierExtractor: Send + Sync
{
    /// Yield raw specifiers in order of first appearance, duplicates kept
    fn extract_raw(
        &self,
        content: &str,
    ) -> Result<Vec<RawSpecifier>, ExtractError>;

    /// Extract and classify in one pass
    fn extract(
        &self,
        content: &str,
        classifier: &Classifier,
    ) -> Result<Vec<Specifier>, ExtractError>
    {
        Ok(self
            .extract_raw(content)?
            .into_iter()
            .map(|raw| classifier.classify(raw))
            .collect())
    }
}

/// Extractor registry; `path` picks the grammar in structural mode
pub fn get_extractor(
    mode: ExtractionMode,
    path: &Path,
) -> Result<Box<dyn SpecifierExtractor>, ExtractError>
{
    match mode
    {
        ExtractionMode::Pattern => Ok(Box::new(PatternExtractor::new()?)),
        ExtractionMode::Structural => Ok(Box::new(StructuralExtractor::for_path(path)?)),
    }
}
