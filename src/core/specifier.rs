//! Specifier records shared by every stage of the pipeline.
//!
//! A record is produced once by an extractor, classified once, and then
//! only read by the rewrite engine.

use serde::{Deserialize, Serialize};

/// Raw `(source, specifier)` pair as yielded by an extraction strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpecifier
{
    /// Statement text that produced this record (scanning anchor)
    pub source: String,

    /// Module literal without quotes
    pub specifier: String,
}

impl RawSpecifier
{
    /// Build a raw record, discarding empty literals
    pub fn new(
        source: impl Into<String>,
        specifier: impl Into<String>,
    ) -> Option<Self>
    {
        let specifier = specifier.into();

        if specifier.is_empty()
        {
            return None;
        }

        Some(Self { source: source.into(), specifier })
    }
}

/// Structural category of a specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance
{
    /// Starts with `/`
    Absolute,

    /// Starts with `.`
    Relative,

    /// Host platform module (`fs`, `node:path`, ...)
    Builtin,

    /// Listed project dependency
    Package,

    /// Anything else, candidate for alias resolution
    Alias,
}

impl std::fmt::Display for Provenance
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        match self
        {
            Provenance::Absolute => write!(f, "absolute"),
            Provenance::Relative => write!(f, "relative"),
            Provenance::Builtin => write!(f, "builtin"),
            Provenance::Package => write!(f, "package"),
            Provenance::Alias => write!(f, "alias"),
        }
    }
}

/// Classified import/export/dynamic-import occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specifier
{
    /// Statement text that produced this record
    pub source: String,

    /// Module literal without quotes (never empty)
    pub specifier: String,

    /// Provenance category
    pub provenance: Provenance,

    /// Final-segment suffix including the dot, e.g. `.ts`
    pub extension: Option<String>,
}

impl Specifier
{
    /// Whether the rewrite engine treats this as a filesystem path
    pub fn is_path(&self) -> bool
    {
        matches!(self.provenance, Provenance::Absolute | Provenance::Relative)
    }

    /// Quote character used around the literal inside `source`.
    /// Picks whichever quoted form occurs first; defaults to `"`.
    pub fn quote(&self) -> char
    {
        let single = self
            .source
            .find(&format!("'{}'", self.specifier));
        let double = self
            .source
            .find(&format!("\"{}\"", self.specifier));

        match (single, double)
        {
            (Some(s), Some(d)) if s < d => '\'',
            (Some(_), None) => '\'',
            _ => '"',
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn record(
        source: &str,
        specifier: &str,
    ) -> Specifier
    {
        Specifier {
            source: source.to_string(),
            specifier: specifier.to_string(),
            provenance: Provenance::Relative,
            extension: None,
        }
    }

    #[test]
    fn empty_literals_are_discarded()
    {
        assert!(RawSpecifier::new("import x from ''", "").is_none());
        assert!(RawSpecifier::new("import x from './a'", "./a").is_some());
    }

    #[test]
    fn only_absolute_and_relative_are_paths()
    {
        let mut rec = record("import a from './a'", "./a");
        assert!(rec.is_path());

        rec.provenance = Provenance::Absolute;
        assert!(rec.is_path());

        for provenance in [Provenance::Alias, Provenance::Builtin, Provenance::Package]
        {
            rec.provenance = provenance;
            assert!(!rec.is_path());
        }
    }

    #[test]
    fn quote_follows_the_source_statement()
    {
        assert_eq!(record("import a from './a'", "./a").quote(), '\'');
        assert_eq!(record("import a from \"./a\"", "./a").quote(), '"');

        // An apostrophe elsewhere in the statement does not flip the quote
        assert_eq!(record("import { \"it's\" as a } from \"./a\"", "./a").quote(), '"');
    }

    #[test]
    fn provenance_display_is_lowercase()
    {
        assert_eq!(Provenance::Alias.to_string(), "alias");
        assert_eq!(Provenance::Builtin.to_string(), "builtin");
    }
}
