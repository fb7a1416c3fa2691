//! Filepath: src/core/rewrite.rs
//! Rewrite engine: decides the corrected form of each classified specifier
//! and splices it back into the text.
//!
//! - Relative/absolute paths get the runtime suffix, a `.ts` → `.js` swap,
//!   or an `/index.js` completion for directories; the result must exist.
//! - Aliases are resolved through the alias table to a relative path first.
//! - Builtins and packages are left alone.
//!
//! Substitution is quote-aware and cursor-driven: each record is located by
//! its statement text at or after the previous record, and only the quoted
//! literal inside that statement is replaced.

use std::ops::Range;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::alias::AliasMap;
use crate::core::classify::detect_extension;
use crate::core::specifier::{Provenance, Specifier};

/// Filesystem capability injected into the engine.
/// Errors must be reported as `false`.
pub trait FsProbe: Send + Sync
{
    /// Path exists (file or directory)
    fn exists(
        &self,
        path: &Path,
    ) -> bool;

    /// Path exists and is a directory
    fn is_dir(
        &self,
        path: &Path,
    ) -> bool;
}

/// Suffix vocabulary: authored, runtime, and index file stem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suffixes
{
    /// Authored-language suffix swapped away (`.ts`)
    pub source: String,

    /// Suffix the runtime loader requires (`.js`)
    pub runtime: String,

    /// Directory entry file stem (`index`)
    pub index: String,
}

impl Default for Suffixes
{
    fn default() -> Self
    {
        Self { source: ".ts".to_string(), runtime: ".js".to_string(), index: "index".to_string() }
    }
}

/// Per-record result, in extraction order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome
{
    /// Literal replaced in the text
    Rewritten
    {
        from: String,
        to: String,
    },

    /// Already in its runtime form
    Unchanged
    {
        specifier: String,
    },

    /// Builtin/package, or alias with no alias table configured
    Skipped
    {
        specifier: String,
        provenance: Provenance,
    },

    /// No alias prefix matched, or the alias has no targets
    UnresolvedAlias
    {
        specifier: String,
    },

    /// Corrected target not found on disk
    Missing
    {
        specifier: String,
        path: PathBuf,
    },

    /// Quoted literal not found in the remaining text
    NotLocated
    {
        specifier: String,
    },
}

/// Corrected text plus one outcome per record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite
{
    pub text: String,
    pub outcomes: Vec<Outcome>,
}

impl Rewrite
{
    /// Number of literals actually replaced
    pub fn rewritten(&self) -> usize
    {
        self.count(|o| matches!(o, Outcome::Rewritten { .. }))
    }

    pub fn missing(&self) -> usize
    {
        self.count(|o| matches!(o, Outcome::Missing { .. }))
    }

    pub fn unresolved(&self) -> usize
    {
        self.count(|o| matches!(o, Outcome::UnresolvedAlias { .. }))
    }

    fn count(
        &self,
        pred: impl Fn(&Outcome) -> bool,
    ) -> usize
    {
        self.outcomes
            .iter()
            .filter(|o| pred(o))
            .count()
    }
}

/// Decision for one record before it is located in the text
enum Plan
{
    Replace(String),
    Keep(Outcome),
}

pub struct RewriteEngine<'a>
{
    probe: &'a dyn FsProbe,
    suffixes: &'a Suffixes,
    aliases: Option<&'a AliasMap>,
}

impl<'a> RewriteEngine<'a>
{
    pub fn new(
        probe: &'a dyn FsProbe,
        suffixes: &'a Suffixes,
    ) -> Self
    {
        Self { probe, suffixes, aliases: None }
    }

    /// Enable alias rewriting
    pub fn with_aliases(
        mut self,
        aliases: Option<&'a AliasMap>,
    ) -> Self
    {
        self.aliases = aliases;
        self
    }

    /// Rewrite every record of `text`; `dir` is the file's directory.
    /// Each record threads the current text into the next one, so a failed
    /// record never affects the others.
    pub fn rewrite(
        &self,
        text: &str,
        records: &[Specifier],
        dir: &Path,
    ) -> Rewrite
    {
        let mut current = text.to_string();
        let mut cursor = 0;
        let mut outcomes = Vec::with_capacity(records.len());

        for record in records
        {
            let plan = self.plan(record, dir);
            let quote = record.quote();

            // Locate even when keeping, so duplicates map to their own occurrence
            let Some(span) = locate(&current, cursor, record, quote)
            else
            {
                debug!(specifier = %record.specifier, "literal not located in remaining text");
                outcomes.push(match plan
                {
                    Plan::Replace(_) => Outcome::NotLocated { specifier: record.specifier.clone() },
                    Plan::Keep(outcome) => outcome,
                });
                continue;
            };

            match plan
            {
                Plan::Replace(corrected) =>
                {
                    let quoted = format!("{quote}{corrected}{quote}");
                    cursor = span.start + quoted.len();
                    current = splice(&current, span, &quoted);

                    debug!(from = %record.specifier, to = %corrected, "rewrote specifier");
                    outcomes.push(Outcome::Rewritten { from: record.specifier.clone(), to: corrected });
                }
                Plan::Keep(outcome) =>
                {
                    cursor = span.end;
                    outcomes.push(outcome);
                }
            }
        }

        Rewrite { text: current, outcomes }
    }

    fn plan(
        &self,
        record: &Specifier,
        dir: &Path,
    ) -> Plan
    {
        if record.is_path()
        {
            return self.plan_path(record, dir);
        }

        match record.provenance
        {
            Provenance::Alias => self.plan_alias(record, dir),
            provenance => Plan::Keep(Outcome::Skipped {
                specifier: record
                    .specifier
                    .clone(),
                provenance,
            }),
        }
    }

    fn plan_path(
        &self,
        record: &Specifier,
        dir: &Path,
    ) -> Plan
    {
        let spec = &record.specifier;

        let Some(corrected) = self.suffix_form(spec, record.extension.as_deref(), dir)
        else
        {
            let path = resolve_path(dir, spec);
            warn!("Not modified! Unable to determine path of imported module: {spec}");
            return Plan::Keep(Outcome::Missing { specifier: spec.clone(), path });
        };

        if &corrected == spec
        {
            return Plan::Keep(Outcome::Unchanged { specifier: spec.clone() });
        }

        // Never commit a specifier that would not resolve
        let target = resolve_path(dir, &corrected);
        if !self
            .probe
            .exists(&target)
        {
            warn!("Unable to find file at import path: {}", target.display());
            return Plan::Keep(Outcome::Missing { specifier: spec.clone(), path: target });
        }

        Plan::Replace(corrected)
    }

    fn plan_alias(
        &self,
        record: &Specifier,
        dir: &Path,
    ) -> Plan
    {
        let spec = &record.specifier;

        let Some(aliases) = self.aliases
        else
        {
            return Plan::Keep(Outcome::Skipped { specifier: spec.clone(), provenance: Provenance::Alias });
        };

        let Some(resolved) = aliases.resolve(spec)
        else
        {
            debug!(specifier = %spec, "no alias matched");
            return Plan::Keep(Outcome::UnresolvedAlias { specifier: spec.clone() });
        };

        let relative = relative_specifier(&aliases.locate(&resolved), dir, resolved.ends_with('/'));
        let extension = detect_extension(&relative);

        match self.suffix_form(&relative, extension.as_deref(), dir)
        {
            Some(corrected) =>
            {
                let target = resolve_path(dir, &corrected);
                if !self
                    .probe
                    .exists(&target)
                {
                    warn!("Unable to find file at import path: {}", target.display());
                    return Plan::Keep(Outcome::Missing { specifier: spec.clone(), path: target });
                }
                Plan::Replace(corrected)
            }
            None =>
            {
                let path = resolve_path(dir, &relative);
                warn!("Not modified! Unable to determine path of imported module: {spec}");
                Plan::Keep(Outcome::Missing { specifier: spec.clone(), path })
            }
        }
    }

    /// File-vs-directory suffix logic. `None` when the specifier names a
    /// directory (trailing `/`) that does not exist.
    fn suffix_form(
        &self,
        spec: &str,
        extension: Option<&str>,
        dir: &Path,
    ) -> Option<String>
    {
        let Suffixes { source, runtime, index } = self.suffixes;

        if spec.ends_with('/')
        {
            return self
                .probe
                .is_dir(&resolve_path(dir, spec))
                .then(|| format!("{spec}{index}{runtime}"));
        }

        match extension
        {
            Some(ext) if ext == source => spec
                .strip_suffix(ext)
                .map(|stem| format!("{stem}{runtime}")),
            Some(ext) if ext == runtime => Some(spec.to_string()),
            _ =>
            {
                let target = resolve_path(dir, spec);

                if self
                    .probe
                    .is_dir(&target)
                {
                    Some(format!("{spec}/{index}{runtime}"))
                }
                else if extension.is_some()
                    && self
                        .probe
                        .exists(&target)
                {
                    // Some other real file, e.g. `./data.json`
                    Some(spec.to_string())
                }
                else
                {
                    Some(format!("{spec}{runtime}"))
                }
            }
        }
    }
}

/// Join `spec` onto `dir` and fold `.`/`..` lexically
pub fn resolve_path(
    dir: &Path,
    spec: &str,
) -> PathBuf
{
    let mut out = PathBuf::new();

    for component in dir
        .join(spec)
        .components()
    {
        match component
        {
            Component::CurDir => {}
            Component::ParentDir =>
            {
                if !out.pop()
                {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Express `target` relative to `dir` as an import specifier
fn relative_specifier(
    target: &Path,
    dir: &Path,
    trailing_slash: bool,
) -> String
{
    let target = resolve_path(&absolute(target), "");
    let dir = resolve_path(&absolute(dir), "");

    let rel = pathdiff::diff_paths(&target, &dir).unwrap_or(target);
    let mut out = rel
        .to_string_lossy()
        .replace('\\', "/");

    let marked = out == ".."
        || out.starts_with("./")
        || out.starts_with("../")
        || out.starts_with('/');

    if out.is_empty()
    {
        out.push('.');
    }
    else if !marked
    {
        out.insert_str(0, "./");
    }

    if trailing_slash && !out.ends_with('/')
    {
        out.push('/');
    }

    out
}

fn absolute(path: &Path) -> PathBuf
{
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Span of the record's quoted literal at or after `cursor`.
/// The statement text anchors the search; a bare literal search is the
/// fallback when the statement cannot be found.
fn locate(
    text: &str,
    cursor: usize,
    record: &Specifier,
    quote: char,
) -> Option<Range<usize>>
{
    let needle = format!("{quote}{}{quote}", record.specifier);
    let tail = text.get(cursor..)?;

    if let Some(at) = tail.find(record.source.as_str())
    {
        let start = cursor + at;
        let statement = &text[start..start + record.source.len()];

        if let Some(offset) = statement.find(&needle)
        {
            let begin = start + offset;
            return Some(begin..begin + needle.len());
        }
    }

    tail.find(&needle)
        .map(|at| cursor + at..cursor + at + needle.len())
}

fn splice(
    text: &str,
    span: Range<usize>,
    replacement: &str,
) -> String
{
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..span.start]);
    out.push_str(replacement);
    out.push_str(&text[span.end..]);
    out
}
