//! Filepath: src/infra/walk.rs
//! Candidate file enumeration for a build directory.
//! - Include glob (`*.{js,ts}` by default); matched against the base name
//!   when the pattern has no `/`, otherwise against the root-relative path
//! - Extra ignore globs (early prune + late filter)
//! - Hidden files skipped unless asked for
//! - `.gitignore` not consulted by default, since build output is usually
//!   ignored by the very project that produced it
//! - Deterministic ordering for stable tests/CI
//!
//! Backed by ripgrep's `ignore` crate and `globset`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

/// Include-glob walker with extra ignore globs and filters.
/// Extra ignores are applied in two places:
///   1) Early: prune directories during traversal (filter_entry).
///   2) Late: filter out files that still slipped through.
pub struct FileWalker
{
    /// Files must match this to be yielded
    include: Option<GlobMatcher>,

    /// Whether `include` is tested against the base name only
    include_basename: bool,

    /// Compiled set of additional ignore patterns
    ignore_patterns: GlobSet,

    /// Include hidden (dot) files; default false
    include_hidden: bool,

    /// Honor .gitignore/.ignore files; default false
    respect_gitignore: bool,
}

impl FileWalker
{
    /// Build a walker with additional ignore patterns (e.g.
    /// "**/node_modules/**"). Patterns match on root-relative paths.
    pub fn new(additional_ignores: &[String]) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in additional_ignores
        {
            builder.add(
                Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {pattern}"))?,
            );
        }

        Ok(Self {
            include: None,
            include_basename: false,
            ignore_patterns: builder.build()?,
            include_hidden: false,
            respect_gitignore: false,
        })
    }

    /// Only yield files matching `pattern`
    pub fn with_include(
        mut self,
        pattern: &str,
    ) -> Result<Self>
    {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid file pattern: {pattern}"))?;

        self.include = Some(glob.compile_matcher());
        self.include_basename = !pattern.contains('/');

        Ok(self)
    }

    /// (Optional) Include or exclude hidden files (dotfiles).
    pub fn with_include_hidden(
        mut self,
        include_hidden: bool,
    ) -> Self
    {
        self.include_hidden = include_hidden;
        self
    }

    /// (Optional) Honor ignore files found along the walk.
    pub fn with_gitignore(
        mut self,
        respect: bool,
    ) -> Self
    {
        self.respect_gitignore = respect;
        self
    }

    /// Internal: construct a configured WalkBuilder for `root`.
    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        // WalkBuilder::hidden(true) => *skip* dotfiles
        b.hidden(!self.include_hidden);

        b.ignore(self.respect_gitignore);
        b.git_ignore(self.respect_gitignore);
        b.git_global(self.respect_gitignore);
        b.git_exclude(self.respect_gitignore);
        b.parents(self.respect_gitignore);
        b.require_git(false);

        // Early directory pruning using extra ignores
        let extra = self
            .ignore_patterns
            .clone();
        let base = root.to_path_buf();
        b.filter_entry(move |ent: &DirEntry| {
            let is_dir = ent
                .file_type()
                .map(|ft| ft.is_dir())
                .unwrap_or(false);

            if !is_dir
            {
                return true;
            }

            let rel = ent
                .path()
                .strip_prefix(&base)
                .unwrap_or(ent.path());

            // `dir/**` style globs need a child to match against
            !(extra.is_match(rel) || extra.is_match(rel.join("_")))
        });

        b
    }

    fn included(
        &self,
        rel: &Path,
    ) -> bool
    {
        let Some(matcher) = &self.include
        else
        {
            return true;
        };

        if self.include_basename
        {
            rel.file_name()
                .is_some_and(|name| matcher.is_match(name))
        }
        else
        {
            matcher.is_match(rel)
        }
    }

    /// Traverse files under `root`, respecting include and ignore globs.
    /// Returns a **sorted** list of file paths for determinism.
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Vec<PathBuf>
    {
        let root_path = root.as_ref();
        let walker = self
            .build_walk(root_path)
            .build();

        let mut out: Vec<PathBuf> = walker
            .filter_map(|res| match res
            {
                Ok(entry) => Some(entry),
                Err(err) =>
                {
                    tracing::warn!("walk error: {err}");
                    None
                }
            })
            // Keep only regular files
            .filter(|entry| {
                entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file())
            })
            .map(|entry| entry.into_path())
            // Late include/ignore filtering using RELATIVE path
            .filter(|abs| {
                let rel = abs
                    .strip_prefix(root_path)
                    .unwrap_or(abs);
                self.included(rel)
                    && !self
                        .ignore_patterns
                        .is_match(rel)
            })
            .collect();

        // Deterministic order (stable CLI & tests)
        out.sort();

        out
    }
}
