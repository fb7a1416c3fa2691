//! Path-alias table and longest-prefix resolution.
//!
//! Keys and targets are stored with trailing `*` wildcards removed, so
//! `"@/*": ["src/*"]` becomes `"@/" → ["src/"]`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Ordered alias prefix → candidate targets, anchored at `base_dir`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap
{
    /// Directory that relative targets are resolved against
    base_dir: PathBuf,

    /// Prefix → targets, insertion order preserved
    entries: IndexMap<String, Vec<String>>,
}

impl AliasMap
{
    pub fn new(base_dir: impl Into<PathBuf>) -> Self
    {
        Self { base_dir: base_dir.into(), entries: IndexMap::new() }
    }

    /// Register (or replace) one alias, stripping wildcards
    pub fn insert<I, S>(
        &mut self,
        alias: &str,
        targets: I,
    ) where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = targets
            .into_iter()
            .map(|t| strip_wildcard(t.as_ref()).to_string())
            .collect();

        self.entries
            .insert(strip_wildcard(alias).to_string(), targets);
    }

    /// Builder-style `insert`
    pub fn with<I, S>(
        mut self,
        alias: &str,
        targets: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(alias, targets);
        self
    }

    pub fn base_dir(&self) -> &Path
    {
        &self.base_dir
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries
            .is_empty()
    }

    /// Iterate `(prefix, targets)` in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])>
    {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Resolve `specifier` through the longest matching prefix.
    /// Returns a lexically normalized path relative to `base_dir`
    /// (or absolute when the target is), or `None` when unresolved.
    /// Only the first target of the matched alias is used.
    pub fn resolve(
        &self,
        specifier: &str,
    ) -> Option<String>
    {
        let (alias, targets) = self
            .entries
            .iter()
            .filter(|(alias, _)| specifier.starts_with(alias.as_str()))
            .max_by_key(|(alias, _)| alias.len())?;

        let target = targets
            .first()
            .filter(|t| !t.is_empty())?;

        let remainder = &specifier[alias.len()..];
        let resolved = normalize(&join(target, remainder));

        tracing::debug!(specifier, alias = alias.as_str(), resolved, "resolved alias");

        Some(resolved)
    }

    /// Absolute filesystem location of a resolved alias path
    pub fn locate(
        &self,
        resolved: &str,
    ) -> PathBuf
    {
        self.base_dir
            .join(resolved)
    }
}

fn strip_wildcard(s: &str) -> &str
{
    s.strip_suffix('*')
        .unwrap_or(s)
}

/// Join two `/`-separated fragments with exactly one separator
fn join(
    target: &str,
    remainder: &str,
) -> String
{
    match (target.is_empty(), remainder.is_empty())
    {
        (true, _) => remainder.to_string(),
        (_, true) => target.to_string(),
        _ => format!(
            "{}/{}",
            target.trim_end_matches('/'),
            remainder.trim_start_matches('/')
        ),
    }
}

/// Lexical normalization of a `/`-separated path: drops `.` and empty
/// segments, folds `..` against earlier segments, keeps a leading `/`
/// and a trailing `/`. No filesystem access.
pub fn normalize(path: &str) -> String
{
    let absolute = path.starts_with('/');
    let trailing = path.len() > 1 && path.ends_with('/');

    let mut parts: Vec<&str> = Vec::new();

    for seg in path.split('/')
    {
        match seg
        {
            "" | "." => {}
            ".." =>
            {
                match parts.last()
                {
                    Some(&last) if last != ".." =>
                    {
                        parts.pop();
                    }
                    // Cannot climb above the root
                    _ if absolute => {}
                    _ => parts.push(".."),
                }
            }
            other => parts.push(other),
        }
    }

    let mut out = parts.join("/");

    if absolute
    {
        out.insert(0, '/');
    }
    else if out.is_empty()
    {
        out.push('.');
    }

    if trailing && !out.ends_with('/')
    {
        out.push('/');
    }

    out
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn sample() -> AliasMap
    {
        AliasMap::new("/project")
            .with("@/*", ["./src/*"])
            .with("@/components/*", ["./lib/ui/*"])
            .with("components/*", ["src/components/*"])
            .with("empty/*", Vec::<String>::new())
    }

    #[test]
    fn wildcards_are_stripped_on_insert()
    {
        let map = sample();
        let entries: Vec<_> = map
            .iter()
            .collect();

        assert_eq!(entries[0].0, "@/");
        assert_eq!(entries[0].1, ["./src/".to_string()]);
        assert_eq!(entries[1].0, "@/components/");
    }

    #[test]
    fn longest_prefix_wins()
    {
        let map = sample();

        assert_eq!(map.resolve("@/components/Button").as_deref(), Some("lib/ui/Button"));
        assert_eq!(map.resolve("@/utils/format").as_deref(), Some("src/utils/format"));
    }

    #[test]
    fn unresolved_cases()
    {
        let map = sample();

        assert_eq!(map.resolve("lodash"), None);
        assert_eq!(map.resolve("empty/thing"), None);
        assert_eq!(AliasMap::default().resolve("@/x"), None);
    }

    #[test]
    fn resolution_is_normalized()
    {
        let map = AliasMap::new("/p").with("~/*", ["./src/./nested/../*"]);

        assert_eq!(map.resolve("~/a/../b").as_deref(), Some("src/b"));
        assert_eq!(map.resolve("~/dir/").as_deref(), Some("src/dir/"));
    }

    #[test]
    fn normalize_matrix()
    {
        assert_eq!(normalize("./src/a"), "src/a");
        assert_eq!(normalize("src//a/./b"), "src/a/b");
        assert_eq!(normalize("../x/../y"), "../y");
        assert_eq!(normalize("/a/../../b"), "/b");
        assert_eq!(normalize("a/"), "a/");
        assert_eq!(normalize("./"), "./");
        assert_eq!(normalize("."), ".");
    }

    #[test]
    fn locate_joins_base_dir()
    {
        let map = sample();

        assert_eq!(map.locate("src/a"), PathBuf::from("/project/src/a"));
    }
}
