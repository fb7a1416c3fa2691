//! Provenance classification and extension detection.

use std::collections::HashSet;

use crate::core::specifier::{Provenance, RawSpecifier, Specifier};

/// Node.js built-in modules importable without a prefix
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Built-ins that only exist behind the `node:` scheme
const NODE_PREFIX_ONLY: &[&str] = &["sea", "sqlite", "test", "test/reporters"];

/// Check whether `specifier` names a host platform module
pub fn is_builtin(specifier: &str) -> bool
{
    match specifier.strip_prefix("node:")
    {
        Some(rest) => NODE_BUILTINS.contains(&rest) || NODE_PREFIX_ONLY.contains(&rest),
        None => NODE_BUILTINS.contains(&specifier),
    }
}

/// Package name of a bare specifier: `lodash/fp` → `lodash`,
/// `@scope/pkg/sub` → `@scope/pkg`
fn package_name(specifier: &str) -> &str
{
    let mut cut = specifier
        .match_indices('/')
        .map(|(i, _)| i);

    let end = if specifier.starts_with('@')
    {
        cut.nth(1)
    }
    else
    {
        cut.next()
    };

    match end
    {
        Some(i) => &specifier[..i],
        None => specifier,
    }
}

/// Suffix after the last `.` of the final path segment, including the dot.
/// Trailing slashes are ignored, and dot-files (`.env`) have no extension.
pub fn detect_extension(specifier: &str) -> Option<String>
{
    let trimmed = specifier.trim_end_matches('/');
    let segment = trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed);

    // `.` and `..` never carry an extension
    if segment
        .chars()
        .all(|c| c == '.')
    {
        return None;
    }

    match segment.rfind('.')
    {
        Some(0) | None => None,
        Some(i) => Some(segment[i..].to_string()),
    }
}

/// Assigns provenance by fixed precedence against a known package list
#[derive(Debug, Clone, Default)]
pub struct Classifier
{
    packages: HashSet<String>,
}

impl Classifier
{
    /// Build a classifier from the project's dependency names
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// Provenance for a single specifier (first match wins)
    pub fn provenance(
        &self,
        specifier: &str,
    ) -> Provenance
    {
        if specifier.starts_with('/')
        {
            Provenance::Absolute
        }
        else if specifier.starts_with('.')
        {
            Provenance::Relative
        }
        else if is_builtin(specifier)
        {
            Provenance::Builtin
        }
        else if self
            .packages
            .contains(package_name(specifier))
        {
            Provenance::Package
        }
        else
        {
            Provenance::Alias
        }
    }

    /// Enrich a raw record with provenance and extension
    pub fn classify(
        &self,
        raw: RawSpecifier,
    ) -> Specifier
    {
        let provenance = self.provenance(&raw.specifier);
        let extension = detect_extension(&raw.specifier);

        Specifier { source: raw.source, specifier: raw.specifier, provenance, extension }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn precedence_matrix()
    {
        let c = Classifier::new(["react", "/abs/path", "@scope/ui", "lodash"]);

        // Absolute check runs before the package list
        assert_eq!(c.provenance("/abs/path"), Provenance::Absolute);
        assert_eq!(c.provenance("./components/Foo"), Provenance::Relative);
        assert_eq!(c.provenance("../up"), Provenance::Relative);
        assert_eq!(c.provenance("node:fs"), Provenance::Builtin);
        assert_eq!(c.provenance("fs/promises"), Provenance::Builtin);
        assert_eq!(c.provenance("react"), Provenance::Package);
        assert_eq!(c.provenance("lodash/fp"), Provenance::Package);
        assert_eq!(c.provenance("@scope/ui/button"), Provenance::Package);
        assert_eq!(c.provenance("@/components/Button"), Provenance::Alias);
        assert_eq!(c.provenance("typescript-eslint"), Provenance::Alias);
    }

    #[test]
    fn builtin_detection()
    {
        assert!(is_builtin("path"));
        assert!(is_builtin("node:path"));
        assert!(is_builtin("node:test"));
        assert!(!is_builtin("test"));
        assert!(!is_builtin("node:nope"));
        assert!(!is_builtin("react"));
    }

    #[test]
    fn package_name_handles_scopes()
    {
        assert_eq!(package_name("react"), "react");
        assert_eq!(package_name("react-dom/client"), "react-dom");
        assert_eq!(package_name("@scope/pkg"), "@scope/pkg");
        assert_eq!(package_name("@scope/pkg/deep/path"), "@scope/pkg");
    }

    #[test]
    fn extension_uses_final_segment_only()
    {
        assert_eq!(detect_extension("./js.ts").as_deref(), Some(".ts"));
        assert_eq!(detect_extension("./components/Foo.js").as_deref(), Some(".js"));
        assert_eq!(detect_extension("./v1.2/module"), None);
        assert_eq!(detect_extension("../lib.d/index"), None);
        assert_eq!(detect_extension("./foo/"), None);
        assert_eq!(detect_extension("./.env"), None);
        assert_eq!(detect_extension(".."), None);
        assert_eq!(detect_extension("react"), None);
        assert_eq!(detect_extension("./types.d.ts").as_deref(), Some(".ts"));
    }

    #[test]
    fn classify_keeps_source_and_literal()
    {
        let c = Classifier::default();
        let raw = RawSpecifier::new("import * as js from './js.ts'", "./js.ts").unwrap();

        let s = c.classify(raw);

        assert_eq!(s.source, "import * as js from './js.ts'");
        assert_eq!(s.specifier, "./js.ts");
        assert_eq!(s.provenance, Provenance::Relative);
        assert_eq!(s.extension.as_deref(), Some(".ts"));
    }
}
