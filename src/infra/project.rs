//! Filepath: src/infra/project.rs
//! Project metadata: `package.json` dependency names and the effective
//! `tsconfig.json` (extends chain, outDir, path aliases).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::alias::AliasMap;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PackageManifest {
    dependencies: IndexMap<String, Value>,
    dev_dependencies: IndexMap<String, Value>,
    peer_dependencies: IndexMap<String, Value>,
    optional_dependencies: IndexMap<String, Value>,
}

/// Every declared dependency name of `project_dir/package.json`, in
/// declaration order. A missing or malformed manifest yields an empty list.
pub fn package_dependencies(project_dir: &Path) -> Vec<String> {
    let path = project_dir.join("package.json");

    let manifest = match std::fs::read_to_string(&path) {
        Ok(text) => match serde_json::from_str::<PackageManifest>(&text) {
            Ok(m) => m,
            Err(e) => {
                warn!("Ignoring malformed {}: {e}", path.display());
                return Vec::new();
            }
        },
        Err(e) => {
            warn!("Unable to read {}: {e}", path.display());
            return Vec::new();
        }
    };

    let names: IndexSet<String> = [
        manifest.dependencies,
        manifest.dev_dependencies,
        manifest.peer_dependencies,
        manifest.optional_dependencies,
    ]
    .into_iter()
    .flat_map(|table| table.into_keys())
    .collect();

    names.into_iter().collect()
}

/// Nearest `tsconfig.json` at or above `start`
pub fn find_tsconfig(start: &Path) -> Option<PathBuf> {
    let mut current = start
        .canonicalize()
        .ok()
        .unwrap_or_else(|| start.to_path_buf());

    loop {
        let candidate = current.join("tsconfig.json");
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTsConfig {
    extends: Option<Extends>,
    #[serde(rename = "compilerOptions")]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCompilerOptions {
    out_dir: Option<String>,
    base_url: Option<String>,
    paths: Option<IndexMap<String, Vec<String>>>,
}

/// Effective compiler options after following the `extends` chain.
/// Directories are already resolved against the file that declared them.
#[derive(Debug, Clone, Default)]
pub struct TsConfig {
    out_dir: Option<PathBuf>,
    base_url: Option<PathBuf>,
    paths: IndexMap<String, Vec<String>>,
    /// Directory of the last config that declared `paths`
    paths_dir: Option<PathBuf>,
}

impl TsConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut cfg = Self::default();
        cfg.apply_file(path, &mut seen)?;
        Ok(cfg)
    }

    /// Layer `path` (and its parents first) onto `self`
    fn apply_file(&mut self, path: &Path, seen: &mut HashSet<PathBuf>) -> Result<()> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if !seen.insert(key.clone()) {
            bail!("Circular tsconfig extends at {}", path.display());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw: RawTsConfig = serde_json::from_value(parse_jsonc(&text).with_context(|| {
            format!("Failed to parse {}", path.display())
        })?)
        .with_context(|| format!("Unexpected tsconfig shape in {}", path.display()))?;

        let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();

        let parents = match raw.extends {
            None => Vec::new(),
            Some(Extends::One(p)) => vec![p],
            Some(Extends::Many(ps)) => ps,
        };

        for parent in parents {
            if !(parent.starts_with('.') || Path::new(&parent).is_absolute()) {
                debug!(extends = %parent, "skipping package tsconfig base");
                continue;
            }

            let mut parent_path = dir.join(&parent);
            if !parent_path.is_file() && parent_path.extension().is_none() {
                parent_path.set_extension("json");
            }

            self.apply_file(&parent_path, seen)?;
        }

        let options = raw.compiler_options;

        if let Some(out) = options.out_dir {
            self.out_dir = Some(dir.join(out));
        }
        if let Some(base) = options.base_url {
            self.base_url = Some(dir.join(base));
        }
        if let Some(paths) = options.paths {
            // Replaced wholesale, never merged key by key
            self.paths = paths;
            self.paths_dir = Some(dir);
        }

        // Only the active chain counts; diamond-shaped extends are fine
        seen.remove(&key);

        Ok(())
    }

    /// `compilerOptions.outDir`, resolved
    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }

    /// Alias table from `compilerOptions.paths`, anchored at `baseUrl` or,
    /// without one, at the directory declaring `paths`
    pub fn path_aliases(&self) -> Option<AliasMap> {
        if self.paths.is_empty() {
            return None;
        }

        let base = self
            .base_url
            .clone()
            .or_else(|| self.paths_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut map = AliasMap::new(base);
        for (alias, targets) in &self.paths {
            map.insert(alias, targets);
        }

        Some(map)
    }
}

/// Strict JSON first, then JSON5 for comments and trailing commas
fn parse_jsonc(text: &str) -> Result<Value> {
    if let Ok(v) = serde_json::from_str(text) {
        return Ok(v);
    }

    json_five::from_str::<Value>(text).map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn dependencies_from_every_table_deduplicated() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "package.json",
            r#"{
                "name": "app",
                "dependencies": { "react": "^18", "lodash": "4" },
                "devDependencies": { "typescript-eslint": "8", "react": "^18" },
                "peerDependencies": { "@scope/ui": "1" },
                "optionalDependencies": { "fsevents": "2" }
            }"#,
        );

        assert_eq!(
            package_dependencies(tmp.path()),
            vec!["react", "lodash", "typescript-eslint", "@scope/ui", "fsevents"]
        );
    }

    #[test]
    fn missing_or_malformed_manifest_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(package_dependencies(tmp.path()).is_empty());

        write(tmp.path(), "package.json", "{ not json");
        assert!(package_dependencies(tmp.path()).is_empty());
    }

    #[test]
    fn finds_tsconfig_upward() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "tsconfig.json", "{}");
        fs::create_dir_all(tmp.path().join("packages/a/src")).unwrap();

        let found = find_tsconfig(&tmp.path().join("packages/a/src")).unwrap();
        assert_eq!(found, tmp.path().canonicalize().unwrap().join("tsconfig.json"));
    }

    #[test]
    fn tolerates_comments_and_trailing_commas() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "tsconfig.json",
            r#"{
                // build output
                "compilerOptions": {
                    "outDir": "./dist",
                    "paths": { "@/*": ["./src/*"], },
                },
            }"#,
        );

        let cfg = TsConfig::load(&tmp.path().join("tsconfig.json")).unwrap();

        assert_eq!(cfg.out_dir(), Some(tmp.path().join("./dist").as_path()));
        let aliases = cfg.path_aliases().unwrap();
        assert_eq!(aliases.base_dir(), tmp.path());
        assert_eq!(aliases.resolve("@/x").as_deref(), Some("src/x"));
    }

    #[test]
    fn extends_chain_replaces_parent_paths() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "config/base.json",
            r#"{ "compilerOptions": { "outDir": "../build", "baseUrl": "..",
                 "paths": { "@/*": ["src/*"], "~/*": ["lib/*"] } } }"#,
        );
        write(
            tmp.path(),
            "tsconfig.json",
            r#"{ "extends": "./config/base",
                 "compilerOptions": { "paths": { "~/*": ["vendor/*"] } } }"#,
        );

        let cfg = TsConfig::load(&tmp.path().join("tsconfig.json")).unwrap();

        // outDir comes from the parent, resolved against the parent's dir
        assert_eq!(cfg.out_dir(), Some(tmp.path().join("config/../build").as_path()));

        let aliases = cfg.path_aliases().unwrap();
        assert_eq!(aliases.base_dir(), tmp.path().join("config/.."));
        assert_eq!(aliases.resolve("@/a"), None);
        assert_eq!(aliases.resolve("~/b").as_deref(), Some("vendor/b"));
    }

    #[test]
    fn inherited_paths_anchor_at_the_declaring_config() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "config/base.json",
            r#"{ "compilerOptions": { "paths": { "@/*": ["src/*"] } } }"#,
        );
        write(
            tmp.path(),
            "tsconfig.json",
            r#"{ "extends": "./config/base.json", "compilerOptions": { "outDir": "dist" } }"#,
        );

        let cfg = TsConfig::load(&tmp.path().join("tsconfig.json")).unwrap();
        let aliases = cfg.path_aliases().unwrap();

        assert_eq!(aliases.base_dir(), tmp.path().join("config"));
        assert_eq!(aliases.resolve("@/x").as_deref(), Some("src/x"));
    }

    #[test]
    fn no_paths_means_no_aliases() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "tsconfig.json", r#"{ "compilerOptions": {} }"#);

        let cfg = TsConfig::load(&tmp.path().join("tsconfig.json")).unwrap();
        assert!(cfg.path_aliases().is_none());
        assert!(cfg.out_dir().is_none());
    }

    #[test]
    fn circular_extends_is_an_error() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", r#"{ "extends": "./b.json" }"#);
        write(tmp.path(), "b.json", r#"{ "extends": "./a.json" }"#);

        assert!(TsConfig::load(&tmp.path().join("a.json")).is_err());
    }
}
