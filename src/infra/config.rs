use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::extract::ExtractionMode;
use crate::core::rewrite::Suffixes;

/// Config file names probed in the project directory, first hit wins
const CONFIG_FILES: [&str; 4] = ["tsfix.toml", ".tsfix.toml", "tsfix.yaml", "tsfix.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Extraction strategy when `--mode` is not given
    pub mode: ExtractionMode,

    /// Extensions turned into the `*.{..}` include glob
    pub extensions: Vec<String>,

    /// Explicit include glob; wins over `extensions`
    pub pattern: Option<String>,

    /// Globs pruned from the walk
    pub ignore_patterns: Vec<String>,

    /// Suffix vocabulary used by the rewrite engine
    pub suffix: Suffixes,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            mode: ExtractionMode::Pattern,
            extensions: vec!["js".to_string(), "ts".to_string()],
            pattern: None,
            ignore_patterns: vec!["**/node_modules/**".to_string()],
            suffix: Suffixes::default(),
        }
    }
}

impl Config
{
    /// Include glob: explicit pattern, else `*.{ext,..}`
    pub fn include_glob(&self) -> String
    {
        match &self.pattern
        {
            Some(p) => p.clone(),
            None if self
                .extensions
                .len()
                == 1 =>
            {
                format!("*.{}", self.extensions[0])
            }
            None => format!("*.{{{}}}", self.extensions.join(",")),
        }
    }
}

/// Layer `tsfix.*` from `project_dir` with `TSFIX_*` environment variables
pub fn load_config(project_dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in CONFIG_FILES
    {
        let path = project_dir.join(name);
        if path.exists()
        {
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    // TSFIX_MODE=structural, TSFIX_SUFFIX__RUNTIME=.mjs, TSFIX_EXTENSIONS=js,mjs
    builder = builder.add_source(
        config::Environment::with_prefix("TSFIX")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("extensions")
            .with_list_parse_key("ignore_patterns")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("tsfix.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        println!("{toml_string}");
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
