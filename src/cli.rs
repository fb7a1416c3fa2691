use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::extract::ExtractionMode;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
    pub verbose: bool,  // global --verbose
}

#[derive(Parser)]
#[command(name = "tsfix")]
#[command(about = "Add runtime file extensions to import specifiers in compiled JavaScript/TypeScript output")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub fix: FixArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress bars and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be rewritten without writing files
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log per-specifier decisions (overridden by TSFIX_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            no_color: self.no_color,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a tsfix.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct FixArgs {
    /// Directory to process (default: compilerOptions.outDir from tsconfig)
    pub path: Option<PathBuf>,

    /// File extensions to process, comma separated (e.g. js,mjs)
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Glob for files to process; overrides --extensions
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Specifier extraction strategy
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Directory holding package.json, tsconfig.json and tsfix.toml
    #[arg(long, default_value = ".")]
    pub project: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Regular-expression scanning
    #[value(alias = "regex")]
    Pattern,

    /// Syntax-tree traversal
    #[value(alias = "ast")]
    Structural,
}

impl From<ModeArg> for ExtractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pattern => ExtractionMode::Pattern,
            ModeArg::Structural => ExtractionMode::Structural,
        }
    }
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long, conflicts_with = "out_dir")]
    pub stdout: bool,
}
