//! **tsfix** - Rewrites import specifiers in compiled JavaScript/TypeScript
//! output so the runtime module loader can resolve them.
//!
//! Relative and absolute specifiers get an explicit `.js` suffix (or an
//! `/index.js` completion for directories), `tsconfig` path aliases are turned
//! into relative paths, and builtins/packages are left alone.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core pipeline - extraction, classification, alias resolution, rewriting
pub mod core {
    /// Specifier records and provenance
    pub mod specifier;
    pub use specifier::{Provenance, RawSpecifier, Specifier};

    /// Provenance classification and extension detection
    pub mod classify;
    pub use classify::{Classifier, detect_extension, is_builtin};

    /// Extraction strategies behind `SpecifierExtractor`
    pub mod extract;
    pub use extract::{ExtractError, ExtractionMode, SpecifierExtractor, get_extractor};

    /// Path-alias table with longest-prefix resolution
    pub mod alias;
    pub use alias::AliasMap;

    /// Suffix correction and quote-aware substitution
    pub mod rewrite;
    pub use rewrite::{FsProbe, Outcome, Rewrite, RewriteEngine, Suffixes};

    /// Per-file pipeline and parallel driver
    pub mod fix;
    pub use fix::{FileReport, FixError, Fixer, Summary, run as fix_run};
}

/// Specifier extractors
pub mod parsers {
    /// Regex scanning over raw text
    pub mod pattern;
    pub use pattern::PatternExtractor;

    /// tree-sitter JavaScript/TypeScript traversal
    pub mod structural;
    pub use structural::{Grammar, StructuralExtractor};
}

/// Infrastructure - configuration, I/O, project metadata, walking
pub mod infra {
    /// Configuration management with TOML support and env overrides
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Source reads and atomic writes
    pub mod io;
    pub use io::{read_source, write_atomic};

    /// Real filesystem probe
    pub mod probe;
    pub use probe::DiskProbe;

    /// package.json and tsconfig.json loaders
    pub mod project;
    pub use project::{TsConfig, find_tsconfig, package_dependencies};

    /// Include-glob directory walking
    pub mod walk;
    pub use walk::FileWalker;
}

pub use cli::{AppContext, Cli, Commands, FixArgs};
pub use core::{AliasMap, Classifier, ExtractionMode, Fixer, Specifier};
pub use infra::{Config, FileWalker, load_config};
