//! Per-file pipeline and the directory driver.
//!
//! `Fixer::process_file` runs read → extract → classify → rewrite → write
//! for one file; `run` walks the build directory and fans files out over
//! rayon.

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Style};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, instrument, warn};

use crate::cli::{AppContext, FixArgs};
use crate::core::alias::AliasMap;
use crate::core::classify::Classifier;
use crate::core::extract::{ExtractError, ExtractionMode, get_extractor};
use crate::core::rewrite::{FsProbe, Outcome, Rewrite, RewriteEngine, Suffixes};
use crate::infra::config::{Config, load_config};
use crate::infra::io::{read_source, write_atomic};
use crate::infra::probe::DiskProbe;
use crate::infra::project::{TsConfig, find_tsconfig, package_dependencies};
use crate::infra::walk::FileWalker;

/// File-level failures; record-level problems never surface here
#[derive(Debug, thiserror::Error)]
pub enum FixError
{
    #[error("failed to read {}", path.display())]
    Read
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write
    {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse
    {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },
}

/// What happened to one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport
{
    pub path: PathBuf,

    /// Text differs from what was read (written unless dry-run)
    pub changed: bool,

    pub outcomes: Vec<Outcome>,
}

impl FileReport
{
    fn from_rewrite(
        path: &Path,
        rewrite: &Rewrite,
        changed: bool,
    ) -> Self
    {
        Self { path: path.to_path_buf(), changed, outcomes: rewrite.outcomes.clone() }
    }

    /// `(from, to)` pairs of every rewritten specifier
    pub fn rewrites(&self) -> impl Iterator<Item = (&str, &str)>
    {
        self.outcomes
            .iter()
            .filter_map(|o| match o
            {
                Outcome::Rewritten { from, to } => Some((from.as_str(), to.as_str())),
                _ => None,
            })
    }
}

/// Everything one file needs, shared read-only across workers
pub struct Fixer
{
    mode: ExtractionMode,
    classifier: Classifier,
    aliases: Option<AliasMap>,
    suffixes: Suffixes,
    probe: Box<dyn FsProbe>,
    dry_run: bool,
}

impl Fixer
{
    pub fn new(
        mode: ExtractionMode,
        classifier: Classifier,
    ) -> Self
    {
        Self {
            mode,
            classifier,
            aliases: None,
            suffixes: Suffixes::default(),
            probe: Box::new(DiskProbe),
            dry_run: false,
        }
    }

    pub fn with_aliases(
        mut self,
        aliases: Option<AliasMap>,
    ) -> Self
    {
        self.aliases = aliases;
        self
    }

    pub fn with_suffixes(
        mut self,
        suffixes: Suffixes,
    ) -> Self
    {
        self.suffixes = suffixes;
        self
    }

    pub fn with_probe(
        mut self,
        probe: Box<dyn FsProbe>,
    ) -> Self
    {
        self.probe = probe;
        self
    }

    /// Compute rewrites without touching the file
    pub fn dry_run(
        mut self,
        dry_run: bool,
    ) -> Self
    {
        self.dry_run = dry_run;
        self
    }

    /// Rewrite `text` as if it lived at `path`. No I/O apart from probing.
    pub fn fix_source(
        &self,
        text: &str,
        path: &Path,
    ) -> Result<Rewrite, ExtractError>
    {
        let records = get_extractor(self.mode, path)?.extract(text, &self.classifier)?;
        let dir = path
            .parent()
            .unwrap_or(Path::new(""));

        debug!(count = records.len(), "extracted specifiers");

        Ok(RewriteEngine::new(self.probe.as_ref(), &self.suffixes)
            .with_aliases(self.aliases.as_ref())
            .rewrite(text, &records, dir))
    }

    #[instrument(level = "debug", skip(self), fields(mode = %self.mode))]
    pub fn process_file(
        &self,
        path: &Path,
    ) -> Result<FileReport, FixError>
    {
        let text = read_source(path).map_err(|source| FixError::Read { path: path.to_path_buf(), source })?;

        let rewrite = self
            .fix_source(&text, path)
            .map_err(|source| FixError::Parse { path: path.to_path_buf(), source })?;

        let changed = rewrite.text != text;

        if changed && !self.dry_run
        {
            write_atomic(path, rewrite.text.as_bytes())
                .map_err(|source| FixError::Write { path: path.to_path_buf(), source })?;
        }

        Ok(FileReport::from_rewrite(path, &rewrite, changed))
    }
}

/// Run totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary
{
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_failed: usize,
    pub rewritten: usize,
    pub missing: usize,
    pub unresolved_aliases: usize,
}

impl Summary
{
    pub fn tally(results: &[Result<FileReport, FixError>]) -> Self
    {
        let mut s = Summary { files_scanned: results.len(), ..Default::default() };

        for result in results
        {
            let Ok(report) = result
            else
            {
                s.files_failed += 1;
                continue;
            };

            if report.changed
            {
                s.files_changed += 1;
            }

            for outcome in &report.outcomes
            {
                match outcome
                {
                    Outcome::Rewritten { .. } => s.rewritten += 1,
                    Outcome::Missing { .. } => s.missing += 1,
                    Outcome::UnresolvedAlias { .. } => s.unresolved_aliases += 1,
                    _ => {}
                }
            }
        }

        s
    }
}

/// CLI entry: resolve settings, walk, fix in parallel, report
pub fn run(
    args: FixArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let project = args
        .project
        .clone();

    let mut cfg = match load_config(&project)
    {
        Ok(cfg) => cfg,
        Err(e) =>
        {
            warn!("Using default configuration: {e:#}");
            Config::default()
        }
    };

    // CLI wins over config
    if !args
        .extensions
        .is_empty()
    {
        cfg.extensions = args
            .extensions
            .clone();
    }
    if let Some(pattern) = &args.pattern
    {
        cfg.pattern = Some(pattern.clone());
    }
    let mode = args
        .mode
        .map(ExtractionMode::from)
        .unwrap_or(cfg.mode);

    let tsconfig = find_tsconfig(&project).map(|p| TsConfig::load(&p));

    let root = match (args.path, &tsconfig)
    {
        (Some(path), _) => path,
        (None, None) => bail!("Unable to locate tsconfig"),
        (None, Some(Err(e))) => return Err(anyhow!("{e:#}")),
        (None, Some(Ok(ts))) => ts
            .out_dir()
            .map(Path::to_path_buf)
            .context("No outDir specified in tsconfig")?,
    };

    if !root.is_dir()
    {
        bail!("Directory not found: {}", root.display());
    }

    // Alias tables are anchored at canonical tsconfig paths
    let root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    let aliases = match tsconfig
    {
        Some(Ok(ts)) => ts.path_aliases(),
        Some(Err(e)) =>
        {
            warn!("Alias rewriting disabled: {e:#}");
            None
        }
        None => None,
    };

    let files = FileWalker::new(&cfg.ignore_patterns)?
        .with_include(&cfg.include_glob())?
        .walk_files(&root);

    let fixer = Fixer::new(mode, Classifier::new(package_dependencies(&project)))
        .with_aliases(aliases)
        .with_suffixes(cfg.suffix)
        .dry_run(ctx.dry_run);

    let progress = if ctx.quiet
    {
        ProgressBar::hidden()
    }
    else
    {
        let pb = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    };

    // Order preserved in collect
    let results: Vec<Result<FileReport, FixError>> = files
        .par_iter()
        .map(|path| {
            let result = fixer.process_file(path);
            progress.inc(1);
            result
        })
        .collect();

    progress.finish_and_clear();

    let summary = Summary::tally(&results);
    let color = !ctx.no_color;

    for result in results
    {
        match result
        {
            Err(e) => error!("{:#}", anyhow::Error::new(e)),
            Ok(report) if ctx.dry_run && !ctx.quiet && report.changed =>
            {
                println!("{}", tint(report.path.display(), color, Style::new().bold()));
                for (from, to) in report.rewrites()
                {
                    println!("  {from} -> {}", tint(to, color, Style::new().green()));
                }
            }
            Ok(_) => {}
        }
    }

    if !ctx.quiet
    {
        print_summary(&summary, ctx);
    }

    if summary.files_failed > 0
    {
        bail!("{} file(s) could not be processed", summary.files_failed);
    }

    Ok(())
}

fn print_summary(
    s: &Summary,
    ctx: &AppContext,
)
{
    let color = !ctx.no_color;
    let verb = if ctx.dry_run { "Would rewrite" } else { "Rewrote" };

    println!(
        "{} {verb} {} specifier(s) in {} of {} file(s)",
        tint("✓", color, Style::new().green()),
        s.rewritten,
        s.files_changed,
        s.files_scanned
    );

    if s.missing > 0
    {
        println!("{}", tint(format!("  {} specifier(s) left unchanged: target not found", s.missing), color, Style::new().yellow()));
    }
    if s.unresolved_aliases > 0
    {
        println!("{}", tint(format!("  {} alias(es) unresolved", s.unresolved_aliases), color, Style::new().yellow()));
    }
    if s.files_failed > 0
    {
        println!("{}", tint(format!("  {} file(s) failed", s.files_failed), color, Style::new().red()));
    }
}

fn tint(
    text: impl Display,
    enabled: bool,
    style: Style,
) -> String
{
    if enabled { text.style(style).to_string() } else { text.to_string() }
}
