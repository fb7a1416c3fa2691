use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tsfix::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = cli.context();

    init_tracing(&cli);

    match cli.command {
        Some(Commands::Init(args)) => tsfix::infra::config::init(args, &ctx),
        Some(Commands::Completions(args)) => tsfix::completion::run(args),
        None => tsfix::core::fix_run(cli.fix, &ctx),
    }
}

/// stderr logging; TSFIX_LOG wins over --verbose
fn init_tracing(cli: &Cli) {
    let fallback = if cli.verbose { "tsfix=debug" } else { "tsfix=warn" };
    let filter = EnvFilter::try_from_env("TSFIX_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();
}
