//! modup - Interactive Go module upgrader CLI tool
//!
//! Finds newer versions of the direct requirements in go.mod, lets the
//! operator pick which ones to take, then runs `go get` and `go mod tidy`.

use clap::Parser;
use modup::cli::CliArgs;
use modup::go_command::GoCommand;
use modup::output::{create_formatter, OutputConfig};
use modup::pipeline::Pipeline;
use modup::progress::Progress;
use modup::prompt::{Prompt, SelectAll, TerminalPrompt};
use modup::query::{GoListQuery, HttpClient, ModuleQuery, ProxyQuery};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    init_logging(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; RUST_LOG overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "modup=debug" } else { "modup=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    if args.verbose {
        eprintln!("modup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let goproxy = std::env::var("GOPROXY").ok();
    let query: Arc<dyn ModuleQuery> = match args.proxy_url(goproxy.as_deref()) {
        Some(url) => Arc::new(ProxyQuery::new(HttpClient::new()?, url)),
        None => Arc::new(GoListQuery::new()),
    };
    let prompt: Arc<dyn Prompt> = if args.yes {
        Arc::new(SelectAll)
    } else {
        Arc::new(TerminalPrompt::new())
    };

    let mut pipeline = Pipeline::new(
        query,
        Arc::new(GoCommand::new()),
        prompt,
        args.pipeline_config(),
    )
    .with_progress(Progress::new(!args.quiet && !args.json));

    let outcome = pipeline.run(&args.path).await?;

    let formatter = create_formatter(OutputConfig::from_cli(
        args.json,
        args.verbose,
        args.quiet,
        args.dry_run,
    ));
    let mut stdout = io::stdout().lock();
    formatter.format(&outcome, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
