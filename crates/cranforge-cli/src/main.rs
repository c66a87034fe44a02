//! cranforge - builds the transitive dependency graph of CRAN packages.
//!
//! Seeds come from package database list queries or explicit
//! `group:name:version` ids. The resulting graph is written as the universe's
//! `packages.list`, with packages provided by a replacement build marked
//! as prebuilt.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod context;

use clap::Parser;
use commands::{Cli, Commands};
use console::style;
use context::Context;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 if cli.quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            print_error(&anyhow::anyhow!("failed to create runtime: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_command(&cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let workers = match &cli.command {
        Commands::UpdateList(args) => args.workers,
        Commands::Order(args) => args.workers,
        _ => None,
    };
    let ctx = Context::new(cli.universe.as_deref(), workers)?;

    match &cli.command {
        Commands::UpdateList(args) => commands::update_list::run(&ctx, args.clone()).await,
        Commands::Includes(args) => commands::includes::run(&ctx, args.clone()),
        Commands::Resolve(args) => commands::resolve::run(&ctx, args.clone()).await,
        Commands::Order(args) => commands::order::run(&ctx, args.clone()).await,
    }
}

fn print_error(err: &anyhow::Error) {
    eprintln!("{} {err}", style("error:").red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("  {} {cause}", style("caused by:").dim());
    }
}
