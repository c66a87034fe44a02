//! Update-list command implementation.

use crate::context::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use console::style;
use cranforge_graph::package_list;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the update-list command.
#[derive(Args, Debug, Clone)]
pub struct UpdateListArgs {
    /// Package list queries (`cran/latest`) or ids (`group:name:version`)
    #[arg(required = true, value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Keep each listed package with this probability, or about this many if above 1
    #[arg(long, value_name = "RATE")]
    pub sample: Option<f64>,

    /// Maximum concurrent dependency resolutions
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Where to write the list (default: packages/packages.list)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Run the update-list command.
pub async fn run(ctx: &Context, args: UpdateListArgs) -> Result<()> {
    info!("running update-list command");

    let builder = ctx.graph_builder()?;
    for filter in &args.filters {
        builder
            .add_filter(filter, args.sample)
            .await
            .with_context(|| format!("adding packages for '{filter}'"))?;
    }

    let graph = builder.build().await.context("building dependency graph")?;

    let output = args
        .output
        .unwrap_or_else(|| ctx.config.package_list_file());
    let count = package_list::write(&graph, &output)
        .with_context(|| format!("writing {}", output.display()))?;

    let stats = builder.stats().snapshot();
    debug!(
        resolutions = stats.resolutions,
        cache_hits = stats.cache_hits,
        service_calls = stats.service_calls,
        excluded = stats.blocked,
        "graph statistics"
    );

    println!("{} {count}", style("Package count:").bold());
    Ok(())
}
