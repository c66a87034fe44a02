//! Order command implementation.

use crate::context::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use console::style;

/// Arguments for the order command.
#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Package list queries (`cran/latest`) or ids (`group:name:version`)
    #[arg(required = true, value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Maximum concurrent dependency resolutions
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,
}

/// Run the order command.
///
/// Prints one line per build step. Packages that depend on each other in a
/// cycle share a line.
pub async fn run(ctx: &Context, args: OrderArgs) -> Result<()> {
    let builder = ctx.graph_builder()?;
    for filter in &args.filters {
        builder
            .add_filter(filter, None)
            .await
            .with_context(|| format!("adding packages for '{filter}'"))?;
    }
    let graph = builder.build().await.context("building dependency graph")?;

    for group in graph.build_order() {
        let ids: Vec<String> = group.iter().map(|node| node.id().to_string()).collect();
        if ids.len() > 1 {
            println!("{} {}", ids.join(" "), style("(cycle)").dim());
        } else {
            println!("{}", ids.join(" "));
        }
    }
    Ok(())
}
