//! Resolve command implementation.

use crate::context::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use cranforge_core::{PackageVersionId, to_json_pretty};
use cranforge_repository::MetadataSource;
use tracing::info;

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Package to resolve, as `group:name:version`
    #[arg(value_name = "TRIPLET")]
    pub package: String,

    /// Skip the dependency cache
    #[arg(long)]
    pub refresh: bool,
}

/// Run the resolve command.
pub async fn run(ctx: &Context, args: ResolveArgs) -> Result<()> {
    let id = PackageVersionId::from_triplet(&args.package)?;
    info!(package = %id, "running resolve command");

    let cache = ctx.cache();
    let cached = if args.refresh { None } else { cache.get(&id).await };
    let set = match cached {
        Some(set) => set,
        None => {
            let set = ctx
                .client()?
                .resolve_dependencies(&id)
                .await
                .with_context(|| format!("resolving dependencies of {id}"))?;
            cache.put(&id, &set).await;
            set
        }
    };

    println!("{}", to_json_pretty(&set)?);
    Ok(())
}
