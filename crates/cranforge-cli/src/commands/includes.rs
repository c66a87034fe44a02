//! Includes command implementation.

use crate::context::Context;
use anyhow::Result;
use clap::Args;

/// Arguments for the includes command.
#[derive(Args, Debug, Clone)]
pub struct IncludesArgs {}

/// Run the includes command.
pub fn run(ctx: &Context, _args: IncludesArgs) -> Result<()> {
    let mut settings = String::new();
    ctx.replacements()?.append_include_builds(&mut settings);
    print!("{settings}");
    Ok(())
}
