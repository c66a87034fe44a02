//! CLI commands for cranforge.

pub mod includes;
pub mod order;
pub mod resolve;
pub mod update_list;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cranforge - transitive dependency graphs for CRAN packages
#[derive(Parser, Debug)]
#[command(name = "cranforge")]
#[command(version)]
#[command(about = "Builds the transitive dependency graph of CRAN packages", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
#[command(styles = get_styles())]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Universe root holding `packages/` and `replacements/`
    #[arg(long, global = true, value_name = "DIR", env = "CRANFORGE_UNIVERSE")]
    pub universe: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency graph and write packages.list
    #[command(name = "update-list")]
    UpdateList(update_list::UpdateListArgs),

    /// Print includeBuild directives for the replacement builds
    Includes(includes::IncludesArgs),

    /// Print the resolved dependencies of one package as JSON
    Resolve(resolve::ResolveArgs),

    /// Print the order in which packages can be built
    Order(order::OrderArgs),
}

const fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Green.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Green.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default())
        .placeholder(clap::builder::styling::AnsiColor::Yellow.on_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_list() {
        let cli = Cli::parse_from([
            "cranforge", "-vv", "update-list", "cran/latest", "org.renjin.cran:MASS:7.3-51.4",
            "--sample", "0.5", "--workers", "3",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::UpdateList(args) = cli.command else {
            panic!("expected update-list");
        };
        assert_eq!(args.filters.len(), 2);
        assert_eq!(args.sample, Some(0.5));
        assert_eq!(args.workers, Some(3));
    }

    #[test]
    fn test_update_list_requires_filter() {
        assert!(Cli::try_parse_from(["cranforge", "update-list"]).is_err());
    }
}
