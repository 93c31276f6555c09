//! Commands for the rights CLI
//!

use std::path::PathBuf;

use clap::{self, Parser, Subcommand};

use rights_core::logging::LevelFilter;

/// Manage the rights enabled for organizations
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
pub(crate) struct RightsArgs {
    #[clap(subcommand)]
    pub(crate) command: RightsCommand,
    #[clap(global = true, short = 'v', long)]
    pub(crate) log_level: Option<LevelFilter>,
    /// Session file to use (defaults to ~/.vcd_rights/session.yaml)
    #[clap(global = true, short, long)]
    pub(crate) session: Option<PathBuf>,
    /// Re-read an org's rights right before writing and abort if someone else changed them
    #[clap(global = true, long, value_parser, default_value = "false")]
    pub(crate) verify: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum RightsCommand {
    /// List every right the server knows about
    Catalog,
    /// Show which catalog rights an org has enabled
    Show {
        /// Org name
        org: String,
        /// Only list the enabled rights
        #[clap(short, long, value_parser, default_value = "false")]
        enabled_only: bool,
    },
    /// Enable a right for an org
    Add {
        /// Org name
        org: String,
        /// Name of the right, exactly as listed by `catalog`
        right: String,
    },
    /// Disable a right for an org
    Remove {
        /// Org name
        org: String,
        /// Name of the right
        right: String,
    },
    /// Write an org's rights to CSV (name,enabled)
    Export {
        /// Org name
        org: String,
        /// Output file. Writes to stdout if omitted.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace an org's rights with the enabled rows of a CSV file
    Import {
        /// Org name
        org: String,
        /// CSV file with name and enabled columns
        file: PathBuf,
        /// Show the changes without applying them
        #[clap(short, long, value_parser, default_value = "false")]
        dry_run: bool,
        /// Don't ask for confirmation
        #[clap(short, long, value_parser, default_value = "false")]
        yes: bool,
    },
}
