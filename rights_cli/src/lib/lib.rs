//! Full CLI library for org rights management
//!

#![deny(missing_docs)]

mod cmd;
mod edit;
mod show;
mod transfer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rights_core::{
    logging::{self, debug},
    project, SessionContext,
};
use rights_vcd::{RightsManager, WriteOptions};

use crate::cmd::{RightsArgs, RightsCommand};

/// Main CLI entrypoint.
pub async fn cli() -> Result<()> {
    let args = RightsArgs::parse();
    logging::setup(args.log_level);

    let session = read_session(&args.session)?;
    let manager = RightsManager::with_rest_client().context("setting up http client")?;
    let options = WriteOptions {
        dry_run: false,
        verify_unchanged: args.verify,
    };

    match &args.command {
        RightsCommand::Catalog => show::catalog(&manager, &session).await?,
        RightsCommand::Show { org, enabled_only } => {
            show::show(&manager, &session, org, *enabled_only).await?
        }
        RightsCommand::Add { org, right } => {
            edit::add(&manager, &session, org, right, &options).await?
        }
        RightsCommand::Remove { org, right } => {
            edit::remove(&manager, &session, org, right, &options).await?
        }
        RightsCommand::Export { org, output } => {
            transfer::export(&manager, &session, org, output).await?
        }
        RightsCommand::Import {
            org,
            file,
            dry_run,
            yes,
        } => {
            let options = WriteOptions {
                dry_run: *dry_run,
                ..options
            };
            transfer::import(&manager, &session, org, file, *yes, &options).await?
        }
    }

    Ok(())
}

fn read_session(path: &Option<PathBuf>) -> Result<SessionContext> {
    let path = path.to_owned().unwrap_or_else(project::session_cfg_path);
    debug!("using session file {}", path.display());
    SessionContext::read_from_file(&path).with_context(|| {
        format!(
            "unable to read a session from {} - connect to the server first and save the session there, or pass --session",
            path.display()
        )
    })
}
