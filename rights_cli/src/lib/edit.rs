//! Single-right edits

use anyhow::Result;
use colored::Colorize;

use rights_core::SessionContext;
use rights_vcd::{EditOutcome, RightsManager, WriteOptions};

pub(super) async fn add(
    manager: &RightsManager,
    session: &SessionContext,
    org: &str,
    right: &str,
    options: &WriteOptions,
) -> Result<()> {
    let outcome = manager.add_org_right(session, org, right, options).await?;
    if outcome == EditOutcome::Applied {
        println!("{}", format!("+ right: {right}").green());
    }
    Ok(())
}

pub(super) async fn remove(
    manager: &RightsManager,
    session: &SessionContext,
    org: &str,
    right: &str,
    options: &WriteOptions,
) -> Result<()> {
    let outcome = manager
        .remove_org_right(session, org, right, options)
        .await?;
    if outcome == EditOutcome::Applied {
        println!("{}", format!("- right: {right}").red());
    }
    Ok(())
}
