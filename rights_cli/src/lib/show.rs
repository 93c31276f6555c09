//! Read-only commands

use anyhow::Result;
use colored::Colorize;

use rights_core::SessionContext;
use rights_vcd::RightsManager;

pub(super) async fn catalog(manager: &RightsManager, session: &SessionContext) -> Result<()> {
    let rights = manager.list_catalog_rights(session).await?;
    for right in &rights {
        println!("{right}");
    }
    println!("\n{} rights in the catalog", rights.len());
    Ok(())
}

pub(super) async fn show(
    manager: &RightsManager,
    session: &SessionContext,
    org: &str,
    enabled_only: bool,
) -> Result<()> {
    let view = manager.get_enabled_view(session, org).await?;
    let enabled = view.iter().filter(|a| a.enabled).count();

    println!("\nRIGHTS FOR {org}\n──────────────────");
    for assignment in view.iter().filter(|a| a.enabled || !enabled_only) {
        if assignment.enabled {
            println!("{}", format!("[x] {}", assignment.name()).green());
        } else {
            println!("{}", format!("[ ] {}", assignment.name()).dimmed());
        }
    }
    println!("\n{enabled} of {} rights enabled", view.len());
    Ok(())
}
