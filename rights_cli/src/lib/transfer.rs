//! CSV export and import

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use inquire::Confirm;

use rights_core::{csv_bridge, logging::info, SessionContext};
use rights_vcd::{ReplaceSummary, RightsManager, WriteOptions};

pub(super) async fn export(
    manager: &RightsManager,
    session: &SessionContext,
    org: &str,
    output: &Option<PathBuf>,
) -> Result<()> {
    match output {
        Some(path) => {
            // fetch everything before touching the file, so a failure leaves it intact
            let view = manager.get_enabled_view(session, org).await?;
            csv_bridge::export_view_to_path(&view, path)
                .with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} rights for {org} to {}", view.len(), path.display());
        }
        None => {
            manager
                .export_org_rights(session, org, std::io::stdout())
                .await?;
        }
    }
    Ok(())
}

pub(super) async fn import(
    manager: &RightsManager,
    session: &SessionContext,
    org: &str,
    file: &Path,
    skip_confirmation: bool,
    options: &WriteOptions,
) -> Result<()> {
    let target_names = csv_bridge::import_view_from_path(file)
        .with_context(|| format!("reading {}", file.display()))?;

    if !options.dry_run && !skip_confirmation {
        let preview = manager
            .replace_org_rights(
                session,
                org,
                &target_names,
                &WriteOptions {
                    dry_run: true,
                    ..*options
                },
            )
            .await?;
        print_summary(org, &preview);
        if preview.diff.is_empty() {
            return Ok(());
        }
        let confirmed = Confirm::new(&format!("Replace the rights for {org} with these changes?"))
            .with_default(false)
            .with_help_message("the whole rights list is rewritten; changes made by others since the preview are lost")
            .prompt()?;
        if !confirmed {
            println!("Nothing was changed.");
            return Ok(());
        }
    }

    let summary = manager
        .replace_org_rights(session, org, &target_names, options)
        .await?;
    if options.dry_run || skip_confirmation {
        print_summary(org, &summary);
    }
    if summary.applied {
        println!("{}", format!("Updated rights for {org}").green());
    }
    Ok(())
}

fn print_summary(org: &str, summary: &ReplaceSummary) {
    println!("\nCHANGES FOR {org}\n──────────────────");
    print!("{}", summary.diff);
    if !summary.unmatched.is_empty() {
        println!("\nNot in the catalog (skipped):");
        summary
            .unmatched
            .iter()
            .for_each(|name| println!("{}", format!("  ? {name}").yellow()));
    }
}
