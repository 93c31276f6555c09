//! Functionality for the write path.
//!
//! Every change is a read-modify-write of the org's whole rights document.
//! The server offers no concurrency token for that document, so anyone
//! writing between our GET and our PUT is overwritten. Setting
//! [`WriteOptions::verify_unchanged`] re-reads the document right before
//! the PUT and refuses to write if it moved, which narrows that window
//! without closing it.

use std::{collections::HashSet, io};

use rights_core::{
    csv_bridge,
    logging::{info, warn},
    reconcile::{self, EditOutcome, RightsDiff},
    OrgRightsDocument, Result, RightsError, SessionContext,
};

use crate::{
    org::{OrgRef, OrgResolver},
    rest::{consts, XmlTransport},
    xml, RightsManager,
};

/// Knobs for operations that write.
#[derive(Debug, Default, Clone, Copy)]
pub struct WriteOptions {
    /// Compute and report the change without sending it.
    pub dry_run: bool,
    /// Re-read the org's rights just before writing and abort if they
    /// changed since the first read.
    pub verify_unchanged: bool,
}

/// What a wholesale replacement did (or would do, on a dry run).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceSummary {
    /// Rights added and removed
    pub diff: RightsDiff,
    /// Requested names that aren't in the catalog
    pub unmatched: Vec<String>,
    /// Whether the new document was sent
    pub applied: bool,
}

impl<C> RightsManager<C>
where
    C: XmlTransport + OrgResolver,
{
    /// Enable a catalog right for an org.
    ///
    /// Enabling a right the org already has is a no-op: it's logged and
    /// nothing is written. A dry run returns [`EditOutcome::DryRun`].
    pub async fn add_org_right(
        &self,
        session: &SessionContext,
        org_name: &str,
        right_name: &str,
        options: &WriteOptions,
    ) -> Result<EditOutcome> {
        session.ensure_rights_supported()?;
        let catalog = self.fetch_catalog(session).await?;
        let right = Self::find_in_catalog(&catalog, right_name)?;
        let org = self.client.resolve_org(session, org_name).await?;
        let current = self.fetch_org_rights(session, &org).await?;

        let mut updated = current.clone();
        let outcome = reconcile::add_right(&mut updated, right);
        if outcome.is_noop() {
            warn!("{right_name} is already enabled for {org_name}; nothing to do");
            return Ok(outcome);
        }
        let sent = self
            .write_org_rights(session, &org, &current, &updated, options)
            .await?;
        Ok(if sent { outcome } else { EditOutcome::DryRun })
    }

    /// Disable a right for an org, matching by name.
    ///
    /// Removing a right the org doesn't have is a no-op: it's logged and
    /// nothing is written.
    pub async fn remove_org_right(
        &self,
        session: &SessionContext,
        org_name: &str,
        right_name: &str,
        options: &WriteOptions,
    ) -> Result<EditOutcome> {
        session.ensure_rights_supported()?;
        let org = self.client.resolve_org(session, org_name).await?;
        let current = self.fetch_org_rights(session, &org).await?;

        let mut updated = current.clone();
        let outcome = reconcile::remove_right(&mut updated, right_name);
        if outcome.is_noop() {
            warn!("{right_name} is not enabled for {org_name}; nothing to do");
            return Ok(outcome);
        }
        let sent = self
            .write_org_rights(session, &org, &current, &updated, options)
            .await?;
        Ok(if sent { outcome } else { EditOutcome::DryRun })
    }

    /// Make the org's rights exactly the catalog rights named in
    /// `target_names`.
    ///
    /// Names missing from the catalog are skipped and reported in the
    /// summary rather than failing the operation.
    pub async fn replace_org_rights<S: AsRef<str>>(
        &self,
        session: &SessionContext,
        org_name: &str,
        target_names: &[S],
        options: &WriteOptions,
    ) -> Result<ReplaceSummary> {
        session.ensure_rights_supported()?;
        let catalog = self.fetch_catalog(session).await?;
        let org = self.client.resolve_org(session, org_name).await?;
        let current = self.fetch_org_rights(session, &org).await?;

        let mut updated = current.clone();
        let outcome = reconcile::replace_assignment(&mut updated, &catalog, target_names);
        if !outcome.unmatched.is_empty() {
            warn!(
                "skipping rights that aren't in the catalog: {}",
                outcome.unmatched.join(", ")
            );
        }

        let diff = reconcile::diff_assignment(&current, &updated);
        let applied = if diff.is_empty() {
            info!("rights for {org_name} are already up to date");
            false
        } else {
            self.write_org_rights(session, &org, &current, &updated, options)
                .await?
        };

        Ok(ReplaceSummary {
            diff,
            unmatched: outcome.unmatched,
            applied,
        })
    }

    /// Replace the org's rights with the enabled rows of a CSV export.
    ///
    /// The CSV is fully parsed before anything is fetched, so a bad file
    /// never reaches the server.
    pub async fn import_org_rights<R: io::Read>(
        &self,
        session: &SessionContext,
        org_name: &str,
        reader: R,
        options: &WriteOptions,
    ) -> Result<ReplaceSummary> {
        session.ensure_rights_supported()?;
        let target_names = csv_bridge::import_view(reader)?;
        self.replace_org_rights(session, org_name, &target_names, options)
            .await
    }

    /// PUT the updated document, unless this is a dry run. Returns whether
    /// anything was sent.
    async fn write_org_rights(
        &self,
        session: &SessionContext,
        org: &OrgRef,
        read: &OrgRightsDocument,
        updated: &OrgRightsDocument,
        options: &WriteOptions,
    ) -> Result<bool> {
        if options.dry_run {
            info!("dry run: not writing rights for {}", org.name);
            return Ok(false);
        }

        if options.verify_unchanged {
            let latest = self.fetch_org_rights(session, org).await?;
            if latest.hrefs().collect::<HashSet<_>>() != read.hrefs().collect::<HashSet<_>>() {
                return Err(RightsError::ConcurrentModification {
                    org: org.name.to_owned(),
                });
            }
        }

        self.client
            .put_xml(
                session,
                &org.rights_url(session),
                consts::ORG_RIGHTS_MEDIA_TYPE,
                xml::serialize_org_rights(updated)?,
            )
            .await?;
        info!("updated rights for {} ({} assigned)", org.name, updated.len());
        Ok(true)
    }
}
