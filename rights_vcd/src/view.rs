//! The enabled/disabled overlay of the catalog for one org.

use std::io;

use rights_core::{
    csv_bridge, reconcile::compute_enabled_view, OrgRightAssignment, Result, SessionContext,
};

use crate::{org::OrgResolver, rest::XmlTransport, RightsManager};

impl<C> RightsManager<C>
where
    C: XmlTransport + OrgResolver,
{
    /// Every catalog right, marked with whether the org has it.
    pub async fn get_enabled_view(
        &self,
        session: &SessionContext,
        org_name: &str,
    ) -> Result<Vec<OrgRightAssignment>> {
        session.ensure_rights_supported()?;
        let catalog = self.fetch_catalog(session).await?;
        let org = self.client.resolve_org(session, org_name).await?;
        let doc = self.fetch_org_rights(session, &org).await?;
        Ok(compute_enabled_view(&catalog, doc.hrefs()))
    }

    /// Write the org's enabled view as CSV. Returns the number of rows.
    pub async fn export_org_rights<W: io::Write>(
        &self,
        session: &SessionContext,
        org_name: &str,
        writer: W,
    ) -> Result<usize> {
        let view = self.get_enabled_view(session, org_name).await?;
        csv_bridge::export_view(&view, writer)?;
        Ok(view.len())
    }
}
