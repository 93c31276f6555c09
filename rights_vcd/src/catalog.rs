//! Reading the global rights catalog.

use rights_core::{logging::debug, Result, Right, RightsError, SessionContext};

use crate::{
    org::OrgResolver,
    rest::{consts, XmlTransport},
    xml, RightsManager,
};

impl<C> RightsManager<C>
where
    C: XmlTransport + OrgResolver,
{
    /// List every right the server knows about.
    pub async fn list_catalog_rights(&self, session: &SessionContext) -> Result<Vec<Right>> {
        session.ensure_rights_supported()?;
        self.fetch_catalog(session).await
    }

    pub(crate) async fn fetch_catalog(&self, session: &SessionContext) -> Result<Vec<Right>> {
        let url = format!("{}/admin", session.base_url());
        let body = self
            .client
            .get_xml(session, &url, consts::ADMIN_MEDIA_TYPE)
            .await?;
        let catalog = xml::parse_catalog(&body)?;
        debug!("catalog has {} rights", catalog.len());
        Ok(catalog)
    }

    /// Find a catalog right by exact name.
    pub(crate) fn find_in_catalog<'a>(catalog: &'a [Right], name: &str) -> Result<&'a Right> {
        catalog
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| RightsError::right_not_found(name))
    }
}
