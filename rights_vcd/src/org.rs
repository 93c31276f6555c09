//! Resolving orgs by name and reading their rights documents.

use async_trait::async_trait;
use rights_core::{logging::debug, OrgRightsDocument, Result, RightsError, SessionContext};

use crate::{
    rest::{consts, VcdRestClient, XmlTransport},
    xml, RightsManager,
};

/// An org the server knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgRef {
    /// The org's name
    pub name: String,
    /// The org's href as listed by the server
    pub href: String,
    /// The trailing id segment of `href`
    pub id: String,
}

impl OrgRef {
    /// Build an OrgRef, taking the id from the last path segment of the href.
    pub fn from_href(name: &str, href: &str) -> Result<Self> {
        let url = url::Url::parse(href)
            .map_err(|e| RightsError::Parse(format!("invalid href for org {name}: {e}")))?;
        let id = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .ok_or_else(|| RightsError::Parse(format!("unable to find an id in {href}")))?;
        Ok(OrgRef {
            name: name.to_owned(),
            href: href.to_owned(),
            id: id.to_owned(),
        })
    }

    /// Where this org's rights document lives.
    pub fn rights_url(&self, session: &SessionContext) -> String {
        format!("{}/admin/org/{}/rights", session.base_url(), self.id)
    }
}

/// Looks up an org by name.
#[async_trait]
pub trait OrgResolver: Send + Sync {
    /// Resolve `org_name`, failing with `NotFound` if no org has that name.
    async fn resolve_org(&self, session: &SessionContext, org_name: &str) -> Result<OrgRef>;
}

#[async_trait]
impl OrgResolver for VcdRestClient {
    async fn resolve_org(&self, session: &SessionContext, org_name: &str) -> Result<OrgRef> {
        let url = format!("{}/org", session.base_url());
        let org_list = self
            .get_xml(session, &url, consts::ORG_LIST_MEDIA_TYPE)
            .await?;
        xml::parse_org_list(&org_list)?
            .into_iter()
            .find(|o| o.name == org_name)
            .ok_or_else(|| RightsError::org_not_found(org_name))
    }
}

impl<C> RightsManager<C>
where
    C: XmlTransport + OrgResolver,
{
    /// Fetch the rights currently assigned to an org.
    pub async fn get_org_assignment(
        &self,
        session: &SessionContext,
        org_name: &str,
    ) -> Result<OrgRightsDocument> {
        session.ensure_rights_supported()?;
        let org = self.client.resolve_org(session, org_name).await?;
        self.fetch_org_rights(session, &org).await
    }

    pub(crate) async fn fetch_org_rights(
        &self,
        session: &SessionContext,
        org: &OrgRef,
    ) -> Result<OrgRightsDocument> {
        let body = self
            .client
            .get_xml(session, &org.rights_url(session), consts::ORG_RIGHTS_MEDIA_TYPE)
            .await?;
        let doc = xml::parse_org_rights(&body)?;
        debug!("org {} has {} rights assigned", org.name, doc.len());
        Ok(doc)
    }
}
