//! Org rights management over the vCloud admin REST API.
//!
//! [`RightsManager`] puts the reconciler from `rights_core` behind the
//! HTTP transport, giving the operations an operator actually runs.
//! Every operation takes the session explicitly and checks it before any
//! request goes out.

mod catalog;
pub mod org;
pub mod rest;
mod view;
mod write;
mod xml;

pub use org::{OrgRef, OrgResolver};
pub use rest::{VcdRestClient, XmlTransport};
pub use rights_core::reconcile::{EditOutcome, RightsDiff};
pub use write::{ReplaceSummary, WriteOptions};

use rights_core::Result;

/// Entry point for rights operations.
pub struct RightsManager<C = VcdRestClient> {
    client: C,
}

impl RightsManager<VcdRestClient> {
    /// A manager that talks to the server over HTTP.
    pub fn with_rest_client() -> Result<Self> {
        Ok(Self::new(VcdRestClient::new()?))
    }
}

impl<C> RightsManager<C> {
    /// A manager over any transport and org resolver.
    pub fn new(client: C) -> Self {
        RightsManager { client }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use async_trait::async_trait;
    use rights_core::{RightsError, SessionContext};

    use super::*;

    const CATALOG: &str = r#"<VCloud xmlns="http://www.vmware.com/vcloud/v1.5">
        <RightReferences>
            <RightReference href="https://vcd/api/admin/right/r1" name="View"/>
            <RightReference href="https://vcd/api/admin/right/r2" name="Edit"/>
            <RightReference href="https://vcd/api/admin/right/r3" name="Delete"/>
        </RightReferences>
    </VCloud>"#;

    fn org_rights(names: &[(&str, &str)]) -> String {
        let refs = names
            .iter()
            .map(|(id, name)| {
                format!(r#"<RightReference href="https://vcd/api/admin/right/{id}" name="{name}"/>"#)
            })
            .collect::<String>();
        format!(r#"<OrgRights xmlns="http://www.vmware.com/vcloud/v1.5">{refs}</OrgRights>"#)
    }

    /// Serves canned documents and records every call.
    #[derive(Default)]
    struct FakeClient {
        /// Successive bodies for reads of the org rights document. The last
        /// one repeats.
        org_rights: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<String>>,
        puts: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn with_org_rights(bodies: Vec<String>) -> Self {
            FakeClient {
                org_rights: Mutex::new(bodies.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl XmlTransport for FakeClient {
        async fn get_xml(&self, _: &SessionContext, url: &str, _: &str) -> Result<String> {
            self.calls.lock().unwrap().push(format!("GET {url}"));
            if url.ends_with("/admin") {
                return Ok(CATALOG.to_owned());
            }
            let mut bodies = self.org_rights.lock().unwrap();
            let body = if bodies.len() > 1 {
                bodies.pop_front()
            } else {
                bodies.front().cloned()
            };
            body.ok_or_else(|| RightsError::Transport("no canned response".to_owned()))
        }

        async fn put_xml(&self, _: &SessionContext, url: &str, _: &str, body: String) -> Result<()> {
            self.calls.lock().unwrap().push(format!("PUT {url}"));
            self.puts.lock().unwrap().push(body);
            Ok(())
        }
    }

    #[async_trait]
    impl OrgResolver for FakeClient {
        async fn resolve_org(&self, _: &SessionContext, org_name: &str) -> Result<OrgRef> {
            self.calls.lock().unwrap().push(format!("RESOLVE {org_name}"));
            if org_name == "Acme" {
                OrgRef::from_href("Acme", "https://vcd/api/org/acme-id")
            } else {
                Err(RightsError::org_not_found(org_name))
            }
        }
    }

    fn session() -> SessionContext {
        SessionContext::new("https://vcd/api", "token", "9.7")
    }

    #[tokio::test]
    async fn preconditions_fail_before_any_request() {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[])]));
        let mut offline = session();
        offline.connected = false;
        let old = SessionContext::new("https://vcd/api", "token", "5.5");
        let opts = WriteOptions::default();

        for s in [&offline, &old] {
            assert!(manager.list_catalog_rights(s).await.is_err());
            assert!(manager.get_org_assignment(s, "Acme").await.is_err());
            assert!(manager.get_enabled_view(s, "Acme").await.is_err());
            assert!(manager.add_org_right(s, "Acme", "Edit", &opts).await.is_err());
            assert!(manager.remove_org_right(s, "Acme", "Edit", &opts).await.is_err());
            assert!(manager
                .replace_org_rights(s, "Acme", &["Edit"], &opts)
                .await
                .is_err());
            assert!(manager
                .import_org_rights(s, "Acme", "name,enabled\n".as_bytes(), &opts)
                .await
                .is_err());
        }
        assert!(matches!(
            manager.list_catalog_rights(&offline).await,
            Err(RightsError::NotConnected)
        ));
        assert!(matches!(
            manager.list_catalog_rights(&old).await,
            Err(RightsError::UnsupportedServerVersion { .. })
        ));
        assert!(manager.client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enabled_view_overlays_catalog() -> Result<()> {
        let manager =
            RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[("r1", "View")])]));
        let view = manager.get_enabled_view(&session(), "Acme").await?;
        assert_eq!(
            view.iter()
                .map(|a| (a.name(), a.enabled))
                .collect::<Vec<_>>(),
            vec![("View", true), ("Edit", false), ("Delete", false)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn adding_unknown_right_is_not_found() {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[])]));
        let err = manager
            .add_org_right(&session(), "Acme", "Fly", &WriteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RightsError::NotFound { .. }));
        assert!(manager.client.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn adding_present_right_skips_the_write() -> Result<()> {
        let manager =
            RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[("r2", "Edit")])]));
        let outcome = manager
            .add_org_right(&session(), "Acme", "Edit", &WriteOptions::default())
            .await?;
        assert_eq!(outcome, EditOutcome::AlreadyPresent);
        assert!(manager.client.puts.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn removing_right_writes_whole_document() -> Result<()> {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[
            ("r1", "View"),
            ("r2", "Edit"),
        ])]));
        let outcome = manager
            .remove_org_right(&session(), "Acme", "Edit", &WriteOptions::default())
            .await?;
        assert_eq!(outcome, EditOutcome::Applied);

        let puts = manager.client.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert!(puts[0].contains("right/r1"));
        assert!(!puts[0].contains("right/r2"));
        assert!(manager
            .client
            .calls
            .lock()
            .unwrap()
            .contains(&"PUT https://vcd/api/admin/org/acme-id/rights".to_owned()));
        Ok(())
    }

    #[tokio::test]
    async fn removing_absent_right_is_a_noop() -> Result<()> {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[])]));
        let outcome = manager
            .remove_org_right(&session(), "Acme", "Edit", &WriteOptions::default())
            .await?;
        assert_eq!(outcome, EditOutcome::NotPresent);
        assert!(manager.client.puts.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn dry_run_replace_reports_without_writing() -> Result<()> {
        let manager =
            RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[("r1", "View")])]));
        let summary = manager
            .replace_org_rights(
                &session(),
                "Acme",
                &["Edit", "Teleport"],
                &WriteOptions {
                    dry_run: true,
                    ..Default::default()
                },
            )
            .await?;
        assert!(!summary.applied);
        assert_eq!(summary.unmatched, vec!["Teleport".to_owned()]);
        assert_eq!(summary.diff.add[0].name, "Edit");
        assert_eq!(summary.diff.remove[0].name, "View");
        assert!(manager.client.puts.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn replace_with_same_rights_writes_nothing() -> Result<()> {
        let manager =
            RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[("r1", "View")])]));
        let summary = manager
            .replace_org_rights(&session(), "Acme", &["View"], &WriteOptions::default())
            .await?;
        assert!(summary.diff.is_empty());
        assert!(!summary.applied);
        assert!(manager.client.puts.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn verify_unchanged_catches_concurrent_edit() {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![
            org_rights(&[("r1", "View")]),
            org_rights(&[("r1", "View"), ("r3", "Delete")]),
        ]));
        let err = manager
            .add_org_right(
                &session(),
                "Acme",
                "Edit",
                &WriteOptions {
                    verify_unchanged: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RightsError::ConcurrentModification { ref org } if org == "Acme"));
        assert!(manager.client.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dry_run_add_reports_without_writing() -> Result<()> {
        let manager =
            RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[("r1", "View")])]));
        let outcome = manager
            .add_org_right(
                &session(),
                "Acme",
                "Edit",
                &WriteOptions {
                    dry_run: true,
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(outcome, EditOutcome::DryRun);
        assert!(manager.client.puts.lock().unwrap().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn bad_csv_never_reaches_the_server() {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[])]));
        let err = manager
            .import_org_rights(
                &session(),
                "Acme",
                "right,on\nView,true\n".as_bytes(),
                &WriteOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RightsError::Format(_)));
        assert!(manager.client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_org_is_not_found() {
        let manager = RightsManager::new(FakeClient::with_org_rights(vec![org_rights(&[])]));
        let err = manager
            .get_org_assignment(&session(), "Initech")
            .await
            .unwrap_err();
        assert!(matches!(err, RightsError::NotFound { ref name, .. } if name == "Initech"));
    }
}
