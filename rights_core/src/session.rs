//! The session context every operation reads from.
//!
//! Logging in is somebody else's job: a session is established externally
//! and handed to us as a YAML file. We only ever read it.

use std::fs;
use std::path::Path;
use std::{cmp::Ordering, fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use yaml_peg::serde as yaml;

use crate::error::{Result, RightsError};
use crate::logging::debug;

/// The first server release that exposes org rights management.
pub const MINIMUM_SERVER_VERSION: &str = "8.20";

/// API version requested when the session file doesn't name one.
pub const DEFAULT_API_VERSION: &str = "27.0";

/// A dot-separated numeric server version, such as `9.1.0.1234`.
///
/// Missing trailing components compare as zero, so `8.20` == `8.20.0`.
#[derive(Debug, Clone, Eq)]
pub struct ServerVersion(Vec<u64>);

impl ServerVersion {
    /// The lowest version that supports the rights endpoints.
    pub fn minimum_supported() -> Self {
        // MINIMUM_SERVER_VERSION is a well-formed constant
        MINIMUM_SERVER_VERSION
            .parse()
            .unwrap_or_else(|_| ServerVersion(vec![8, 20]))
    }

    /// Whether this version is at least `other`.
    pub fn at_least(&self, other: &ServerVersion) -> bool {
        self >= other
    }

    fn component(&self, idx: usize) -> u64 {
        self.0.get(idx).copied().unwrap_or(0)
    }
}

impl FromStr for ServerVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("empty server version"));
        }
        trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .with_context(|| format!("invalid server version component {part:?} in {s:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(ServerVersion)
    }
}

impl PartialEq for ServerVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for ServerVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl Display for ServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self.0.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        write!(f, "{}", parts.join("."))
    }
}

/// Connection state for an externally established session.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SessionContext {
    /// Whether the session is live.
    #[serde(default)]
    pub connected: bool,
    /// The token sent with every request.
    pub session_token: String,
    /// The version reported by the server at login.
    pub server_version: String,
    /// Base URL of the API, e.g. `https://vcd.example.com/api`.
    pub service_base_url: String,
    /// API version to request in the `Accept` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

impl SessionContext {
    /// Basic constructor for a connected session.
    pub fn new<S: Into<String>>(service_base_url: S, session_token: S, server_version: S) -> Self {
        Self {
            connected: true,
            session_token: session_token.into(),
            server_version: server_version.into(),
            service_base_url: service_base_url.into(),
            api_version: default_api_version(),
        }
    }

    /// Read a session from a YAML file.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<SessionContext> {
        debug!("Trying to read session from {:?}", path.as_ref());
        let session_raw = fs::read_to_string(&path).context("Reading session file")?;
        Self::from_yaml(&session_raw)
    }

    /// Parse a session from a YAML string.
    pub fn from_yaml(raw: &str) -> anyhow::Result<SessionContext> {
        let mut sessions = yaml::from_str::<SessionContext>(raw).context("Deserializing session")?;
        sessions
            .pop()
            .ok_or_else(|| anyhow!["session file was empty"])
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.service_base_url.trim_end_matches('/')
    }

    /// Check that this session can be used for rights management at all.
    ///
    /// Every public operation calls this before making a request.
    pub fn ensure_rights_supported(&self) -> Result<()> {
        if !self.connected || self.session_token.is_empty() {
            return Err(RightsError::NotConnected);
        }
        let minimum = ServerVersion::minimum_supported();
        // An unparseable version can't be shown to meet the threshold.
        let supported = self
            .server_version
            .parse::<ServerVersion>()
            .map(|found| found.at_least(&minimum))
            .unwrap_or(false);
        if !supported {
            return Err(RightsError::UnsupportedServerVersion {
                found: self.server_version.to_owned(),
                minimum,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_compare_numerically() -> anyhow::Result<()> {
        let v = |s: &str| s.parse::<ServerVersion>();
        assert!(v("8.20")? > v("8.10.1")?);
        assert!(v("9.0")? > v("8.20.0.1234")?);
        assert!(v("10.0")? > v("9.7")?);
        assert_eq!(v("8.20")?, v("8.20.0")?);
        assert!(v("8.a").is_err());
        assert!(v("").is_err());
        Ok(())
    }

    #[test]
    fn version_display_round_trips() -> anyhow::Result<()> {
        assert_eq!("9.1.0.1234".parse::<ServerVersion>()?.to_string(), "9.1.0.1234");
        Ok(())
    }

    #[test]
    fn disconnected_session_is_rejected() {
        let mut session = SessionContext::new("https://vcd.example.com/api", "token", "9.1");
        session.connected = false;
        assert!(matches!(
            session.ensure_rights_supported(),
            Err(RightsError::NotConnected)
        ));

        let session = SessionContext::new("https://vcd.example.com/api", "", "9.1");
        assert!(matches!(
            session.ensure_rights_supported(),
            Err(RightsError::NotConnected)
        ));
    }

    #[test]
    fn old_servers_are_rejected() {
        let session = SessionContext::new("https://vcd.example.com/api", "token", "8.10.2");
        match session.ensure_rights_supported() {
            Err(RightsError::UnsupportedServerVersion { found, minimum }) => {
                assert_eq!(found.to_string(), "8.10.2");
                assert_eq!(minimum.to_string(), MINIMUM_SERVER_VERSION);
            }
            other => panic!("expected UnsupportedServerVersion, got {other:?}"),
        }

    }

    #[test]
    fn unparseable_version_is_reported_as_given() {
        let session = SessionContext::new("https://vcd.example.com/api", "token", "garbage");
        let err = session.ensure_rights_supported().unwrap_err();
        assert!(matches!(err, RightsError::UnsupportedServerVersion { ref found, .. } if found == "garbage"));
        assert_eq!(
            err.to_string(),
            "server version garbage does not support rights management (requires 8.20 or later)"
        );
    }

    #[test]
    fn supported_session_passes() {
        let session = SessionContext::new("https://vcd.example.com/api/", "token", "8.20.0.2345");
        assert!(session.ensure_rights_supported().is_ok());
        assert_eq!(session.base_url(), "https://vcd.example.com/api");
    }

    #[test]
    fn session_parses_from_yaml() -> anyhow::Result<()> {
        let session = SessionContext::from_yaml(
            "connected: true\n\
             session_token: abc123\n\
             server_version: \"9.7.0\"\n\
             service_base_url: https://vcd.example.com/api\n",
        )?;
        assert!(session.connected);
        assert_eq!(session.session_token, "abc123");
        assert_eq!(session.api_version, DEFAULT_API_VERSION);
        Ok(())
    }
}
