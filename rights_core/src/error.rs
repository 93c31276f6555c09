//! Error taxonomy shared by every rights operation.
//!
//! All of these are terminal for the operation that produced them. Nothing
//! is retried internally, and a failure before the final PUT leaves the
//! org's server-side state untouched.

use std::fmt::Display;

use thiserror::Error;

use crate::session::ServerVersion;

/// Convenience alias used across the rights crates.
pub type Result<T, E = RightsError> = std::result::Result<T, E>;

/// The kind of object a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// An organization, looked up by name.
    Org,
    /// A right, looked up by name in the catalog.
    Right,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Org => write!(f, "org"),
            ObjectKind::Right => write!(f, "right"),
        }
    }
}

/// Errors raised by rights operations.
#[derive(Debug, Error)]
pub enum RightsError {
    /// There is no active session to make requests with.
    #[error("not connected: establish a session before managing rights")]
    NotConnected,
    /// The connected server predates the rights management endpoints.
    #[error("server version {found} does not support rights management (requires {minimum} or later)")]
    UnsupportedServerVersion {
        /// The version reported by the session, as given
        found: String,
        /// The lowest supported version
        minimum: ServerVersion,
    },
    /// An org or right could not be resolved by name.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// What was being looked up
        kind: ObjectKind,
        /// The name that failed to resolve
        name: String,
    },
    /// A network or HTTP-level failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// XML that isn't the shape we expect, or that couldn't be written.
    #[error("invalid xml: {0}")]
    Parse(String),
    /// Malformed CSV input.
    #[error("invalid csv: {0}")]
    Format(String),
    /// The org rights document changed between the read and the write.
    #[error("rights for org {org} were modified on the server while being edited; nothing was written")]
    ConcurrentModification {
        /// The org being edited
        org: String,
    },
    /// Reading or writing a local file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RightsError {
    /// Shorthand for a failed org lookup.
    pub fn org_not_found<S: Into<String>>(name: S) -> Self {
        RightsError::NotFound {
            kind: ObjectKind::Org,
            name: name.into(),
        }
    }

    /// Shorthand for a failed right lookup.
    pub fn right_not_found<S: Into<String>>(name: S) -> Self {
        RightsError::NotFound {
            kind: ObjectKind::Right,
            name: name.into(),
        }
    }
}

impl From<csv::Error> for RightsError {
    fn from(e: csv::Error) -> Self {
        RightsError::Format(e.to_string())
    }
}
