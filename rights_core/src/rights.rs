//! Rights and the org documents that reference them.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A permission known to the server, identified by its href.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Right {
    /// Stable reference to the right.
    pub href: String,
    /// Human-readable name, e.g. "vApp: Edit Properties".
    pub name: String,
    /// Media type attribute carried on the reference, if any.
    pub media_type: Option<String>,
}

impl Right {
    /// Basic constructor
    pub fn new<S: Into<String>>(href: S, name: S) -> Self {
        Self {
            href: href.into(),
            name: name.into(),
            media_type: None,
        }
    }

    /// Set the media type of the reference.
    pub fn with_media_type<S: Into<String>>(mut self, media_type: S) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

impl Display for Right {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A catalog right together with whether one org has it enabled.
///
/// This is a view: it's rebuilt from the catalog and the org document
/// every time, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgRightAssignment {
    /// The catalog entry
    pub right: Right,
    /// Whether the org currently has it
    pub enabled: bool,
}

impl OrgRightAssignment {
    /// The right's name.
    pub fn name(&self) -> &str {
        &self.right.name
    }
}

/// The full set of rights assigned to one org.
///
/// This is the unit of read-modify-write. It's fetched whole, edited in
/// memory, and sent back whole. The server has no concurrency token for
/// it, so a concurrent writer between our read and our write gets
/// silently overwritten (last writer wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgRightsDocument {
    /// The document's own href.
    pub href: Option<String>,
    /// The document's media type.
    pub media_type: Option<String>,
    pub(crate) rights: Vec<Right>,
}

impl OrgRightsDocument {
    /// Build a document from a list of references.
    pub fn new(href: Option<String>, media_type: Option<String>, rights: Vec<Right>) -> Self {
        Self {
            href,
            media_type,
            rights,
        }
    }

    /// The references in document order.
    pub fn rights(&self) -> &[Right] {
        &self.rights
    }

    /// The hrefs of every reference in document order.
    pub fn hrefs(&self) -> impl Iterator<Item = &str> {
        self.rights.iter().map(|r| r.href.as_str())
    }

    /// Whether the document references `href`.
    pub fn contains_href(&self, href: &str) -> bool {
        self.rights.iter().any(|r| r.href == href)
    }

    /// Number of references.
    pub fn len(&self) -> usize {
        self.rights.len()
    }

    /// Whether the document references nothing.
    pub fn is_empty(&self) -> bool {
        self.rights.is_empty()
    }
}
