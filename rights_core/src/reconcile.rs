//! Reconcile an org's assigned rights against the global catalog.
//!
//! Everything here is pure. Edits operate on an [`OrgRightsDocument`]
//! in memory; sending it back is up to the caller.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
};

use colored::Colorize;

use crate::rights::{OrgRightAssignment, OrgRightsDocument, Right};

/// The result of a single-right edit.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The document changed.
    Applied,
    /// The document would change, but this was a dry run and nothing was
    /// sent.
    DryRun,
    /// The right was already assigned; nothing changed.
    AlreadyPresent,
    /// No assigned right had that name; nothing changed.
    NotPresent,
}

impl EditOutcome {
    /// Whether the edit left the document untouched.
    pub fn is_noop(&self) -> bool {
        matches!(self, EditOutcome::AlreadyPresent | EditOutcome::NotPresent)
    }
}

/// The result of replacing a whole assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Requested names with no catalog entry. These were dropped.
    pub unmatched: Vec<String>,
}

/// Overlay the catalog with one org's assignment.
///
/// Returns one entry per catalog right, in catalog order.
pub fn compute_enabled_view<'a, I>(catalog: &[Right], assigned: I) -> Vec<OrgRightAssignment>
where
    I: IntoIterator<Item = &'a str>,
{
    let assigned: HashSet<&str> = assigned.into_iter().collect();
    catalog
        .iter()
        .map(|right| OrgRightAssignment {
            right: right.to_owned(),
            enabled: assigned.contains(right.href.as_str()),
        })
        .collect()
}

/// Add a right to the document unless its href is already there.
pub fn add_right(doc: &mut OrgRightsDocument, right: &Right) -> EditOutcome {
    if doc.contains_href(&right.href) {
        return EditOutcome::AlreadyPresent;
    }
    doc.rights.push(right.to_owned());
    EditOutcome::Applied
}

/// Remove every reference named `name`.
///
/// Matching is by name, not href. Names are assumed to be unique within
/// one org's assignment.
pub fn remove_right(doc: &mut OrgRightsDocument, name: &str) -> EditOutcome {
    let before = doc.rights.len();
    doc.rights.retain(|r| r.name != name);
    if doc.rights.len() == before {
        EditOutcome::NotPresent
    } else {
        EditOutcome::Applied
    }
}

/// Replace the document's references with the catalog rights named in
/// `target_names`.
///
/// This is a total replacement, not a merge: whatever the document held
/// before is discarded. References are appended in catalog order. Names
/// that match nothing in the catalog are skipped and reported back.
pub fn replace_assignment<S: AsRef<str>>(
    doc: &mut OrgRightsDocument,
    catalog: &[Right],
    target_names: &[S],
) -> ReplaceOutcome {
    let targets: HashSet<&str> = target_names.iter().map(|n| n.as_ref()).collect();
    let catalog_names: HashSet<&str> = catalog.iter().map(|r| r.name.as_str()).collect();

    doc.rights.clear();
    let mut seen = HashSet::new();
    for right in catalog.iter().filter(|r| targets.contains(r.name.as_str())) {
        if seen.insert(right.href.as_str()) {
            doc.rights.push(right.to_owned());
        }
    }

    let mut unmatched = vec![];
    for name in target_names.iter().map(|n| n.as_ref()) {
        if !catalog_names.contains(name) && !unmatched.iter().any(|u: &String| u == name) {
            unmatched.push(name.to_owned());
        }
    }
    ReplaceOutcome { unmatched }
}

/// Rights that differ between two versions of an org's assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RightsDiff {
    /// In the target, not in the current document
    pub add: Vec<Right>,
    /// In the current document, not in the target
    pub remove: Vec<Right>,
}

impl RightsDiff {
    /// Whether the two documents reference the same rights.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

impl Display for RightsDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No changes found");
        }
        let mut text = "".to_owned();
        for right in &self.add {
            text += format!("{}", format!("+ right: {}\n", right.name).green()).as_str();
        }
        for right in &self.remove {
            text += format!("{}", format!("- right: {}\n", right.name).red()).as_str();
        }
        write!(f, "{text}")
    }
}

/// Compare two documents by href.
pub fn diff_assignment(current: &OrgRightsDocument, target: &OrgRightsDocument) -> RightsDiff {
    let current_refs: HashMap<&str, &Right> =
        current.rights().iter().map(|r| (r.href.as_str(), r)).collect();
    let target_refs: HashMap<&str, &Right> =
        target.rights().iter().map(|r| (r.href.as_str(), r)).collect();

    let mut add = target_refs
        .iter()
        .filter(|(href, _)| !current_refs.contains_key(*href))
        .map(|(_, r)| (*r).to_owned())
        .collect::<Vec<_>>();
    let mut remove = current_refs
        .iter()
        .filter(|(href, _)| !target_refs.contains_key(*href))
        .map(|(_, r)| (*r).to_owned())
        .collect::<Vec<_>>();
    add.sort_by(|a, b| a.name.cmp(&b.name).then(a.href.cmp(&b.href)));
    remove.sort_by(|a, b| a.name.cmp(&b.name).then(a.href.cmp(&b.href)));

    RightsDiff { add, remove }
}
