//! Flat CSV form of an org's enabled view, for editing by hand.
//!
//! The file has a header row and two columns, `name` and `enabled`,
//! with `enabled` written as `true` or `false`.

use std::{fs::File, io, path::Path};

use serde::Serialize;

use crate::{
    error::{Result, RightsError},
    rights::OrgRightAssignment,
};

const NAME_COLUMN: &str = "name";
const ENABLED_COLUMN: &str = "enabled";

#[derive(Serialize)]
struct ViewRow<'a> {
    name: &'a str,
    enabled: bool,
}

/// Write the view as CSV, one row per assignment.
pub fn export_view<W: io::Write>(view: &[OrgRightAssignment], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if view.is_empty() {
        // serialize() writes headers lazily, so an empty view needs them spelled out
        wtr.write_record([NAME_COLUMN, ENABLED_COLUMN])?;
    }
    for assignment in view {
        wtr.serialize(ViewRow {
            name: assignment.name(),
            enabled: assignment.enabled,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the view to a CSV file, replacing it if it exists.
pub fn export_view_to_path<P: AsRef<Path>>(view: &[OrgRightAssignment], path: P) -> Result<()> {
    let file = File::create(path)?;
    export_view(view, file)
}

/// Read the names of every enabled row.
///
/// Names are kept exactly as written. `enabled` is trimmed and compared
/// case-insensitively; values other than `true` or `false` are rejected
/// rather than guessed at.
pub fn import_view<R: io::Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.to_owned();
    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RightsError::Format(format!("missing required column {wanted:?}")))
    };
    let (name_idx, enabled_idx) = (column(NAME_COLUMN)?, column(ENABLED_COLUMN)?);

    let mut names = vec![];
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // +2: one for the header, one for 1-based line numbers
        let line = row + 2;
        let field = |idx: usize, col: &str| {
            record
                .get(idx)
                .ok_or_else(|| RightsError::Format(format!("line {line}: missing {col} value")))
        };
        let name = field(name_idx, NAME_COLUMN)?;
        let enabled = field(enabled_idx, ENABLED_COLUMN)?.trim();

        if enabled.eq_ignore_ascii_case("true") {
            names.push(name.to_owned());
        } else if !enabled.eq_ignore_ascii_case("false") {
            return Err(RightsError::Format(format!(
                "line {line}: expected true or false for {name:?}, found {enabled:?}"
            )));
        }
    }
    Ok(names)
}

/// Read the enabled names from a CSV file.
pub fn import_view_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    import_view(file)
}
