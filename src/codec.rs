//! CSV persistence for the compatibility database.
//!
//! The on-disk shape is one row per symbol and one column per platform:
//!
//! ```text
//! DocId,Namespace,Type,Member,linux,osx,win
//! M:System.Console.Beep,System,Console,Beep,,X,X
//! ```
//!
//! Platform cells hold the literal marker `X` for presence, empty for
//! absence. Export ordering is a stability contract: rows are sorted by
//! `(namespace, type, member, doc-id)` ascending so that regenerated files
//! diff cleanly. Import accepts the same shape back, including hand-edited
//! files (rows shorter than the header, rows whose platform cells are all
//! blank).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::database::{Database, DatabaseError};

/// Number of fixed leading columns (DocId, Namespace, Type, Member).
const FIXED_COLUMNS: usize = 4;

/// Presence marker written to platform cells.
const PRESENCE_MARKER: &str = "X";

/// Error types for CSV import/export.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Underlying file I/O failure
    #[error("csv file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// CSV-level parse or write failure (bad quoting, encoding)
    #[error("csv parse failed: {0}")]
    Csv(#[from] csv::Error),

    /// Header row missing or narrower than the four fixed columns
    #[error("csv header has {found} columns, expected at least {FIXED_COLUMNS} (DocId,Namespace,Type,Member)")]
    MalformedHeader {
        /// Number of header columns found
        found: usize,
    },

    /// Data row wider than the header row
    #[error("csv row {line} has {found} columns, header declares {header}")]
    RowTooWide {
        /// 1-based line number of the offending row
        line: u64,
        /// Number of columns in the row
        found: usize,
        /// Number of columns in the header
        header: usize,
    },

    /// Data row with a blank DocId field
    #[error("csv row {line} has a blank DocId")]
    BlankDocId {
        /// 1-based line number of the offending row
        line: u64,
    },

    /// Observation rejected by the database
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Export a database as CSV to `writer`.
///
/// Writes the fixed header columns followed by platform columns in database
/// insertion order, then one row per entry in sort-key order. Exporting the
/// same database twice yields byte-identical output. An empty database
/// produces a header-only file.
pub fn export<W: Write>(database: &Database, writer: W) -> Result<(), CodecError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["DocId", "Namespace", "Type", "Member"];
    for platform in database.platforms() {
        header.push(platform);
    }
    csv_writer.write_record(&header)?;

    let mut entries: Vec<_> = database.entries().collect();
    entries.sort_by(|a, b| a.identity.sort_key().cmp(&b.identity.sort_key()));

    for entry in entries {
        let mut row = vec![
            entry.identity.doc_id.as_str(),
            entry.identity.namespace_name.as_str(),
            entry.identity.type_name.as_str(),
            entry.identity.member_name.as_str(),
        ];
        for platform in database.platforms() {
            row.push(if entry.has_platform(platform) {
                PRESENCE_MARKER
            } else {
                ""
            });
        }
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export a database as CSV to the file at `path`, creating or truncating it.
pub fn export_path(database: &Database, path: &Path) -> Result<(), CodecError> {
    let file = File::create(path)?;
    export(database, file)
}

/// Import CSV rows from `reader` into an existing database.
///
/// The header row fixes the platform-name-to-column mapping; every data row
/// issues one `add` per non-blank platform cell (cells are trimmed before
/// the blank test — any non-blank content counts as presence). Rows shorter
/// than the header are legal: missing cells read as blank, since hand-edited
/// files routinely drop trailing empty fields. Rows wider than the header,
/// a header with fewer than four columns, and blank DocId fields are hard
/// errors; partial rows already imported are left in place, so callers that
/// need all-or-nothing behavior import into a scratch database first.
///
/// Returns the number of data rows processed.
pub fn import_into<R: Read>(database: &mut Database, reader: R) -> Result<usize, CodecError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(CodecError::MalformedHeader { found: 0 }),
    };
    if header.len() < FIXED_COLUMNS {
        return Err(CodecError::MalformedHeader {
            found: header.len(),
        });
    }

    let mut rows = 0;
    for record in records {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() > header.len() {
            return Err(CodecError::RowTooWide {
                line,
                found: record.len(),
                header: header.len(),
            });
        }

        let field = |index: usize| record.get(index).unwrap_or("");
        let doc_id = field(0);
        if doc_id.trim().is_empty() {
            return Err(CodecError::BlankDocId { line });
        }

        // A row whose platform cells are all blank contributes no
        // observations; it is accepted without creating an entry.
        for (index, platform) in header.iter().enumerate().skip(FIXED_COLUMNS) {
            if !field(index).trim().is_empty() {
                database.add(doc_id, field(1), field(2), field(3), platform)?;
            }
        }

        rows += 1;
    }

    Ok(rows)
}

/// Import the CSV file at `path` into a fresh database.
pub fn import_path(path: &Path) -> Result<Database, CodecError> {
    let file = File::open(path)?;
    let mut database = Database::new();
    import_into(&mut database, file)?;
    Ok(database)
}

/// Import the CSV file at `path` into an existing database.
///
/// Used for inclusion seeding: curated rows replayed through `add` before
/// any scan observation pin the display names for their doc-ids.
pub fn import_path_into(database: &mut Database, path: &Path) -> Result<usize, CodecError> {
    let file = File::open(path)?;
    import_into(database, file)
}
