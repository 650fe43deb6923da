//! File-level CSV codec tests: path helpers and curated-file shapes.

use std::fs;

use compat_gen::{codec, Database};
use tempfile::TempDir;

#[test]
fn export_then_import_path_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("surface.csv");

    let mut db = Database::new();
    db.add("M:System.Console.Beep", "System", "Console", "Beep", "win")
        .unwrap();
    db.add("M:System.Console.Beep", "System", "Console", "Beep", "osx")
        .unwrap();
    db.add(
        "P:System.IO.Pipes.PipeStream.CanRead",
        "System.IO.Pipes",
        "PipeStream",
        "CanRead",
        "linux",
    )
    .unwrap();
    codec::export_path(&db, &path).unwrap();

    let reimported = codec::import_path(&path).unwrap();
    assert_eq!(reimported.len(), db.len());
    for entry in db.entries() {
        let other = reimported.get(&entry.identity.doc_id).unwrap();
        assert_eq!(other.platforms, entry.platforms);
    }
}

#[test]
fn import_path_into_seeds_an_existing_database() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("include.csv");
    fs::write(&path, "DocId,Namespace,Type,Member,win,osx\nM:A.B,A,B,C,X,\n").unwrap();

    let mut db = Database::new();
    let rows = codec::import_path_into(&mut db, &path).unwrap();

    assert_eq!(rows, 1);
    let entry = db.get("M:A.B").unwrap();
    assert!(entry.has_platform("win"));
    assert!(!entry.has_platform("osx"));
    // Only platforms with at least one observation enter the column set.
    assert_eq!(db.platforms(), ["win"]);
}

#[test]
fn missing_curated_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let err = codec::import_path(&temp.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, codec::CodecError::Io(_)));
}

#[test]
fn quoted_fields_round_trip_through_files() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("surface.csv");

    let mut db = Database::new();
    db.add(
        "M:A.B.C(System.Int32,System.String)",
        "A",
        "B",
        "C",
        "win",
    )
    .unwrap();
    codec::export_path(&db, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"M:A.B.C(System.Int32,System.String)\""));

    let reimported = codec::import_path(&path).unwrap();
    assert!(reimported.contains("M:A.B.C(System.Int32,System.String)"));
}
