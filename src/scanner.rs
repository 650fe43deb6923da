//! Symbol-scanner seam.
//!
//! Binary introspection is an external collaborator: something else inspects
//! each platform binary and decides which API members exhibit the behavior
//! of interest. This module defines the boundary — the observation record,
//! the producer trait, the database-backed consumer — plus the shipped
//! adapter that reads the newline-delimited JSON observation logs the
//! scanner service writes next to each binary it processed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::database::Database;

/// One scanner event: an API member observed to exhibit the behavior under
/// scan, with its doc-id and decomposed display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Canonical doc-id of the API member
    pub doc_id: String,
    /// Containing namespace
    pub namespace_name: String,
    /// Declaring type name
    pub type_name: String,
    /// Member name
    pub member_name: String,
}

/// Consumer side of the scanner boundary.
///
/// A sink receives every observation a scanner yields for one binary. Sinks
/// decide attribution; scanners stay platform-agnostic.
pub trait ObservationSink {
    /// Record one observation.
    fn record(&mut self, observation: &Observation) -> Result<()>;
}

/// Sink that routes observations into a [`Database`] under a fixed platform
/// label.
///
/// One recorder is created per platform scan, so every observation a
/// scanner yields while that platform is being processed lands under that
/// platform's label, however the scanner orders its output.
pub struct PlatformRecorder<'a> {
    database: &'a mut Database,
    platform: String,
}

impl<'a> PlatformRecorder<'a> {
    /// Create a recorder attributing observations to `platform`.
    pub fn new(database: &'a mut Database, platform: impl Into<String>) -> Self {
        PlatformRecorder {
            database,
            platform: platform.into(),
        }
    }
}

impl ObservationSink for PlatformRecorder<'_> {
    fn record(&mut self, observation: &Observation) -> Result<()> {
        self.database.add(
            &observation.doc_id,
            &observation.namespace_name,
            &observation.type_name,
            &observation.member_name,
            &self.platform,
        )?;
        Ok(())
    }
}

/// Producer side of the scanner boundary.
///
/// A scanner is invoked once per binary it claims via [`handles`]; each
/// invocation yields a finite, single-pass sequence of observations into the
/// sink. Scanning one binary never requires revisiting another, and a
/// binary's sequence is never restarted.
///
/// [`handles`]: SymbolScanner::handles
pub trait SymbolScanner {
    /// Whether this scanner knows how to process the file at `path`.
    fn handles(&self, path: &Path) -> bool;

    /// Scan one binary, feeding every observation into `sink`.
    fn scan_binary(&mut self, path: &Path, sink: &mut dyn ObservationSink) -> Result<()>;
}

/// Adapter for the external scanner service's observation logs.
///
/// The service leaves one `*.ndjson` file per scanned binary, one JSON
/// observation object per line. This scanner claims those logs and replays
/// them; a malformed line is a fatal error (fail fast, no partial output).
#[derive(Debug, Default)]
pub struct NdjsonScanner;

impl NdjsonScanner {
    /// File extension claimed by this scanner.
    pub const EXTENSION: &'static str = "ndjson";

    pub fn new() -> Self {
        NdjsonScanner
    }
}

impl SymbolScanner for NdjsonScanner {
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == Self::EXTENSION)
            .unwrap_or(false)
    }

    fn scan_binary(&mut self, path: &Path, sink: &mut dyn ObservationSink) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("cannot open observation log {}", path.display()))?;
        let reader = BufReader::new(file);

        for (index, line) in reader.lines().enumerate() {
            let line = line
                .with_context(|| format!("cannot read observation log {}", path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let observation: Observation = serde_json::from_str(&line).with_context(|| {
                format!("malformed observation at {}:{}", path.display(), index + 1)
            })?;
            sink.record(&observation)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn recorder_attributes_observations_to_its_platform() {
        let mut db = Database::new();
        let mut recorder = PlatformRecorder::new(&mut db, "linux");

        let observation = Observation {
            doc_id: "M:A.B.C".to_string(),
            namespace_name: "A".to_string(),
            type_name: "B".to_string(),
            member_name: "C".to_string(),
        };
        recorder.record(&observation).unwrap();

        assert!(db.get("M:A.B.C").unwrap().has_platform("linux"));
    }

    #[test]
    fn ndjson_scanner_claims_only_its_extension() {
        let scanner = NdjsonScanner::new();
        assert!(scanner.handles(Path::new("System.Console.ndjson")));
        assert!(!scanner.handles(Path::new("System.Console.dll")));
        assert!(!scanner.handles(Path::new("noextension")));
    }

    #[test]
    fn ndjson_scanner_replays_log_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("lib.ndjson");
        let mut file = File::create(&log).unwrap();
        writeln!(
            file,
            r#"{{"docId":"M:A.B.C","namespaceName":"A","typeName":"B","memberName":"C"}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"docId":"M:D.E.F","namespaceName":"D","typeName":"E","memberName":"F"}}"#
        )
        .unwrap();
        drop(file);

        let mut db = Database::new();
        let mut recorder = PlatformRecorder::new(&mut db, "win");
        NdjsonScanner::new()
            .scan_binary(&log, &mut recorder)
            .unwrap();

        assert_eq!(db.len(), 2);
        assert!(db.contains("M:A.B.C"));
        assert!(db.contains("M:D.E.F"));
    }

    #[test]
    fn ndjson_scanner_fails_on_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("lib.ndjson");
        std::fs::write(&log, "not json\n").unwrap();

        let mut db = Database::new();
        let mut recorder = PlatformRecorder::new(&mut db, "win");
        let err = NdjsonScanner::new().scan_binary(&log, &mut recorder);
        assert!(err.is_err());
    }
}
