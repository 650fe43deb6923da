//! In-memory compatibility database.
//!
//! The database maps doc-ids to the set of platforms on which the observed
//! behavior occurs, plus the global list of known platform names. It is the
//! single mutable aggregate of the pipeline: curated inclusion rows, curated
//! exclusion rows, and scan observations all flow through [`Database::add`].
//!
//! # Determinism
//!
//! Entries are stored in a `BTreeMap` keyed by doc-id and platform names in
//! an insertion-ordered, deduplicated `Vec`. Same sequence of `add` calls
//! always produces the same observable state.

use std::collections::{BTreeMap, BTreeSet};

use crate::identity::SymbolIdentity;

/// Error types for database mutation.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// An `add` call supplied an empty doc-id
    #[error("blank doc-id (platform: {platform})")]
    BlankDocId {
        /// Platform the rejected observation was attributed to
        platform: String,
    },
}

/// Per-symbol record of which platforms exhibit the observed behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseEntry {
    /// Identity of the API member
    pub identity: SymbolIdentity,
    /// Platforms on which the behavior was observed (never empty)
    pub platforms: BTreeSet<String>,
}

impl DatabaseEntry {
    /// Whether this entry was observed on the given platform.
    pub fn has_platform(&self, platform: &str) -> bool {
        self.platforms.contains(platform)
    }
}

/// The compatibility database: one entry per doc-id, plus the global set of
/// platform names seen so far.
///
/// A database is created either empty ([`Database::new`]) or wrapping an
/// exclusion database ([`Database::with_exclusions`]); the exclusion database
/// acts purely as a negative filter and is never mutated afterward.
#[derive(Debug, Default)]
pub struct Database {
    entries: BTreeMap<String, DatabaseEntry>,
    /// Insertion-ordered, deduplicated. Order determines CSV column order.
    platforms: Vec<String>,
    exclusions: Option<Box<Database>>,
}

impl Database {
    /// Create an empty database with no exclusion filter.
    pub fn new() -> Self {
        Database::default()
    }

    /// Create an empty database that suppresses every doc-id present in
    /// `exclusions`.
    ///
    /// Exclusions represent manually-vetted false positives: "never show
    /// this regardless of new evidence." They are checked on every `add`
    /// call, so re-scans cannot reintroduce an excluded symbol.
    pub fn with_exclusions(exclusions: Database) -> Self {
        Database {
            entries: BTreeMap::new(),
            platforms: Vec::new(),
            exclusions: Some(Box::new(exclusions)),
        }
    }

    /// Record one observation: the API member identified by `doc_id` exhibits
    /// the behavior on `platform`.
    ///
    /// Creates the entry on first sighting or extends an existing entry's
    /// platform set. Both the per-entry insert and the global platform-list
    /// insert are idempotent; adding the same observation twice is a no-op.
    ///
    /// Name fields are stored verbatim from the call that creates the entry.
    /// Later calls for the same doc-id only add platforms; if they disagree
    /// on the names, the first writer wins. This is the contract relied on by
    /// inclusion seeding: curated rows are added before any scan observation
    /// and therefore pin the display names for their doc-ids.
    ///
    /// If an exclusion database is configured and contains `doc_id`, the call
    /// is a silent no-op for every platform.
    ///
    /// # Errors
    /// Returns [`DatabaseError::BlankDocId`] if `doc_id` is empty.
    pub fn add(
        &mut self,
        doc_id: &str,
        namespace_name: &str,
        type_name: &str,
        member_name: &str,
        platform: &str,
    ) -> Result<(), DatabaseError> {
        if doc_id.is_empty() {
            return Err(DatabaseError::BlankDocId {
                platform: platform.to_string(),
            });
        }

        if let Some(exclusions) = &self.exclusions {
            if exclusions.contains(doc_id) {
                return Ok(());
            }
        }

        let entry = self
            .entries
            .entry(doc_id.to_string())
            .or_insert_with(|| DatabaseEntry {
                identity: SymbolIdentity::new(doc_id, namespace_name, type_name, member_name),
                platforms: BTreeSet::new(),
            });
        entry.platforms.insert(platform.to_string());

        if !self.platforms.iter().any(|p| p == platform) {
            self.platforms.push(platform.to_string());
        }

        Ok(())
    }

    /// Whether an entry exists for `doc_id`.
    pub fn contains(&self, doc_id: &str) -> bool {
        self.entries.contains_key(doc_id)
    }

    /// Look up the entry for `doc_id`.
    pub fn get(&self, doc_id: &str) -> Option<&DatabaseEntry> {
        self.entries.get(doc_id)
    }

    /// All entries, iterated in doc-id order.
    ///
    /// Callers must not rely on this order as a contract; CSV export applies
    /// its own name-based ordering.
    pub fn entries(&self) -> impl Iterator<Item = &DatabaseEntry> {
        self.entries.values()
    }

    /// Platform names in first-sighting order.
    ///
    /// Invariant: this list equals the union of every entry's platform set.
    /// It is maintained incrementally by `add`, never recomputed.
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the database holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
