//! compat-gen: a deterministic API compatibility surface generator.
//!
//! For every API symbol of interest (an exception thrown, an API present or
//! absent), compat-gen records which target platforms exhibit that behavior
//! and writes the result as a normalized CSV matrix: one row per symbol, one
//! column per platform, `X` marking presence. The output drives downstream
//! tooling such as analyzers that warn about platform-specific runtime
//! behavior.
//!
//! # Pipeline
//!
//! 1. A curated *exclusion* CSV (vetted false positives) is loaded into a
//!    standalone database and wired in as a negative filter.
//! 2. A curated *inclusion* CSV (known-true facts) seeds the working
//!    database before scanning, pinning display names for its doc-ids.
//! 3. Each platform runtime directory under the source tree is scanned by
//!    the external symbol scanner; observations land in the working database
//!    under that platform's label.
//! 4. The database is exported as CSV with a stable, diff-friendly ordering.
//!
//! Binary introspection and archive download/extraction are external
//! collaborators; this crate defines the seams ([`SymbolScanner`],
//! pre-extracted source trees) and the aggregation core.

pub mod cli;
pub mod codec;
pub mod database;
pub mod generate;
pub mod identity;
pub mod platforms;
pub mod scanner;

pub use codec::CodecError;
pub use database::{Database, DatabaseEntry, DatabaseError};
pub use generate::{run_generate, GenerateOptions, GenerateReport};
pub use identity::{IdentityError, SymbolIdentity};
pub use platforms::{
    enumerate_platforms, scan_platform, PlatformError, PlatformLayout, PlatformTarget,
    ScanProgress,
};
pub use scanner::{NdjsonScanner, Observation, ObservationSink, PlatformRecorder, SymbolScanner};
