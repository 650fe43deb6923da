//! End-to-end generation pipeline.
//!
//! Wires the curated datasets, platform enumeration, scanner, and CSV
//! export into one run:
//!
//! 1. load the exclusion CSV (if any) into a standalone database;
//! 2. construct the working database filtered by that exclusion set;
//! 3. replay the inclusion CSV (if any) through `add`, pinning display
//!    names for curated doc-ids before any scan observation lands;
//! 4. scan every platform under the source tree;
//! 5. export the working database to the output path.
//!
//! Fail-fast: any step error aborts the run, and the output file is only
//! written after all scanning has succeeded, so a failed run never leaves a
//! partial database behind.

use std::path::PathBuf;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::codec;
use crate::database::Database;
use crate::platforms::{enumerate_platforms, scan_platform, PlatformLayout};
use crate::scanner::SymbolScanner;

/// Inputs for one generation run, constructed at startup and threaded
/// through explicitly.
#[derive(Debug)]
pub struct GenerateOptions {
    /// Root directory holding one extracted platform runtime per subdirectory
    pub source_path: PathBuf,
    /// Output CSV path
    pub output_path: PathBuf,
    /// Curated exclusion CSV: doc-ids to suppress regardless of scan evidence
    pub exclusion_file: Option<PathBuf>,
    /// Curated inclusion CSV: known-true facts seeded before scanning
    pub inclusion_file: Option<PathBuf>,
    /// Source tree naming and layout conventions
    pub layout: PlatformLayout,
}

/// Summary of a completed run.
#[derive(Debug)]
pub struct GenerateReport {
    /// Platform labels scanned, in column order
    pub platforms: Vec<String>,
    /// Total binaries scanned across all platforms
    pub binaries_scanned: usize,
    /// Entries in the exported database
    pub entries: usize,
}

/// Run the full pipeline with the given scanner.
pub fn run_generate(
    options: &GenerateOptions,
    scanner: &mut dyn SymbolScanner,
) -> Result<GenerateReport> {
    let mut database = match &options.exclusion_file {
        Some(path) => {
            let exclusions = codec::import_path(path)
                .with_context(|| format!("cannot load exclusion file {}", path.display()))?;
            Database::with_exclusions(exclusions)
        }
        None => Database::new(),
    };

    if let Some(path) = &options.inclusion_file {
        codec::import_path_into(&mut database, path)
            .with_context(|| format!("cannot load inclusion file {}", path.display()))?;
    }

    let targets = enumerate_platforms(&options.source_path, &options.layout)
        .with_context(|| format!("cannot enumerate platforms in {}", options.source_path.display()))?;

    let mut binaries_scanned = 0;
    for target in &targets {
        let bar = platform_progress_bar(&target.label);
        let progress = {
            let bar = bar.clone();
            move |current: usize, total: usize| {
                bar.set_length(total as u64);
                bar.set_position(current as u64);
            }
        };
        binaries_scanned += scan_platform(&mut database, target, scanner, Some(&progress))
            .with_context(|| format!("scan failed for platform {}", target.label))?;
        bar.finish_and_clear();
    }

    codec::export_path(&database, &options.output_path)
        .with_context(|| format!("cannot write output file {}", options.output_path.display()))?;

    Ok(GenerateReport {
        platforms: database.platforms().to_vec(),
        binaries_scanned,
        entries: database.len(),
    })
}

/// Per-platform progress bar; hidden automatically when stderr is not a
/// terminal, so tests and redirected runs stay silent.
fn platform_progress_bar(label: &str) -> ProgressBar {
    let bar = ProgressBar::new(0).with_message(label.to_string());
    bar.set_style(
        ProgressStyle::with_template("{msg:12} [{bar:30}] {pos}/{len}")
            .expect("static progress template compiles")
            .progress_chars("=> "),
    );
    bar
}
