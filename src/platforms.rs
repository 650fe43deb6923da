//! Platform scan orchestration.
//!
//! A source tree holds one extracted platform runtime per subdirectory
//! (e.g. `dotnet-dev-win-x64.latest/`). This module maps each subdirectory
//! to a platform label, resolves the shared-framework directory inside it,
//! and drives the symbol scanner over that directory's binaries, routing
//! every observation into the shared database under the platform's label.
//!
//! Enumeration and scanning are deterministic: directories and files are
//! processed in sorted order.

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::database::Database;
use crate::scanner::{PlatformRecorder, SymbolScanner};

/// Progress callback for platform scanning: (current binary, total binaries).
pub type ScanProgress = dyn Fn(usize, usize) + Send + Sync;

/// Error types for platform enumeration.
///
/// Every variant is a fatal configuration error: the whole run aborts and no
/// partial database is written.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Source root or platform directory cannot be read
    #[error("cannot read platform directory {}: {source}", .path.display())]
    Io {
        /// Directory that failed to enumerate
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Platform directory has no shared-framework subdirectory
    #[error("platform {platform} has no framework directory at {}", .path.display())]
    MissingFramework {
        /// Platform label
        platform: String,
        /// Expected framework path
        path: PathBuf,
    },

    /// No version directory matched the configured glob
    #[error("platform {platform} has no version directory matching {pattern} under {}", .path.display())]
    NoVersionDir {
        /// Platform label
        platform: String,
        /// Version glob pattern
        pattern: String,
        /// Framework directory searched
        path: PathBuf,
    },

    /// More than one version directory matched the configured glob
    #[error("platform {platform} has {found} version directories matching {pattern} under {}, expected exactly one", .path.display())]
    AmbiguousVersionDir {
        /// Platform label
        platform: String,
        /// Version glob pattern
        pattern: String,
        /// Framework directory searched
        path: PathBuf,
        /// Number of matching directories
        found: usize,
    },
}

/// Naming and layout conventions for a platform source tree.
///
/// Passed explicitly to enumeration (never ambient state): the label pattern
/// extracts a platform label from a directory name, the framework subpath
/// locates the shared framework inside each platform directory, and the
/// version glob selects the single framework version directory to scan.
#[derive(Debug, Clone)]
pub struct PlatformLayout {
    /// Pattern whose first capture group is the platform label; directory
    /// names that do not match fall back to the raw path as the label.
    pub label_pattern: Regex,
    /// Relative path from a platform directory to its shared framework.
    pub framework_subpath: PathBuf,
    /// Glob selecting the framework version directory (must match exactly one).
    pub version_glob: GlobMatcher,
}

impl PlatformLayout {
    /// Layout of the .NET Core SDK distribution archives
    /// (`dotnet-dev-<platform>-<arch>.latest/shared/Microsoft.NETCore.App/2.0.0*`).
    pub fn dotnet_sdk() -> Self {
        PlatformLayout {
            label_pattern: Regex::new(r"dotnet-dev-([^-]+)-[^-]+\.latest")
                .expect("static label pattern compiles"),
            framework_subpath: PathBuf::from("shared/Microsoft.NETCore.App"),
            version_glob: Glob::new("2.0.0*")
                .expect("static version glob compiles")
                .compile_matcher(),
        }
    }

    /// Derive the platform label for one platform root directory.
    fn label_for(&self, dir: &Path) -> String {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.label_pattern.captures(&name).and_then(|c| c.get(1)) {
            Some(capture) => capture.as_str().to_string(),
            None => dir.to_string_lossy().into_owned(),
        }
    }
}

/// One platform ready to scan: its label and its resolved framework version
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTarget {
    /// Platform label used to attribute observations
    pub label: String,
    /// Directory holding the platform's framework binaries
    pub framework_dir: PathBuf,
}

/// Enumerate the platforms under `root`, resolving each framework directory.
///
/// Every immediate subdirectory of `root` is one platform. Subdirectories
/// are processed in sorted name order so repeated runs see platforms (and
/// therefore assign CSV platform columns) in the same order. Framework
/// resolution is strict: zero or more than one matching version directory
/// aborts the run.
pub fn enumerate_platforms(
    root: &Path,
    layout: &PlatformLayout,
) -> Result<Vec<PlatformTarget>, PlatformError> {
    let mut roots = Vec::new();
    let dir_entries = std::fs::read_dir(root).map_err(|source| PlatformError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    for entry in dir_entries {
        let entry = entry.map_err(|source| PlatformError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() {
            roots.push(entry.path());
        }
    }
    roots.sort();

    let mut targets = Vec::new();
    for platform_root in roots {
        let label = layout.label_for(&platform_root);
        let framework_dir = resolve_framework_dir(&platform_root, &label, layout)?;
        targets.push(PlatformTarget {
            label,
            framework_dir,
        });
    }

    Ok(targets)
}

/// Resolve the single framework version directory for one platform.
fn resolve_framework_dir(
    platform_root: &Path,
    label: &str,
    layout: &PlatformLayout,
) -> Result<PathBuf, PlatformError> {
    let framework_path = platform_root.join(&layout.framework_subpath);
    if !framework_path.is_dir() {
        return Err(PlatformError::MissingFramework {
            platform: label.to_string(),
            path: framework_path,
        });
    }

    let mut matches = Vec::new();
    let dir_entries = std::fs::read_dir(&framework_path).map_err(|source| PlatformError::Io {
        path: framework_path.clone(),
        source,
    })?;
    for entry in dir_entries {
        let entry = entry.map_err(|source| PlatformError::Io {
            path: framework_path.clone(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            if let Some(name) = path.file_name() {
                if layout.version_glob.is_match(name) {
                    matches.push(path);
                }
            }
        }
    }
    matches.sort();

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(PlatformError::NoVersionDir {
            platform: label.to_string(),
            pattern: layout.version_glob.glob().glob().to_string(),
            path: framework_path,
        }),
        found => Err(PlatformError::AmbiguousVersionDir {
            platform: label.to_string(),
            pattern: layout.version_glob.glob().glob().to_string(),
            path: framework_path,
            found,
        }),
    }
}

/// Scan one platform's framework directory into the database.
///
/// Walks the framework directory, collects every file the scanner claims,
/// sorts them for deterministic ordering, and scans each one with a recorder
/// bound to the platform's label. Returns the number of binaries scanned.
pub fn scan_platform(
    database: &mut Database,
    target: &PlatformTarget,
    scanner: &mut dyn SymbolScanner,
    progress: Option<&ScanProgress>,
) -> Result<usize> {
    let mut binaries: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(&target.framework_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
    {
        let path = entry.path();
        if path.is_file() && scanner.handles(path) {
            binaries.push(path.to_path_buf());
        }
    }
    binaries.sort();

    let total = binaries.len();
    let mut recorder = PlatformRecorder::new(database, target.label.as_str());
    for (index, path) in binaries.iter().enumerate() {
        if let Some(cb) = progress {
            cb(index + 1, total);
        }
        scanner.scan_binary(path, &mut recorder)?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_extracted_from_matching_directory_name() {
        let layout = PlatformLayout::dotnet_sdk();
        let label = layout.label_for(Path::new("/tmp/sdk/dotnet-dev-win-x64.latest"));
        assert_eq!(label, "win");
    }

    #[test]
    fn label_falls_back_to_raw_path() {
        let layout = PlatformLayout::dotnet_sdk();
        let label = layout.label_for(Path::new("/tmp/sdk/custom-runtime"));
        assert_eq!(label, "/tmp/sdk/custom-runtime");
    }

    #[test]
    fn dotnet_layout_extracts_known_platforms() {
        let layout = PlatformLayout::dotnet_sdk();
        for (dir, expected) in [
            ("dotnet-dev-win-x64.latest", "win"),
            ("dotnet-dev-osx-x64.latest", "osx"),
            ("dotnet-dev-linux-x64.latest", "linux"),
        ] {
            assert_eq!(layout.label_for(Path::new(dir)), expected);
        }
    }
}
