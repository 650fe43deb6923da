//! CLI argument parsing for compat-gen.
//!
//! Defines the Options struct and parse_args() for the single generate
//! command exposed by the binary.

use std::path::PathBuf;

use anyhow::Result;

pub fn print_usage() {
    eprintln!("compat-gen - Deterministic API compatibility surface generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  compat-gen --src <DIR> --out <FILE> [--exclusions <FILE>] [--include <FILE>]");
    eprintln!("  compat-gen --help");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  --src <DIR>          Source tree with one extracted platform runtime per subdirectory");
    eprintln!("  --out <FILE>         Output CSV path");
    eprintln!("  --exclusions <FILE>  Curated CSV of doc-ids to suppress (vetted false positives)");
    eprintln!("  --include <FILE>     Curated CSV of known-true rows seeded before scanning");
    eprintln!();
    eprintln!("Archive download and extraction are external: point --src at an");
    eprintln!("already-extracted source tree.");
}

/// Parsed command-line options.
#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub exclusion_file: Option<PathBuf>,
    pub inclusion_file: Option<PathBuf>,
}

/// Parse process arguments.
///
/// `--help`/`-h` prints usage and exits 0. Every other parse failure is
/// returned as an error for main to report with exit code 1.
pub fn parse_args() -> Result<Options> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        std::process::exit(0);
    }

    parse_from(&args)
}

/// Parse an argument list (testable core of [`parse_args`]).
pub fn parse_from(args: &[String]) -> Result<Options> {
    let mut source_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut exclusion_file: Option<PathBuf> = None;
    let mut inclusion_file: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--src" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--src requires an argument"));
                }
                source_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--out" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--out requires an argument"));
                }
                output_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--exclusions" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--exclusions requires an argument"));
                }
                exclusion_file = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--include" => {
                if i + 1 >= args.len() {
                    return Err(anyhow::anyhow!("--include requires an argument"));
                }
                inclusion_file = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            other => {
                return Err(anyhow::anyhow!("Unknown argument: {}", other));
            }
        }
    }

    let source_path = source_path.ok_or_else(|| anyhow::anyhow!("--src is required"))?;
    let output_path = output_path.ok_or_else(|| anyhow::anyhow!("--out is required"))?;

    Ok(Options {
        source_path,
        output_path,
        exclusion_file,
        inclusion_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_required_arguments() {
        let options = parse_from(&args(&["--src", "/sdk", "--out", "out.csv"])).unwrap();
        assert_eq!(options.source_path, PathBuf::from("/sdk"));
        assert_eq!(options.output_path, PathBuf::from("out.csv"));
        assert_eq!(options.exclusion_file, None);
        assert_eq!(options.inclusion_file, None);
    }

    #[test]
    fn parses_optional_curated_files() {
        let options = parse_from(&args(&[
            "--exclusions",
            "exc.csv",
            "--include",
            "inc.csv",
            "--src",
            "/sdk",
            "--out",
            "out.csv",
        ]))
        .unwrap();
        assert_eq!(options.exclusion_file, Some(PathBuf::from("exc.csv")));
        assert_eq!(options.inclusion_file, Some(PathBuf::from("inc.csv")));
    }

    #[test]
    fn missing_src_is_an_error() {
        let err = parse_from(&args(&["--out", "out.csv"])).unwrap_err();
        assert!(err.to_string().contains("--src"));
    }

    #[test]
    fn missing_out_is_an_error() {
        let err = parse_from(&args(&["--src", "/sdk"])).unwrap_err();
        assert!(err.to_string().contains("--out"));
    }

    #[test]
    fn unknown_argument_is_an_error() {
        let err = parse_from(&args(&["--src", "/sdk", "--out", "o.csv", "--bogus"])).unwrap_err();
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn flag_without_value_is_an_error() {
        let err = parse_from(&args(&["--src", "/sdk", "--out"])).unwrap_err();
        assert!(err.to_string().contains("--out requires"));
    }
}
