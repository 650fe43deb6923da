//! compat-gen CLI - generate a platform compatibility surface CSV.
//!
//! Usage: compat-gen --src <DIR> --out <FILE> [--exclusions <FILE>] [--include <FILE>]

use std::process::ExitCode;

use compat_gen::cli;
use compat_gen::platforms::PlatformLayout;
use compat_gen::scanner::NdjsonScanner;
use compat_gen::{run_generate, GenerateOptions};

fn main() -> ExitCode {
    let options = match cli::parse_args() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            cli::print_usage();
            return ExitCode::from(1);
        }
    };

    let generate_options = GenerateOptions {
        source_path: options.source_path,
        output_path: options.output_path,
        exclusion_file: options.exclusion_file,
        inclusion_file: options.inclusion_file,
        layout: PlatformLayout::dotnet_sdk(),
    };

    let mut scanner = NdjsonScanner::new();
    match run_generate(&generate_options, &mut scanner) {
        Ok(report) => {
            println!(
                "Wrote {} entries across {} platform(s) ({} binaries scanned) to {}",
                report.entries,
                report.platforms.len(),
                report.binaries_scanned,
                generate_options.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
