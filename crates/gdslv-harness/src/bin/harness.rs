//! CLI entrypoint for the GDSL conformance harness.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gdslv_harness::{builtin_fixtures, run_fixtures};

/// Conformance tooling for the GDSL command stream verifier and snapshot
/// diff engine.
#[derive(Debug, Parser)]
#[command(name = "gdslv-harness")]
#[command(about = "Conformance testing harness for gdslv")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the built-in conformance fixtures and print a report.
    Run {
        /// Emit the report as JSON instead of a text table.
        #[arg(long)]
        json: bool,
        /// Write the report to this path instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Verify a raw GDSL stream read from a file.
    VerifyFile {
        /// Path to the binary stream to verify.
        path: PathBuf,
        /// Conformance level: syntax, phase, or domain.
        #[arg(long, default_value = "domain")]
        level: String,
    },
    /// Compute a diff between two binary files and print its chunk stats.
    Diff {
        base: PathBuf,
        target: PathBuf,
        #[arg(long, default_value_t = gdslv_diff::DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
}

fn parse_level(level: &str) -> Result<gdslv_core::ConformanceLevel, String> {
    match level.to_ascii_lowercase().as_str() {
        "syntax" => Ok(gdslv_core::ConformanceLevel::Syntax),
        "phase" => Ok(gdslv_core::ConformanceLevel::Phase),
        "domain" => Ok(gdslv_core::ConformanceLevel::Domain),
        other => Err(format!("unrecognized conformance level {other:?} (want syntax, phase, or domain)")),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { json, output } => run_builtin(json, output),
        Command::VerifyFile { path, level } => verify_file(&path, &level),
        Command::Diff { base, target, page_size } => diff_files(&base, &target, page_size),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run_builtin(json: bool, output: Option<PathBuf>) -> Result<(), String> {
    let summary = run_fixtures(&builtin_fixtures());
    let rendered = if json {
        serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?
    } else {
        summary.render_text()
    };
    match output {
        Some(path) => fs::write(path, rendered).map_err(|e| e.to_string())?,
        None => println!("{rendered}"),
    }
    if summary.all_passed() {
        Ok(())
    } else {
        Err(format!("{} of {} fixtures failed", summary.failed, summary.total))
    }
}

fn verify_file(path: &PathBuf, level: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let bytes = fs::read(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    let config = gdslv_core::VerifyConfig {
        level,
        ..gdslv_core::VerifyConfig::default()
    };
    let report = gdslv_core::verify(&bytes, &config);
    for diag in &report.diagnostics {
        println!("{diag}");
    }
    println!(
        "instructions={} errors={} warnings={} success={}",
        report.instruction_count, report.error_count, report.warning_count, report.success
    );
    if report.success {
        Ok(())
    } else {
        Err(format!("verification failed with {} error(s)", report.error_count))
    }
}

fn diff_files(base: &PathBuf, target: &PathBuf, page_size: u32) -> Result<(), String> {
    let base_bytes = fs::read(base).map_err(|e| format!("reading {}: {e}", base.display()))?;
    let target_bytes = fs::read(target).map_err(|e| format!("reading {}: {e}", target.display()))?;
    let result = gdslv_diff::diff_checked(&base_bytes, &target_bytes, page_size).map_err(|e| e.to_string())?;
    println!(
        "page_size={} chunk_count={} target_length={} payload_length={}",
        result.header.page_size,
        result.header.chunk_count,
        result.header.target_length,
        result.payload.len()
    );
    for page_index in result.changed_set() {
        println!("changed page {page_index}");
    }
    Ok(())
}
