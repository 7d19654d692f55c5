//! msarun - External Aligner Runner
//!
//! Builds aligner command lines and runs them one after another.
//!
//! ## Usage
//!
//! ```bash
//! # Forward arguments to a single aligner run
//! msarun clustalo single-pair "" "" "" -i in.fa -o out.aln --threads 4
//!
//! # Align every record of a.fa against every record of b.fa
//! msarun muscle batch-pairwise a.fa b.fa pairs/ -threads 2
//!
//! # Use `--` when an aligner flag clashes with one of ours (-v, -n, -h)
//! msarun clustalo single-pair "" "" "" -- -v -i in.fa -o out.aln
//! ```
//!
//! ## Supported Aligners
//!
//! - Clustal Omega (`clustalo`)
//! - MUSCLE (`muscle`)

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::Parser;

use msarun::command::build_commands;
use msarun::model::AlignerArgs;
use msarun::runner::{run_commands, RunPolicy};

/// msarun - Run external multiple sequence aligners
///
/// In single-pair mode the aligner arguments are passed through as given.
/// In batch-pairwise mode one FASTA file per record pair of INPUT1 x INPUT2
/// is written to OUTPUT_FOLDER and the aligner is run on each of them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Aligner to run (clustalo, muscle)
    aligner: String,

    /// Run mode (single-pair, batch-pairwise)
    mode: String,

    /// First multi-FASTA file (batch-pairwise mode; may be "" otherwise)
    input1: String,

    /// Second multi-FASTA file (batch-pairwise mode; may be "" otherwise)
    input2: String,

    /// Folder receiving the pair files (batch-pairwise mode; may be "" otherwise)
    output_folder: String,

    /// Arguments forwarded to the aligner as flag/value pairs
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    aligner_args: Vec<String>,

    /// Print the commands instead of running them
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Stop at the first aligner that exits with a failure status
    #[arg(long = "fail-fast")]
    fail_fast: bool,

    /// Verbosity (1=error, 2=warning, 3=info, 4=debug, 5+=trace)
    #[arg(short = 'v', long = "verbosity", default_value = "3")]
    verbosity: u8,
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity);

    let aligner_args = AlignerArgs::from_tokens(args.aligner_args);
    let commands = build_commands(
        &args.aligner,
        &args.mode,
        Path::new(&args.input1),
        Path::new(&args.input2),
        Path::new(&args.output_folder),
        &aligner_args,
    )?;

    if args.dry_run {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for command in &commands {
            writeln!(handle, "{}", command)?;
        }
        return Ok(());
    }

    let policy = if args.fail_fast {
        RunPolicy::FailFast
    } else {
        RunPolicy::KeepGoing
    };
    let summary = run_commands(&commands, policy)?;

    if summary.failed > 0 {
        log::warn!("{} of {} commands failed", summary.failed, summary.executed);
    } else {
        log::info!("Ran {} commands", summary.executed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_aligner_args_collected_verbatim() {
        let args = Args::try_parse_from([
            "msarun", "-v", "4", "muscle", "pw", "", "", "", "-threads", "2", "--quiet",
        ])
        .unwrap();

        assert_eq!(args.verbosity, 4);
        assert_eq!(args.input1, "");
        assert_eq!(args.aligner_args, vec!["-threads", "2", "--quiet"]);
    }

    #[test]
    fn test_double_dash_forwards_clashing_flags() {
        let args =
            Args::try_parse_from(["msarun", "clustalo", "pw", "", "", "", "--", "-v", "-n"])
                .unwrap();

        assert!(!args.dry_run);
        assert_eq!(args.aligner_args, vec!["-v", "-n"]);
    }

    #[test]
    fn test_negative_aligner_values_survive() {
        let args = Args::try_parse_from([
            "msarun", "clustalo", "pw", "", "", "", "--gapopen", "-5", "--gapext", "-5",
        ])
        .unwrap();

        let aligner_args = AlignerArgs::from_tokens(args.aligner_args);
        assert_eq!(aligner_args.to_argv(), vec!["--gapopen", "-5", "--gapext", "-5"]);
    }
}
