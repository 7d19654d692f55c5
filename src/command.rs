//! Aligner command construction.
//!
//! Commands are kept as a program name plus an argument vector and are
//! handed to the OS without a shell, so argument values never need quoting.
//! The space-joined [`Display`](std::fmt::Display) form exists for logs and
//! dry runs only.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;

use log::info;
use thiserror::Error;

use crate::aligner::{aligner_names, find_aligner, AlignerSpec, Mode, ALIGNMENT_EXTENSION};
use crate::model::AlignerArgs;
use crate::pairwise::{expand_pairs, with_suffix, PairwiseError, PAIR_EXTENSION};

/// Errors that can occur while building commands.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown aligner is found: {0}. Please choose from {}", aligner_names())]
    UnsupportedAligner(String),

    #[error("Unknown mode is found: {0}. Please choose from {}", Mode::names())]
    UnsupportedMode(String),

    #[error("Empty input: {0} is required in batch-pairwise mode")]
    MissingInput(&'static str),

    #[error("Pairwise expansion failed: {0}")]
    PairwiseError(#[from] PairwiseError),
}

/// Result type for command building.
pub type CommandResult<T> = Result<T, CommandError>;

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerCommand {
    /// Executable to start, looked up on `PATH`
    pub program: String,
    /// Arguments, passed to the OS as-is (paths need not be UTF-8)
    pub args: Vec<OsString>,
}

impl AlignerCommand {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Converts into a process builder; stdio is inherited.
    pub fn to_process(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for AlignerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Checks the aligner and mode names against the supported tables.
pub fn resolve(aligner: &str, mode: &str) -> CommandResult<(&'static AlignerSpec, Mode)> {
    let spec = find_aligner(aligner)
        .ok_or_else(|| CommandError::UnsupportedAligner(aligner.to_string()))?;
    let mode =
        Mode::from_name(mode).ok_or_else(|| CommandError::UnsupportedMode(mode.to_string()))?;
    Ok((spec, mode))
}

/// Builds the commands to run.
///
/// In single-pair mode the result is one command made of the aligner and
/// `args`; the input paths are not used. In batch-pairwise mode the pair
/// files are written to `output_folder` first and one command is built per
/// pair, with `args` appended after the aligner's input/output flags.
///
/// Aligner and mode are validated before any file is touched.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use msarun::command::build_commands;
/// use msarun::model::AlignerArgs;
///
/// let args = AlignerArgs::from_tokens(["--threads", "4"]);
/// let empty = Path::new("");
/// let commands =
///     build_commands("clustalo", "single-pair", empty, empty, empty, &args).unwrap();
/// assert_eq!(commands[0].to_string(), "clustalo --threads 4");
/// ```
pub fn build_commands(
    aligner: &str,
    mode: &str,
    input1: &Path,
    input2: &Path,
    output_folder: &Path,
    args: &AlignerArgs,
) -> CommandResult<Vec<AlignerCommand>> {
    let (spec, mode) = resolve(aligner, mode)?;

    match mode {
        Mode::SinglePair => Ok(vec![AlignerCommand::new(spec.name).args(args.to_argv())]),
        Mode::BatchPairwise => {
            if input1.as_os_str().is_empty() {
                return Err(CommandError::MissingInput("input1"));
            }
            if input2.as_os_str().is_empty() {
                return Err(CommandError::MissingInput("input2"));
            }

            let bases = expand_pairs(input1, input2, output_folder)?;
            let extra = args.to_argv();
            let commands: Vec<_> = bases
                .iter()
                .map(|base| batch_command(spec, base, &extra))
                .collect();
            info!("Built {} {} commands", commands.len(), spec.name);
            Ok(commands)
        }
    }
}

fn batch_command(spec: &AlignerSpec, base: &Path, extra: &[String]) -> AlignerCommand {
    let input = with_suffix(base, PAIR_EXTENSION);
    let output = with_suffix(base, ALIGNMENT_EXTENSION);
    AlignerCommand::new(spec.name)
        .arg(spec.input_flag)
        .arg(input)
        .arg(spec.output_flag)
        .arg(output)
        .args(extra.iter().cloned())
}
