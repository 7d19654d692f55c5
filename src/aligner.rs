//! Supported aligners and run modes.
//!
//! Both sets are fixed tables. Adding an aligner means adding one row to
//! [`ALIGNERS`] with the flags it uses for its input and output files.

use std::fmt;

/// Extension of alignment files written by the aligners in batch mode.
pub const ALIGNMENT_EXTENSION: &str = "aln";

/// Command line layout of one external aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignerSpec {
    /// Executable name, also the name users select the aligner by
    pub name: &'static str,
    /// Flag preceding the input FASTA file
    pub input_flag: &'static str,
    /// Flag preceding the output alignment file
    pub output_flag: &'static str,
}

/// All supported aligners.
pub const ALIGNERS: &[AlignerSpec] = &[
    // Clustal Omega
    AlignerSpec {
        name: "clustalo",
        input_flag: "-i",
        output_flag: "-o",
    },
    // MUSCLE v5
    AlignerSpec {
        name: "muscle",
        input_flag: "-align",
        output_flag: "-output",
    },
];

/// Looks up an aligner by name.
pub fn find_aligner(name: &str) -> Option<&'static AlignerSpec> {
    ALIGNERS.iter().find(|spec| spec.name == name)
}

/// Comma-separated aligner names, for error messages.
pub fn aligner_names() -> String {
    ALIGNERS
        .iter()
        .map(|spec| spec.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// How commands are built from the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One command, arguments passed through untouched
    SinglePair,
    /// One command per record pair of two FASTA files
    BatchPairwise,
}

impl Mode {
    /// Every mode, in help-text order.
    pub const ALL: [Mode; 2] = [Mode::SinglePair, Mode::BatchPairwise];

    /// Canonical name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Mode::SinglePair => "single-pair",
            Mode::BatchPairwise => "batch-pairwise",
        }
    }

    /// Short name kept for older scripts.
    pub fn alias(self) -> &'static str {
        match self {
            Mode::SinglePair => "pw",
            Mode::BatchPairwise => "pw_batch",
        }
    }

    /// Parses a mode from its canonical name or alias.
    pub fn from_name(name: &str) -> Option<Mode> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == name || mode.alias() == name)
    }

    /// Comma-separated mode names, for error messages.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(|mode| mode.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
