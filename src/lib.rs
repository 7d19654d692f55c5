//! # msarun - External Aligner Runner
//!
//! Builds and runs command lines for external multiple sequence aligners
//! (Clustal Omega, MUSCLE).
//!
//! ## Architecture
//!
//! Data flows in one direction, on a single thread:
//! - `blocks`: Generic reader for divider-delimited text files
//! - `fasta`: FASTA reading and writing on top of `blocks`
//! - `pairwise`: Cross-product expansion of two FASTA files into pair files
//! - `aligner`: Tables of supported aligners and modes
//! - `command`: Command construction and validation
//! - `runner`: Sequential execution of the built commands
//! - `model`: Records, ordered maps and aligner arguments

pub mod aligner;
pub mod blocks;
pub mod command;
pub mod fasta;
pub mod model;
pub mod pairwise;
pub mod runner;
