//! Pairwise FASTA expansion.
//!
//! Given two multi-FASTA files, writes one two-record FASTA file for every
//! combination of a record from the first file with a record from the
//! second. Files are named `{id1}_{id2}.fa` after the first word of each
//! header, and are produced with the first file as the outer loop.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::blocks::BlockError;
use crate::fasta::{parse_fasta_file, write_fasta};

/// Extension of generated pair files.
pub const PAIR_EXTENSION: &str = "fa";

/// Errors that can occur while expanding pairs.
#[derive(Error, Debug)]
pub enum PairwiseError {
    #[error("Failed to write pair file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    InputError {
        path: PathBuf,
        #[source]
        source: BlockError,
    },

    #[error("Output file already exists: {0}")]
    OutputCollision(PathBuf),
}

/// Result type for pairwise expansion.
pub type PairwiseResult<T> = Result<T, PairwiseError>;

/// Writes the cross product of `file1` and `file2` into `output_folder`.
///
/// Returns the base path (without `.fa`) of every generated file, in
/// generation order. An existing target file is never overwritten; the
/// expansion stops with [`PairwiseError::OutputCollision`] and the files
/// written so far stay on disk.
pub fn expand_pairs<P1, P2, P3>(
    file1: P1,
    file2: P2,
    output_folder: P3,
) -> PairwiseResult<Vec<PathBuf>>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let (file1, file2, output_folder) = (file1.as_ref(), file2.as_ref(), output_folder.as_ref());

    let load = |path: &Path| {
        parse_fasta_file(path).map_err(|source| PairwiseError::InputError {
            path: path.to_path_buf(),
            source,
        })
    };
    let records1 = load(file1)?;
    let records2 = load(file2)?;
    info!(
        "Expanding {} x {} records into {}",
        records1.len(),
        records2.len(),
        output_folder.display()
    );

    let mut base_paths = Vec::with_capacity(records1.len() * records2.len());
    for record1 in &records1 {
        for record2 in &records2 {
            let base = output_folder.join(format!("{}_{}", record1.short_id(), record2.short_id()));
            let target = with_suffix(&base, PAIR_EXTENSION);

            let mut writer = BufWriter::new(create_new(&target)?);
            write_fasta(&mut writer, [record1, record2])
                .and_then(|_| writer.flush())
                .map_err(|source| PairwiseError::IoError {
                    path: target.clone(),
                    source,
                })?;

            debug!("Wrote {}", target.display());
            base_paths.push(base);
        }
    }

    Ok(base_paths)
}

/// Appends `.{extension}` to `base`.
///
/// Unlike [`Path::with_extension`], dots already present in the file name
/// (as in versioned accessions like `NM_000546.6`) are left alone.
pub fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Creates `path`, failing if anything already exists there.
fn create_new(path: &Path) -> PairwiseResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            ErrorKind::AlreadyExists => PairwiseError::OutputCollision(path.to_path_buf()),
            _ => PairwiseError::IoError {
                path: path.to_path_buf(),
                source,
            },
        })
}
