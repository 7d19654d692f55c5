//! FASTA reading and writing.
//!
//! Reading goes through the divided text reader with `>` as divider, so
//! multi-line sequences are joined and comment lines are ignored.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGTACGTACGT...
//! >another_sequence
//! TGCATGCATGCA...
//! ```

use std::io::{self, Write};
use std::path::Path;

use crate::blocks::{read_blocks, read_blocks_str, BlockReaderOptions, BlockResult};
use crate::model::{BlockMap, BlockValue, FastaRecord};

/// Parses a multi-FASTA file into records, in file order.
///
/// A header that appears twice keeps the position of its first occurrence
/// and the sequence of its last one.
///
/// # Examples
///
/// ```no_run
/// use msarun::fasta::parse_fasta_file;
///
/// let records = parse_fasta_file("sequences.fasta").unwrap();
/// println!("Loaded {} sequences", records.len());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> BlockResult<Vec<FastaRecord>> {
    let blocks = read_blocks(path, &BlockReaderOptions::fasta())?;
    Ok(into_records(blocks))
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_fasta_str(content: &str) -> BlockResult<Vec<FastaRecord>> {
    let blocks = read_blocks_str(content, &BlockReaderOptions::fasta())?;
    Ok(into_records(blocks))
}

fn into_records(blocks: BlockMap<BlockValue>) -> Vec<FastaRecord> {
    blocks
        .into_iter()
        .map(|(header, value)| FastaRecord::new(header, value.into_joined()))
        .collect()
}

/// Writes records as FASTA, one sequence line per record.
pub fn write_fasta<'a, W, I>(writer: &mut W, records: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a FastaRecord>,
{
    for record in records {
        writeln!(writer, ">{}", record.header)?;
        writeln!(writer, "{}", record.sequence)?;
    }
    Ok(())
}
