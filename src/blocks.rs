//! Divided text block reader.
//!
//! A divided text file is a sequence of named blocks. A line starting with
//! the divider opens a new block whose key is the rest of that line; the
//! lines that follow, up to the next divider, are the block's value.
//!
//! ## Format
//!
//! ```text
//! # comment lines are ignored
//! itemnum: 2
//! >first block
//! value line 1
//! value line 2
//! >second block
//! value line
//! ```
//!
//! The optional `itemnum:` line declares how many blocks the file must hold.
//! Multi-FASTA is the special case with divider `>` and joined values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::model::{BlockMap, BlockValue};

/// Divider used when none is configured.
pub const DEFAULT_DIVIDER: &str = ">";

/// Comment prefixes used when none are configured.
pub const DEFAULT_COMMENT_PREFIXES: &[&str] = &["/*", "#"];

/// Prefix of the line declaring the expected number of blocks.
const ITEMNUM_PREFIX: &str = "itemnum:";

/// Errors that can occur while reading divided text.
#[derive(Error, Debug)]
pub enum BlockError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Block divider must not be empty")]
    EmptyDivider,

    #[error("Empty block key at line {0}")]
    EmptyKey(usize),

    #[error("Invalid item count at line {line}: '{value}' is not a valid number")]
    InvalidItemNum { line: usize, value: String },

    #[error("Wrong number of items found: {found}. {expected} was expected")]
    ItemCountMismatch { expected: usize, found: usize },
}

/// Result type for block reading.
pub type BlockResult<T> = Result<T, BlockError>;

/// Function applied to keys or value lines.
pub type Transform = Box<dyn Fn(&str) -> String>;

/// Options controlling how a divided text file is read.
///
/// Transforms default to the identity.
pub struct BlockReaderOptions {
    /// Marker that starts a new block
    pub divider: String,
    /// Lines starting with any of these are ignored
    pub comment_prefixes: Vec<String>,
    /// Applied to the text following the divider
    pub key_transform: Option<Transform>,
    /// Applied to every value line
    pub value_transform: Option<Transform>,
    /// Concatenate value lines into one string
    pub join_values: bool,
    /// Ignore blank lines instead of treating them as value lines
    pub skip_empty_lines: bool,
}

impl Default for BlockReaderOptions {
    fn default() -> Self {
        Self {
            divider: DEFAULT_DIVIDER.to_string(),
            comment_prefixes: DEFAULT_COMMENT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            key_transform: None,
            value_transform: None,
            join_values: false,
            skip_empty_lines: true,
        }
    }
}

impl std::fmt::Debug for BlockReaderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockReaderOptions")
            .field("divider", &self.divider)
            .field("comment_prefixes", &self.comment_prefixes)
            .field("key_transform", &self.key_transform.is_some())
            .field("value_transform", &self.value_transform.is_some())
            .field("join_values", &self.join_values)
            .field("skip_empty_lines", &self.skip_empty_lines)
            .finish()
    }
}

impl BlockReaderOptions {
    /// Options for multi-FASTA: `>` divider, joined sequence lines.
    pub fn fasta() -> Self {
        Self::default().with_join_values(true)
    }

    /// Sets the line prefix that starts a new block.
    pub fn with_divider(mut self, divider: impl Into<String>) -> Self {
        self.divider = divider.into();
        self
    }

    /// Replaces the prefixes of lines that are dropped entirely.
    pub fn with_comment_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comment_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a function applied to each key after the divider is stripped.
    pub fn with_key_transform(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.key_transform = Some(Box::new(f));
        self
    }

    /// Sets a function applied to each value line.
    pub fn with_value_transform(mut self, f: impl Fn(&str) -> String + 'static) -> Self {
        self.value_transform = Some(Box::new(f));
        self
    }

    /// Concatenate value lines instead of keeping them apart.
    pub fn with_join_values(mut self, join: bool) -> Self {
        self.join_values = join;
        self
    }

    /// Drop blank lines rather than storing them as values.
    pub fn with_skip_empty_lines(mut self, skip: bool) -> Self {
        self.skip_empty_lines = skip;
        self
    }

    fn is_comment(&self, line: &str) -> bool {
        self.comment_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    fn key(&self, raw: &str) -> String {
        match &self.key_transform {
            Some(f) => f(raw),
            None => raw.to_string(),
        }
    }

    fn value(&self, raw: &str) -> String {
        match &self.value_transform {
            Some(f) => f(raw),
            None => raw.to_string(),
        }
    }
}

/// Reads a divided text file.
///
/// # Examples
///
/// ```no_run
/// use msarun::blocks::{read_blocks, BlockReaderOptions};
///
/// let blocks = read_blocks("sequences.fa", &BlockReaderOptions::fasta()).unwrap();
/// println!("Loaded {} blocks", blocks.len());
/// ```
pub fn read_blocks<P: AsRef<Path>>(
    path: P,
    options: &BlockReaderOptions,
) -> BlockResult<BlockMap<BlockValue>> {
    let path = path.as_ref();
    debug!("Reading blocks from {}", path.display());
    let file = File::open(path)?;
    read_blocks_from(BufReader::new(file), options)
}

/// Reads divided text from a string.
pub fn read_blocks_str(
    content: &str,
    options: &BlockReaderOptions,
) -> BlockResult<BlockMap<BlockValue>> {
    read_blocks_from(content.as_bytes(), options)
}

/// Reads divided text from any buffered reader, one line at a time.
pub fn read_blocks_from<R: BufRead>(
    reader: R,
    options: &BlockReaderOptions,
) -> BlockResult<BlockMap<BlockValue>> {
    if options.divider.is_empty() {
        return Err(BlockError::EmptyDivider);
    }

    let mut blocks = BlockMap::new();
    let mut current_key: Option<String> = None;
    let mut current_lines: Vec<String> = Vec::new();
    let mut expected_count: Option<usize> = None;
    let mut line_number = 0;

    for line_result in reader.lines() {
        line_number += 1;
        let line = line_result?;
        let line = line.trim();

        if line.is_empty() && options.skip_empty_lines {
            continue;
        }

        if let Some(count) = line.strip_prefix(ITEMNUM_PREFIX) {
            let count = count.trim();
            let parsed = count.parse::<usize>().map_err(|_| BlockError::InvalidItemNum {
                line: line_number,
                value: count.to_string(),
            })?;
            expected_count = Some(parsed);
            continue;
        }

        if options.is_comment(line) {
            continue;
        }

        if let Some(raw_key) = line.strip_prefix(options.divider.as_str()) {
            if let Some(key) = current_key.take() {
                store_block(&mut blocks, key, std::mem::take(&mut current_lines), options);
            }

            let key = options.key(raw_key);
            if key.is_empty() {
                return Err(BlockError::EmptyKey(line_number));
            }
            current_key = Some(key);
        } else if current_key.is_some() {
            current_lines.push(options.value(line));
        } else {
            debug!("Dropping line {} found before the first block", line_number);
        }
    }

    if let Some(key) = current_key {
        store_block(&mut blocks, key, current_lines, options);
    }

    if let Some(expected) = expected_count {
        if blocks.len() != expected {
            return Err(BlockError::ItemCountMismatch {
                expected,
                found: blocks.len(),
            });
        }
    }

    Ok(blocks)
}

fn store_block(
    blocks: &mut BlockMap<BlockValue>,
    key: String,
    lines: Vec<String>,
    options: &BlockReaderOptions,
) {
    let value = if options.join_values {
        BlockValue::Joined(lines.concat())
    } else {
        BlockValue::Lines(lines)
    };

    if blocks.contains_key(&key) {
        debug!("Block '{}' appears again and replaces the earlier one", key);
    }
    blocks.insert(key, value);
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn joined(blocks: &BlockMap<BlockValue>, key: &str) -> String {
        blocks.get(key).and_then(|v| v.as_joined()).unwrap().to_string()
    }

    #[test]
    fn test_read_joined_blocks() {
        let content = ">a\nSEQ1\n>b\nSEQ2\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::fasta()).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(joined(&blocks, "a"), "SEQ1");
        assert_eq!(joined(&blocks, "b"), "SEQ2");
        assert_eq!(blocks.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_read_multiline_joined() {
        let content = ">seq1 description\nACGT\nTGCA\n  AAAA  \n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::fasta()).unwrap();

        assert_eq!(joined(&blocks, "seq1 description"), "ACGTTGCAAAAA");
    }

    #[test]
    fn test_read_lines_kept_separate() {
        let content = ">a\nline 1\nline 2\n>b\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::default()).unwrap();

        let a = blocks.get("a").and_then(|v| v.as_lines()).unwrap();
        assert_eq!(a, ["line 1".to_string(), "line 2".to_string()]);
        let b = blocks.get("b").and_then(|v| v.as_lines()).unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped() {
        let content = "\n\n>a\n\nSEQ1\n\n>b\nSEQ2\n\n\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::default()).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks.get("a").and_then(|v| v.as_lines()).unwrap(), ["SEQ1".to_string()]);
        assert_eq!(blocks.get("b").and_then(|v| v.as_lines()).unwrap(), ["SEQ2".to_string()]);
    }

    #[test]
    fn test_blank_lines_kept_when_not_skipped() {
        let content = ">a\nSEQ1\n\nSEQ2\n";
        let options = BlockReaderOptions::default().with_skip_empty_lines(false);
        let blocks = read_blocks_str(content, &options).unwrap();

        let a = blocks.get("a").and_then(|v| v.as_lines()).unwrap();
        assert_eq!(a, ["SEQ1".to_string(), String::new(), "SEQ2".to_string()]);
    }

    #[test]
    fn test_comment_lines_skipped() {
        let content = "# header comment\n>a\n/* inline note\nSEQ1\n#SEQ_HIDDEN\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::fasta()).unwrap();

        assert_eq!(joined(&blocks, "a"), "SEQ1");
    }

    #[test]
    fn test_custom_comment_prefixes() {
        let content = ";skip\n>a\n#kept\n";
        let options = BlockReaderOptions::fasta().with_comment_prefixes([";"]);
        let blocks = read_blocks_str(content, &options).unwrap();

        assert_eq!(joined(&blocks, "a"), "#kept");
    }

    #[test]
    fn test_itemnum_matches() {
        let content = "itemnum: 2\n>a\nX\n>b\nY\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::fasta()).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_itemnum_mismatch() {
        let content = "itemnum: 3\n>a\nX\n>b\nY\n";
        let result = read_blocks_str(content, &BlockReaderOptions::fasta());
        assert!(matches!(
            result,
            Err(BlockError::ItemCountMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_itemnum_invalid() {
        let content = "itemnum: many\n>a\nX\n";
        let result = read_blocks_str(content, &BlockReaderOptions::fasta());
        assert!(matches!(result, Err(BlockError::InvalidItemNum { line: 1, .. })));
    }

    #[test]
    fn test_empty_key() {
        let content = ">a\nX\n>\nY\n";
        let result = read_blocks_str(content, &BlockReaderOptions::fasta());
        assert!(matches!(result, Err(BlockError::EmptyKey(3))));
    }

    #[test]
    fn test_key_transform_producing_empty_key() {
        let content = ">   \nX\n";
        // Trimming leaves ">" alone, so the raw key is already empty
        let result = read_blocks_str(content, &BlockReaderOptions::fasta());
        assert!(matches!(result, Err(BlockError::EmptyKey(1))));

        let content = ">drop_me\nX\n";
        let options = BlockReaderOptions::fasta().with_key_transform(|k| k.replace("drop_me", ""));
        let result = read_blocks_str(content, &options);
        assert!(matches!(result, Err(BlockError::EmptyKey(1))));
    }

    #[test]
    fn test_transforms_applied() {
        let content = ">Seq1\nacgt\nacgt\n";
        let options = BlockReaderOptions::fasta()
            .with_key_transform(|k| k.to_lowercase())
            .with_value_transform(|v| v.to_uppercase());
        let blocks = read_blocks_str(content, &options).unwrap();

        assert_eq!(joined(&blocks, "seq1"), "ACGTACGT");
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let content = ">a\nFIRST\n>b\nX\n>a\nSECOND\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::fasta()).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(joined(&blocks, "a"), "SECOND");
        assert_eq!(blocks.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_lines_before_first_block_dropped() {
        let content = "orphan\n>a\nSEQ\n";
        let blocks = read_blocks_str(content, &BlockReaderOptions::fasta()).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(joined(&blocks, "a"), "SEQ");
    }

    #[test]
    fn test_multichar_divider() {
        let content = "@@first\n1\n2\n@@second\n3\n";
        let options = BlockReaderOptions::default().with_divider("@@");
        let blocks = read_blocks_str(content, &options).unwrap();

        assert_eq!(blocks.keys().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn test_empty_divider_rejected() {
        let options = BlockReaderOptions::default().with_divider("");
        let result = read_blocks_str(">a\n", &options);
        assert!(matches!(result, Err(BlockError::EmptyDivider)));
    }

    #[test]
    fn test_empty_input() {
        let blocks = read_blocks_str("", &BlockReaderOptions::fasta()).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_read_blocks_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">x\nAC\nGT").unwrap();

        let blocks = read_blocks(file.path(), &BlockReaderOptions::fasta()).unwrap();
        assert_eq!(joined(&blocks, "x"), "ACGT");
    }

    #[test]
    fn test_missing_file() {
        let result = read_blocks("does/not/exist.fa", &BlockReaderOptions::fasta());
        assert!(matches!(result, Err(BlockError::IoError(_))));
    }
}
