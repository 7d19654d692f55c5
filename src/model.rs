//! Data model shared by the block reader, the pairwise expander and the
//! command builder.
//!
//! This module contains the data structures for representing:
//! - FASTA records
//! - Insertion-ordered block maps produced by the block reader
//! - Aligner arguments forwarded verbatim to the external tools

use std::collections::HashMap;

/// Argument keys that never reach the aligner command line.
///
/// Input and output files are placed by the per-aligner templates in batch
/// mode, so user-supplied values for these keys are ignored.
pub const RESERVED_ARG_KEYS: &[&str] = &["input", "output"];

/// A single FASTA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Full header text (everything after '>')
    pub header: String,
    /// Sequence data with line breaks removed
    pub sequence: String,
}

impl FastaRecord {
    /// Creates a new record.
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// Returns the first whitespace-delimited token of the header.
    ///
    /// This is the part used to name generated files.
    pub fn short_id(&self) -> &str {
        self.header
            .split_whitespace()
            .next()
            .unwrap_or(&self.header)
    }

    /// Returns the length of the sequence.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Value of one block read by [`crate::blocks::read_blocks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockValue {
    /// Value lines kept separately
    Lines(Vec<String>),
    /// Value lines concatenated with no separator
    Joined(String),
}

impl BlockValue {
    /// Returns the joined text, if the block was read with joined values.
    pub fn as_joined(&self) -> Option<&str> {
        match self {
            BlockValue::Joined(s) => Some(s),
            BlockValue::Lines(_) => None,
        }
    }

    /// Returns the individual lines, if the block was read without joining.
    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            BlockValue::Lines(lines) => Some(lines),
            BlockValue::Joined(_) => None,
        }
    }

    /// Consumes the value and returns it as one string.
    pub fn into_joined(self) -> String {
        match self {
            BlockValue::Joined(s) => s,
            BlockValue::Lines(lines) => lines.concat(),
        }
    }
}

/// Mapping from block key to value that remembers insertion order.
///
/// Inserting a key that is already present replaces its value but keeps
/// the position of the first insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for BlockMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> BlockMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a block, returning the previous value for this key.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> IntoIterator for BlockMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Aligner flags and their values, in the order they were given.
///
/// An empty value denotes a bare switch such as `--quiet`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignerArgs {
    entries: Vec<(String, String)>,
}

impl AlignerArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a flat token list as given on the command line.
    ///
    /// Each token is a flag; the token after it is taken as its value unless
    /// it looks like another flag, in which case the flag is a bare switch.
    /// Negative numbers such as `-5` or `-0.5` are values, not flags.
    ///
    /// ```
    /// use msarun::model::AlignerArgs;
    ///
    /// let args = AlignerArgs::from_tokens(["--threads", "4", "--quiet"]);
    /// assert_eq!(args.get("--threads"), Some("4"));
    /// assert_eq!(args.get("--quiet"), Some(""));
    /// ```
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = Self::new();
        let mut tokens = tokens.into_iter().map(Into::into).peekable();
        while let Some(flag) = tokens.next() {
            let value = tokens
                .next_if(|next: &String| is_value_token(next))
                .unwrap_or_default();
            args.insert(flag, value);
        }
        args
    }

    /// Sets a flag. A flag given twice keeps its first position.
    pub fn insert(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        let flag = flag.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == flag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((flag, value)),
        }
    }

    /// Gets the value of a flag.
    pub fn get(&self, flag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == flag)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of flags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(flag, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flattens the flags into argv form, skipping [`RESERVED_ARG_KEYS`].
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.entries.len() * 2);
        for (flag, value) in &self.entries {
            if RESERVED_ARG_KEYS.contains(&flag.as_str()) {
                continue;
            }
            argv.push(flag.clone());
            if !value.is_empty() {
                argv.push(value.clone());
            }
        }
        argv
    }
}

/// True if `token` cannot be a flag: it has no leading '-' or is a
/// negative number.
fn is_value_token(token: &str) -> bool {
    match token.strip_prefix('-') {
        None => true,
        Some(rest) => {
            rest.starts_with(|c: char| c.is_ascii_digit() || c == '.')
                && rest.parse::<f64>().is_ok()
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AlignerArgs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = Self::new();
        for (flag, value) in iter {
            args.insert(flag, value);
        }
        args
    }
}
