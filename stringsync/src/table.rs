//! Line-oriented reader/writer for `Localizable.strings` tables.
//!
//! Parses a `.strings` file into an ordered list of key/value entries with
//! their preceding comment blocks, and re-serializes the same block shape.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{error::Error, traits::Parser};

/// A single entry in a string table: a key, its value, and the comment block
/// (if any) that immediately precedes it in the file.
///
/// The key is stored verbatim as it appears left of the `=` separator, quotes
/// included, so rewriting a table reproduces the original spelling. The value
/// has surrounding whitespace, semicolons, and double quotes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    /// Comment lines preceding the pair, joined with `\n`, markers included.
    pub comment: Option<String>,
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "{}", comment)?;
        }
        write!(f, "{} = \"{}\";", self.key, self.value)
    }
}

/// An ordered-by-file-appearance string table.
///
/// Keys are treated as unique identifiers used to align entries across
/// language tables; lookups scan in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub entries: Vec<Entry>,
}

impl Table {
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read a table from `path`, treating a missing file as an empty table.
    ///
    /// Target-language files may not exist yet on the first run; that is not
    /// an error.
    pub fn read_or_empty<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        if path.as_ref().is_file() {
            Self::read_from(path)
        } else {
            Ok(Self::default())
        }
    }
}

impl Parser for Table {
    /// Parsing rules:
    ///
    /// - a trimmed line that starts with `/*` or ends with `*/` is collected
    ///   into the pending comment buffer;
    /// - a blank line is retained in the buffer only when a comment block is
    ///   already open (see the note on `pending` below);
    /// - a line containing `=` is split at the first `=`; the pending buffer
    ///   is attached to the resulting entry and cleared;
    /// - anything else is ignored.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let mut entries = Vec::new();
        // Pending comment lines. Blank lines land here only if the buffer is
        // already non-empty. TODO: verify against real Xcode output whether
        // leading blank lines inside a block were ever intended to survive.
        let mut pending: Vec<String> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed.starts_with("/*") || trimmed.ends_with("*/") {
                pending.push(trimmed.to_string());
            } else if trimmed.is_empty() {
                if !pending.is_empty() {
                    pending.push(String::new());
                }
            } else if let Some((lhs, rhs)) = trimmed.split_once('=') {
                let key = lhs.trim().to_string();
                let value = rhs.trim().trim_matches(';').trim_matches('"').to_string();
                let comment = if pending.is_empty() {
                    None
                } else {
                    Some(pending.join("\n"))
                };
                pending.clear();
                entries.push(Entry {
                    key,
                    value,
                    comment,
                });
            }
        }

        Ok(Table { entries })
    }

    /// Emit one `comment\nkey = "value";\n\n` block per entry.
    ///
    /// No escaping of embedded quotes is performed; values are written back
    /// exactly as stored.
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::new();

        for entry in &self.entries {
            content.push_str(&entry.to_string());
            content.push_str("\n\n");
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Override default file reading to support BOM-aware decoding (Apple
    /// tooling still emits UTF-16 `.strings` files).
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        // Auto-detect BOM, decode to UTF-8; passthrough UTF-8
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}
