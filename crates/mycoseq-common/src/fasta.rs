//! FASTA reading and writing
//!
//! Records are kept in file order. Sequences are stored unwrapped and are
//! written back on a single line, which is what the downstream aligners
//! expect.

use crate::error::{Result, SeqError};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// A single FASTA record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// Header line without the leading `>`
    pub header: String,

    /// Sequence with line breaks removed
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
        }
    }

    /// First whitespace-delimited token of the header
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    /// Sequence length in characters
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl fmt::Display for FastaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ">{}\n{}", self.header, self.sequence)
    }
}

/// Read all records from a buffered reader
pub fn read_fasta<R: BufRead>(reader: R) -> Result<Vec<FastaRecord>> {
    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();

        if let Some(header) = trimmed.strip_prefix('>') {
            let header = header.trim();
            if header.is_empty() {
                return Err(SeqError::EmptyHeader(line_no));
            }
            if let Some(done) = current.take() {
                records.push(done);
            }
            current = Some(FastaRecord::new(header, String::new()));
        } else if !trimmed.is_empty() {
            match current.as_mut() {
                Some(record) => record.sequence.push_str(trimmed),
                None => {
                    return Err(SeqError::parse(
                        line_no,
                        "sequence data found before the first '>' header",
                    ))
                },
            }
        }
    }

    if let Some(done) = current {
        records.push(done);
    }

    Ok(records)
}

/// Read all records from a FASTA file on disk
pub fn read_fasta_file(path: impl AsRef<Path>) -> Result<Vec<FastaRecord>> {
    let file = File::open(path)?;
    read_fasta(BufReader::new(file))
}

/// Parse FASTA records from an in-memory string
pub fn parse_fasta_str(text: &str) -> Result<Vec<FastaRecord>> {
    read_fasta(text.as_bytes())
}

/// Write records as `>header` / sequence line pairs, returning how many were written
pub fn write_fasta<'a, W, I>(writer: &mut W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a FastaRecord>,
{
    let mut count = 0;
    for record in records {
        writeln!(writer, "{}", record)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Write records to a file, creating or truncating it
pub fn write_fasta_file<'a, I>(path: impl AsRef<Path>, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a FastaRecord>,
{
    let mut writer = std::io::BufWriter::new(File::create(path)?);
    write_fasta(&mut writer, records)
}
