//! FASTA record reader feeding the particle pipeline.
//!
//! Reads one record per call, so a multi-chromosome file is never held in
//! memory beyond the selected sequence. Sequence lines are uppercased, blank
//! lines are skipped and lines before the first header are ignored.

use crate::error::{ParticleError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Named sequence from a FASTA file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// First word of the header line.
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Read the named record from `path`, or the first record when `name` is `None`.
pub fn read_record(path: &Path, name: Option<&str>) -> Result<FastaRecord> {
    let file = File::open(path)?;

    match parse_record(BufReader::new(file), name)? {
        Some(record) => Ok(record),
        None => match name {
            Some(name) => Err(ParticleError::SequenceNotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            }),
            None => Err(ParticleError::NoSequences {
                path: path.to_path_buf(),
            }),
        },
    }
}

/// Scan `reader` for the wanted record. Returns `Ok(None)` when absent.
pub fn parse_record<R: BufRead>(mut reader: R, name: Option<&str>) -> io::Result<Option<FastaRecord>> {
    let mut line = Vec::new();
    let mut current: Option<FastaRecord> = None;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix(b">") {
            if current.is_some() {
                break;
            }

            let id = header_id(header);
            if name.is_none_or(|wanted| wanted == id) {
                current = Some(FastaRecord {
                    name: id,
                    sequence: Vec::new(),
                });
            }
        } else if let Some(record) = current.as_mut() {
            record
                .sequence
                .extend(trimmed.iter().map(u8::to_ascii_uppercase));
        }
    }

    Ok(current)
}

fn header_id(header: &[u8]) -> String {
    let id = header
        .split(u8::is_ascii_whitespace)
        .find(|word| !word.is_empty())
        .unwrap_or_default();
    String::from_utf8_lossy(id).into_owned()
}
