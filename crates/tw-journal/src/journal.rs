// journal.rs — Append-only JSONL journal.
//
// One JSON object per line. Opened in append mode so reopening never
// clobbers history; flushed per record.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::JournalError;
use crate::record::DecisionRecord;

/// An append-only decision journal backed by a JSONL file.
pub struct DecisionJournal {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl DecisionJournal {
    /// Open (or create) a journal at the given path. Parent directories
    /// are created as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| JournalError::OpenFailed {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| JournalError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// Append one record and flush it.
    pub fn append(&mut self, record: &DecisionRecord) -> Result<(), JournalError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Read every record from a journal file, oldest first. Blank lines
    /// are skipped.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<DecisionRecord>, JournalError> {
        let file = File::open(path.as_ref()).map_err(|source| JournalError::OpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }

        Ok(records)
    }

    /// The last `count` records, oldest first.
    pub fn tail(path: impl AsRef<Path>, count: usize) -> Result<Vec<DecisionRecord>, JournalError> {
        let mut records = Self::read_all(path)?;
        let skip = records.len().saturating_sub(count);
        Ok(records.split_off(skip))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
