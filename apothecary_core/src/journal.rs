//! Per-patient treatment journals.
//!
//! Each patient's history is a JSONL (JSON Lines) file of
//! [`TreatmentEntry`] records, appended under an exclusive file lock.

use crate::{Error, Result, TreatmentEntry};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Somewhere treatment entries can be recorded
pub trait TreatmentSink {
    fn append(&mut self, entry: &TreatmentEntry) -> Result<()>;

    fn append_all(&mut self, entries: &[TreatmentEntry]) -> Result<()> {
        for entry in entries {
            self.append(entry)?;
        }
        Ok(())
    }
}

/// JSONL-based journal with file locking
#[derive(Debug)]
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Journal for `patient_id` under `data_dir/patients/`
    pub fn for_patient(data_dir: &Path, patient_id: &str) -> Result<Self> {
        validate_patient_id(patient_id)?;
        Ok(Self::new(
            data_dir.join("patients").join(format!("{}.jsonl", patient_id)),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry in the journal, oldest first
    pub fn read_all(&self) -> Result<Vec<TreatmentEntry>> {
        read_entries(&self.path)
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TreatmentSink for JsonlJournal {
    fn append(&mut self, entry: &TreatmentEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Appended '{}' by {} to {:?}",
            entry.treatment.name,
            entry.practitioner.name,
            self.path
        );
        Ok(())
    }
}

/// Patient ids become file names, so keep them to a safe alphabet
fn validate_patient_id(patient_id: &str) -> Result<()> {
    let valid = !patient_id.is_empty()
        && patient_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::Other(format!(
            "Invalid patient id '{}': use letters, digits, '-' or '_'",
            patient_id
        )))
    }
}

/// Read all entries from a journal file
///
/// A missing file is an empty history. Lines that aren't UTF-8 or fail to
/// parse are skipped with a warning.
pub fn read_entries(path: &Path) -> Result<Vec<TreatmentEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.split(b'\n').enumerate() {
        let bytes = line_result?;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!("Skipping non-UTF-8 treatment at line {}: {}", line_num + 1, e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<TreatmentEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse treatment at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} treatments from {:?}", entries.len(), path);
    Ok(entries)
}
