mod sqlite;

pub use sqlite::{SqliteResultStore, StoreLocation};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{FinalVerdict, LeadId};

/// Persisted outcome for one lead. Field names follow the export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub lead_id: LeadId,
    #[serde(rename = "decision")]
    pub verdict: FinalVerdict,
    #[serde(rename = "timestamp")]
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: String,
}

/// Result of an insert attempt. A duplicate key is an expected outcome when a batch
/// is reprocessed, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(ResultRecord),
    AlreadyExists,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Count of stored records per verdict, computed at query time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerdictStats(BTreeMap<FinalVerdict, u64>);

impl VerdictStats {
    pub fn record(&mut self, verdict: FinalVerdict, count: u64) {
        *self.0.entry(verdict).or_insert(0) += count;
    }

    pub fn count(&self, verdict: FinalVerdict) -> u64 {
        self.0.get(&verdict).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Share of the total held by `verdict`, as a percentage. Zero for an empty store.
    pub fn percentage(&self, verdict: FinalVerdict) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.count(verdict) as f64 / total as f64 * 100.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FinalVerdict, u64)> + '_ {
        self.0.iter().map(|(verdict, count)| (*verdict, *count))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Durable keyed storage of one outcome per lead.
///
/// Records move from absent to present exactly once; there is no update path.
pub trait ResultStore: Send + Sync {
    /// Ensures the backing store and its schema exist. Safe to call repeatedly.
    fn initialize(&self) -> Result<(), StoreError>;

    fn insert(
        &self,
        lead_id: &LeadId,
        verdict: FinalVerdict,
        reason: &str,
    ) -> Result<InsertOutcome, StoreError>;

    fn get(&self, lead_id: &LeadId) -> Result<Option<ResultRecord>, StoreError>;

    /// All records, most recently recorded first.
    fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError>;

    fn stats_by_verdict(&self) -> Result<VerdictStats, StoreError>;

    /// Removes every record and returns how many were deleted.
    fn clear(&self) -> Result<usize, StoreError>;

    /// Writes `list_all` as a pretty-printed JSON array.
    fn export_to_writer<W: Write>(&self, mut writer: W) -> Result<usize, StoreError>
    where
        Self: Sized,
    {
        let records = self.list_all()?;
        serde_json::to_writer_pretty(&mut writer, &records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(records.len())
    }

    fn export_all(&self, destination: &Path) -> Result<usize, StoreError>
    where
        Self: Sized,
    {
        let file = File::create(destination)?;
        let written = self.export_to_writer(BufWriter::new(file))?;
        info!(records = written, path = %destination.display(), "exported lead results");
        Ok(written)
    }
}

/// Error enumeration for result store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("result store database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("result store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize lead results: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("stored record for lead {lead_id} is corrupt: {detail}")]
    CorruptRecord { lead_id: String, detail: String },
    #[error("result store unavailable: {0}")]
    Unavailable(String),
}
