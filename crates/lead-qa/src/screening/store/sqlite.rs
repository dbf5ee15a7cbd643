//! SQLite-backed result store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use super::{InsertOutcome, ResultRecord, ResultStore, StoreError, VerdictStats};
use crate::config::StorageConfig;
use crate::screening::domain::{FinalVerdict, LeadId};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS leads (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        lead_id TEXT NOT NULL UNIQUE,
        decision TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        reason TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_leads_timestamp ON leads(timestamp);
"#;

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

/// Result store over a single SQLite connection.
pub struct SqliteResultStore {
    conn: Mutex<Connection>,
    location: StoreLocation,
}

impl SqliteResultStore {
    /// Opens (creating if needed) the database file and ensures the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        let store = Self {
            conn: Mutex::new(conn),
            location: StoreLocation::File(path),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StoreError> {
        Self::open(&config.database_path)
    }

    /// Creates a private in-memory database (for tests and dry runs).
    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            location: StoreLocation::InMemory,
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl ResultStore for SqliteResultStore {
    fn initialize(&self) -> Result<(), StoreError> {
        self.connection()?.execute_batch(SCHEMA)?;
        info!(location = ?self.location, "result store ready");
        Ok(())
    }

    fn insert(
        &self,
        lead_id: &LeadId,
        verdict: FinalVerdict,
        reason: &str,
    ) -> Result<InsertOutcome, StoreError> {
        let recorded_at = Utc::now();
        let inserted = self.connection()?.execute(
            "INSERT INTO leads (lead_id, decision, timestamp, reason)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(lead_id) DO NOTHING",
            params![
                lead_id.as_str(),
                verdict.label(),
                format_timestamp(&recorded_at),
                reason
            ],
        )?;

        if inserted == 0 {
            warn!(%lead_id, "lead already exists in result store; keeping original record");
            return Ok(InsertOutcome::AlreadyExists);
        }

        Ok(InsertOutcome::Inserted(ResultRecord {
            lead_id: lead_id.clone(),
            verdict,
            recorded_at,
            reason: reason.to_string(),
        }))
    }

    fn get(&self, lead_id: &LeadId) -> Result<Option<ResultRecord>, StoreError> {
        let row = self
            .connection()?
            .query_row(
                "SELECT lead_id, decision, timestamp, reason FROM leads WHERE lead_id = ?1",
                [lead_id.as_str()],
                read_row,
            )
            .optional()?;

        row.map(RawRecord::into_record).transpose()
    }

    fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let conn = self.connection()?;
        let mut statement = conn.prepare(
            "SELECT lead_id, decision, timestamp, reason FROM leads
             ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = statement
            .query_map([], read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawRecord::into_record).collect()
    }

    fn stats_by_verdict(&self) -> Result<VerdictStats, StoreError> {
        let conn = self.connection()?;
        let mut statement =
            conn.prepare("SELECT decision, COUNT(*) FROM leads GROUP BY decision")?;
        let rows = statement
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stats = VerdictStats::default();
        for (decision, count) in rows {
            let verdict =
                FinalVerdict::from_label(&decision).ok_or_else(|| StoreError::CorruptRecord {
                    lead_id: "*".to_string(),
                    detail: format!("unknown decision '{decision}'"),
                })?;
            stats.record(verdict, count.max(0) as u64);
        }
        Ok(stats)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let removed = self.connection()?.execute("DELETE FROM leads", [])?;
        info!(removed, "cleared result store");
        Ok(removed)
    }
}

struct RawRecord {
    lead_id: String,
    decision: String,
    timestamp: String,
    reason: Option<String>,
}

impl RawRecord {
    fn into_record(self) -> Result<ResultRecord, StoreError> {
        let verdict =
            FinalVerdict::from_label(&self.decision).ok_or_else(|| StoreError::CorruptRecord {
                lead_id: self.lead_id.clone(),
                detail: format!("unknown decision '{}'", self.decision),
            })?;
        let recorded_at =
            parse_timestamp(&self.timestamp).map_err(|err| StoreError::CorruptRecord {
                lead_id: self.lead_id.clone(),
                detail: format!("invalid timestamp '{}': {err}", self.timestamp),
            })?;

        Ok(ResultRecord {
            lead_id: LeadId(self.lead_id),
            verdict,
            recorded_at,
            reason: self.reason.unwrap_or_default(),
        })
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        lead_id: row.get(0)?,
        decision: row.get(1)?,
        timestamp: row.get(2)?,
        reason: row.get(3)?,
    })
}

/// Offset-less ISO 8601 forms written by earlier tooling; read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let rfc3339_err = match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => return Ok(parsed.with_timezone(&Utc)),
        Err(err) => err,
    };

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or(rfc3339_err)
}

// Fixed-width nanosecond form so lexical order in SQL matches chronological order.
fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}
