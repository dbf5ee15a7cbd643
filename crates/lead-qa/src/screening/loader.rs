//! Batch intake and result documents.
//!
//! Leads arrive as a JSON array of objects or as a CSV export with an
//! `id,name,email,description,phone` header. Results are written back as a
//! pretty-printed JSON array in input order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use super::domain::{Lead, LeadId};
use super::pipeline::LeadResult;

/// Failure to read a lead batch.
#[derive(Debug, thiserror::Error)]
pub enum LeadSourceError {
    #[error("lead source {} not found", path.display())]
    Missing { path: PathBuf },
    #[error("failed to read leads: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lead JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads a lead batch, picking the format from the file extension (`.csv` or JSON).
pub fn load_leads<P: AsRef<Path>>(path: P) -> Result<Vec<Lead>, LeadSourceError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(LeadSourceError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(err.into()),
    };

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let leads = if is_csv {
        leads_from_csv(file)?
    } else {
        leads_from_json(BufReader::new(file))?
    };

    info!(count = leads.len(), path = %path.display(), "loaded leads");
    Ok(leads)
}

pub fn leads_from_json<R: Read>(reader: R) -> Result<Vec<Lead>, LeadSourceError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn leads_from_csv<R: Read>(reader: R) -> Result<Vec<Lead>, LeadSourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut leads = Vec::new();
    for row in csv_reader.deserialize::<LeadRow>() {
        leads.push(row?.into());
    }
    Ok(leads)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Lead {
            id: LeadId(row.id),
            name: row.name,
            email: row.email,
            description: row.description,
            phone: row.phone,
        }
    }
}

/// Writes batch results as a pretty-printed JSON array.
pub fn write_results<P: AsRef<Path>>(path: P, results: &[LeadResult]) -> Result<(), std::io::Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(count = results.len(), path = %path.display(), "wrote lead results");
    Ok(())
}
