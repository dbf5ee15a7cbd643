use crate::infra::{bootstrap, open_store};
use clap::{Args, Subcommand};
use lead_qa::error::AppError;
use lead_qa::screening::{FinalVerdict, LeadId, ResultStore};
use std::io::Write;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub(crate) enum QueryCommand {
    /// List every stored decision, newest first
    List(StoreArgs),
    /// Count and share of stored decisions per verdict
    Stats(StoreArgs),
    /// Show the stored decision for one lead
    Show {
        lead_id: String,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Write every stored decision to a JSON document
    Export {
        /// Destination file. Defaults to APP_EXPORT_PATH.
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct StoreArgs {
    /// Result database. Defaults to APP_DATABASE_PATH.
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ResetArgs {
    #[command(flatten)]
    pub(crate) store: StoreArgs,
}

pub(crate) fn run_query(command: QueryCommand) -> Result<(), AppError> {
    let config = bootstrap()?;
    let mut stdout = std::io::stdout().lock();

    match command {
        QueryCommand::List(args) => {
            let store = open_store(&config.storage, args.database)?;
            render_list(store.as_ref(), &mut stdout)
        }
        QueryCommand::Stats(args) => {
            let store = open_store(&config.storage, args.database)?;
            render_stats(store.as_ref(), &mut stdout)
        }
        QueryCommand::Show { lead_id, store } => {
            let store = open_store(&config.storage, store.database)?;
            render_lead(store.as_ref(), &LeadId(lead_id), &mut stdout)
        }
        QueryCommand::Export { output, store } => {
            let store = open_store(&config.storage, store.database)?;
            let destination = output.unwrap_or_else(|| config.batch.export_path.clone());
            let written = store.export_all(&destination)?;
            writeln!(
                stdout,
                "Exported {written} record(s) to {}",
                destination.display()
            )?;
            Ok(())
        }
    }
}

pub(crate) fn run_reset(args: ResetArgs) -> Result<(), AppError> {
    let config = bootstrap()?;
    let store = open_store(&config.storage, args.store.database)?;
    let removed = store.clear()?;
    println!("Removed {removed} stored decision(s)");
    Ok(())
}

pub(crate) fn render_list<S, W>(store: &S, out: &mut W) -> Result<(), AppError>
where
    S: ResultStore,
    W: Write,
{
    let records = store.list_all()?;
    if records.is_empty() {
        writeln!(out, "No stored decisions")?;
        return Ok(());
    }

    for record in &records {
        writeln!(
            out,
            "{:<16} {:<13} {}  {}",
            record.lead_id.as_str(),
            record.verdict.label(),
            record.recorded_at.to_rfc3339(),
            record.reason
        )?;
    }
    writeln!(out, "\n{} record(s)", records.len())?;
    Ok(())
}

pub(crate) fn render_stats<S, W>(store: &S, out: &mut W) -> Result<(), AppError>
where
    S: ResultStore,
    W: Write,
{
    let stats = store.stats_by_verdict()?;
    writeln!(out, "Decision Statistics:")?;
    for verdict in FinalVerdict::ALL {
        let count = stats.count(verdict);
        if count == 0 {
            continue;
        }
        writeln!(
            out,
            "  {}: {} ({:.1}%)",
            verdict,
            count,
            stats.percentage(verdict)
        )?;
    }
    writeln!(out, "  TOTAL: {}", stats.total())?;
    Ok(())
}

/// Prints one stored record as JSON. An unknown id is reported as `NotFound`.
pub(crate) fn render_lead<S, W>(store: &S, lead_id: &LeadId, out: &mut W) -> Result<(), AppError>
where
    S: ResultStore,
    W: Write,
{
    let record = store
        .get(lead_id)?
        .ok_or_else(|| AppError::NotFound(format!("lead {lead_id}")))?;
    let rendered = serde_json::to_string_pretty(&record).map_err(std::io::Error::from)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}
