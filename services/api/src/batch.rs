use crate::infra::{bootstrap, open_store};
use clap::Args;
use lead_qa::config::{AppConfig, StorageConfig};
use lead_qa::error::AppError;
use lead_qa::screening::{
    load_leads, write_results, BatchSummary, FinalVerdict, HeuristicJudge, LeadScreeningService,
    LeadSourceError, ResultStore, VerdictStats,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const RULE: &str = "==================================================";

#[derive(Args, Debug, Default)]
pub(crate) struct ProcessArgs {
    /// Lead batch to screen (JSON array or CSV). Defaults to APP_LEADS_PATH.
    #[arg(long)]
    pub(crate) leads: Option<PathBuf>,
    /// Where to write the per-lead results document. Defaults to APP_RESULTS_PATH.
    #[arg(long)]
    pub(crate) results: Option<PathBuf>,
    /// Result database. Defaults to APP_DATABASE_PATH.
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

/// Resolved file locations for one batch run.
#[derive(Debug, Clone)]
pub(crate) struct ProcessSettings {
    pub(crate) leads_path: PathBuf,
    pub(crate) results_path: PathBuf,
    pub(crate) storage: StorageConfig,
}

impl ProcessSettings {
    pub(crate) fn resolve(config: &AppConfig, args: ProcessArgs) -> Self {
        Self {
            leads_path: args.leads.unwrap_or_else(|| config.batch.leads_path.clone()),
            results_path: args
                .results
                .unwrap_or_else(|| config.batch.results_path.clone()),
            storage: match args.database {
                Some(database_path) => StorageConfig { database_path },
                None => config.storage.clone(),
            },
        }
    }
}

pub(crate) fn run_process(args: ProcessArgs) -> Result<(), AppError> {
    let config = bootstrap()?;
    let settings = ProcessSettings::resolve(&config, args);
    let mut stdout = std::io::stdout().lock();
    process_batch(&settings, &mut stdout)?;
    Ok(())
}

/// Runs one batch and renders the console report. Returns `None` when there was
/// nothing to screen.
pub(crate) fn process_batch<W: Write>(
    settings: &ProcessSettings,
    out: &mut W,
) -> Result<Option<BatchSummary>, AppError> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Lead QA batch run")?;
    writeln!(out, "{RULE}")?;

    let store = open_store(&settings.storage, None)?;

    let leads = match load_leads(&settings.leads_path) {
        Ok(leads) => leads,
        Err(LeadSourceError::Missing { path }) => {
            warn!(path = %path.display(), "lead source not found");
            Vec::new()
        }
        Err(other) => return Err(other.into()),
    };

    if leads.is_empty() {
        writeln!(out, "No leads to process")?;
        return Ok(None);
    }

    writeln!(out, "\nLoaded {} leads", leads.len())?;

    let service = LeadScreeningService::new(store.clone(), Arc::new(HeuristicJudge::default()));
    let summary = service.run_batch(&leads)?;

    for result in &summary.results {
        writeln!(out, "\n--- Lead {} ---", result.lead_id)?;
        let rendered = serde_json::to_string_pretty(result).map_err(std::io::Error::from)?;
        writeln!(out, "{rendered}")?;
    }

    write_results(&settings.results_path, &summary.results)?;
    writeln!(
        out,
        "\nResults saved to {}",
        settings.results_path.display()
    )?;

    if !summary.duplicates.is_empty() {
        let ids: Vec<&str> = summary.duplicates.iter().map(|id| id.as_str()).collect();
        writeln!(
            out,
            "Skipped {} lead(s) already in the result store: {}",
            ids.len(),
            ids.join(", ")
        )?;
    }

    let stats = store.stats_by_verdict()?;
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Decision Statistics:")?;
    write!(out, "{}", render_statistics(&stats))?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Processing complete!")?;
    writeln!(out, "{RULE}")?;

    Ok(Some(summary))
}

pub(crate) fn render_statistics(stats: &VerdictStats) -> String {
    FinalVerdict::ALL
        .into_iter()
        .filter(|verdict| stats.count(*verdict) > 0)
        .map(|verdict| format!("  {}: {}\n", verdict, stats.count(verdict)))
        .collect()
}
