use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{Lead, LeadId};
use super::judge::QualityJudge;
use super::pipeline::{LeadPipeline, LeadResult};
use super::store::{InsertOutcome, ResultStore, StoreError};

/// Service composing the screening pipeline with the result store.
pub struct LeadScreeningService<S, J: ?Sized> {
    pipeline: LeadPipeline<J>,
    store: Arc<S>,
}

impl<S, J> LeadScreeningService<S, J>
where
    S: ResultStore + 'static,
    J: QualityJudge + ?Sized + 'static,
{
    pub fn new(store: Arc<S>, judge: Arc<J>) -> Self {
        Self {
            pipeline: LeadPipeline::new(judge),
            store,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Screen and persist a single lead.
    pub fn screen(&self, lead: &Lead) -> Result<(LeadResult, InsertOutcome), ServiceError> {
        let result = self.pipeline.process_lead(lead);
        let outcome = self
            .store
            .insert(&result.lead_id, result.verdict, &result.reason())?;

        info!(
            lead_id = %result.lead_id,
            verdict = %result.verdict,
            stored = outcome.is_inserted(),
            "lead screened"
        );

        Ok((result, outcome))
    }

    /// Screen every lead in input order. Duplicate keys are collected and skipped;
    /// only store failures stop the batch.
    pub fn run_batch(&self, leads: &[Lead]) -> Result<BatchSummary, ServiceError> {
        let mut summary = BatchSummary::default();

        for lead in leads {
            let (result, outcome) = self.screen(lead)?;
            match outcome {
                InsertOutcome::Inserted(_) => summary.stored += 1,
                InsertOutcome::AlreadyExists => summary.duplicates.push(result.lead_id.clone()),
            }
            summary.results.push(result);
        }

        info!(
            processed = summary.results.len(),
            stored = summary.stored,
            duplicates = summary.duplicates.len(),
            "batch complete"
        );

        Ok(summary)
    }
}

/// Outcome of a batch run, results kept in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub results: Vec<LeadResult>,
    pub stored: usize,
    pub duplicates: Vec<LeadId>,
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
