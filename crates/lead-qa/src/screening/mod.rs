//! Lead screening: static rule validation, automated quality review, final decision
//! and durable result storage.

pub mod decision;
pub mod domain;
pub mod judge;
pub mod loader;
pub mod pipeline;
pub mod router;
pub mod rules;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use decision::decide;
pub use domain::{FinalVerdict, Lead, LeadId};
pub use judge::{
    HeuristicJudge, JudgeError, JudgeThresholds, JudgeVerdict, Judgment, QualityJudge,
};
pub use loader::{load_leads, write_results, LeadSourceError};
pub use pipeline::{LeadPipeline, LeadResult};
pub use router::results_router;
pub use rules::validate;
pub use service::{BatchSummary, LeadScreeningService, ServiceError};
pub use store::{
    InsertOutcome, ResultRecord, ResultStore, SqliteResultStore, StoreError, StoreLocation,
    VerdictStats,
};
