use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::screening::domain::{FinalVerdict, Lead, LeadId};
use crate::screening::judge::{HeuristicJudge, JudgeError, JudgeVerdict, Judgment, QualityJudge};
use crate::screening::pipeline::LeadPipeline;
use crate::screening::service::LeadScreeningService;
use crate::screening::store::{
    InsertOutcome, ResultRecord, ResultStore, SqliteResultStore, StoreError, VerdictStats,
};

/// Empty name and a short description.
pub(super) fn scenario_a_lead() -> Lead {
    Lead::new("L1")
        .with_name("")
        .with_email("a@b.com")
        .with_description("short")
}

/// Complete lead with a usable phone number.
pub(super) fn scenario_b_lead() -> Lead {
    Lead::new("L2")
        .with_name("Jane")
        .with_email("j@x.com")
        .with_description("A very complete and clear inquiry about services")
        .with_phone("555-1234")
}

/// Passes the rules but has no usable phone number.
pub(super) fn scenario_c_lead() -> Lead {
    Lead::new("L3")
        .with_name("Bob")
        .with_email("b@x.com")
        .with_description("Need info please")
        .with_phone("")
}

pub(super) fn batch() -> Vec<Lead> {
    vec![scenario_a_lead(), scenario_b_lead(), scenario_c_lead()]
}

pub(super) fn heuristic_pipeline() -> LeadPipeline<HeuristicJudge> {
    LeadPipeline::new(Arc::new(HeuristicJudge::default()))
}

pub(super) fn sqlite_service() -> (
    LeadScreeningService<SqliteResultStore, HeuristicJudge>,
    Arc<SqliteResultStore>,
) {
    let store = Arc::new(SqliteResultStore::in_memory().expect("in-memory store"));
    let service = LeadScreeningService::new(store.clone(), Arc::new(HeuristicJudge::default()));
    (service, store)
}

/// Returns a fixed judgment and counts how often it was asked.
pub(super) struct ScriptedJudge {
    judgment: Judgment,
    calls: AtomicUsize,
}

impl ScriptedJudge {
    pub(super) fn new(verdict: JudgeVerdict, rationale: &str) -> Self {
        Self {
            judgment: Judgment::new(verdict, rationale),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QualityJudge for ScriptedJudge {
    fn judge(&self, _lead: &Lead) -> Result<Judgment, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.judgment.clone())
    }
}

pub(super) struct FailingJudge(pub(super) JudgeError);

impl QualityJudge for FailingJudge {
    fn judge(&self, _lead: &Lead) -> Result<Judgment, JudgeError> {
        Err(self.0.clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryResultStore {
    records: Mutex<Vec<ResultRecord>>,
}

impl ResultStore for MemoryResultStore {
    fn initialize(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn insert(
        &self,
        lead_id: &LeadId,
        verdict: FinalVerdict,
        reason: &str,
    ) -> Result<InsertOutcome, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.iter().any(|record| &record.lead_id == lead_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        let record = ResultRecord {
            lead_id: lead_id.clone(),
            verdict,
            recorded_at: Utc::now(),
            reason: reason.to_string(),
        };
        guard.push(record.clone());
        Ok(InsertOutcome::Inserted(record))
    }

    fn get(&self, lead_id: &LeadId) -> Result<Option<ResultRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().find(|record| &record.lead_id == lead_id).cloned())
    }

    fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.iter().rev().cloned().collect())
    }

    fn stats_by_verdict(&self) -> Result<VerdictStats, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut stats = VerdictStats::default();
        for record in guard.iter() {
            stats.record(record.verdict, 1);
        }
        Ok(stats)
    }

    fn clear(&self) -> Result<usize, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }
}

pub(super) struct UnavailableStore;

impl ResultStore for UnavailableStore {
    fn initialize(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn insert(
        &self,
        _lead_id: &LeadId,
        _verdict: FinalVerdict,
        _reason: &str,
    ) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _lead_id: &LeadId) -> Result<Option<ResultRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<ResultRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn stats_by_verdict(&self) -> Result<VerdictStats, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn clear(&self) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
