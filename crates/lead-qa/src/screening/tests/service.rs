use std::sync::Arc;

use super::common::*;
use crate::screening::domain::{FinalVerdict, LeadId};
use crate::screening::judge::{HeuristicJudge, JudgeError, QualityJudge};
use crate::screening::service::{LeadScreeningService, ServiceError};
use crate::screening::store::{InsertOutcome, ResultStore, StoreError};

#[test]
fn batch_persists_each_lead_with_its_reason() {
    let (service, store) = sqlite_service();

    let summary = service.run_batch(&batch()).expect("batch runs");

    assert_eq!(summary.stored, 3);
    assert!(summary.duplicates.is_empty());
    let verdicts: Vec<FinalVerdict> = summary.results.iter().map(|r| r.verdict).collect();
    assert_eq!(
        verdicts,
        vec![
            FinalVerdict::Rejected,
            FinalVerdict::Approved,
            FinalVerdict::NeedsReview
        ]
    );

    let rejected = store
        .get(&LeadId::from("L1"))
        .expect("get")
        .expect("stored");
    assert_eq!(rejected.reason, "Missing name, Description too short");

    let approved = store
        .get(&LeadId::from("L2"))
        .expect("get")
        .expect("stored");
    assert_eq!(approved.reason, "Clear description and valid contact info");
}

#[test]
fn reprocessing_reports_duplicates_without_overwriting() {
    let (service, store) = sqlite_service();
    service.run_batch(&batch()).expect("first run");
    let before = store.list_all().expect("list");

    let mut changed = batch();
    changed[1].phone = None;
    let summary = service.run_batch(&changed).expect("second run");

    assert_eq!(summary.stored, 0);
    assert_eq!(
        summary.duplicates,
        vec![LeadId::from("L1"), LeadId::from("L2"), LeadId::from("L3")]
    );
    assert_eq!(summary.results[1].verdict, FinalVerdict::NeedsReview);
    assert_eq!(store.list_all().expect("list"), before);
}

#[test]
fn duplicate_ids_within_one_batch_keep_the_first() {
    let store = Arc::new(MemoryResultStore::default());
    let service = LeadScreeningService::new(store.clone(), Arc::new(HeuristicJudge::default()));
    let mut leads = batch();
    let mut repeat = scenario_a_lead();
    repeat.id = LeadId::from("L2");
    leads.push(repeat);

    let summary = service.run_batch(&leads).expect("batch runs");

    assert_eq!(summary.results.len(), 4);
    assert_eq!(summary.stored, 3);
    assert_eq!(summary.duplicates, vec![LeadId::from("L2")]);
    let stored = store.get(&LeadId::from("L2")).expect("get").expect("present");
    assert_eq!(stored.verdict, FinalVerdict::Approved);
}

#[test]
fn judge_outage_does_not_abort_the_batch() {
    let store = Arc::new(MemoryResultStore::default());
    let judge = Arc::new(FailingJudge(JudgeError::Unavailable(
        "reviewer timed out".to_string(),
    )));
    let service = LeadScreeningService::new(store.clone(), judge);

    let summary = service.run_batch(&batch()).expect("batch runs");

    assert_eq!(summary.stored, 3);
    let stats = store.stats_by_verdict().expect("stats");
    assert_eq!(stats.count(FinalVerdict::Rejected), 1);
    assert_eq!(stats.count(FinalVerdict::NeedsReview), 2);
    assert_eq!(stats.count(FinalVerdict::Approved), 0);
}

#[test]
fn screen_returns_insert_outcome() {
    let (service, _) = sqlite_service();

    let (result, outcome) = service.screen(&scenario_b_lead()).expect("screened");

    assert_eq!(result.verdict, FinalVerdict::Approved);
    match outcome {
        InsertOutcome::Inserted(record) => {
            assert_eq!(record.lead_id, result.lead_id);
            assert_eq!(record.reason, result.reason());
        }
        other => panic!("expected insert, got {other:?}"),
    }
    assert_eq!(service.store().list_all().expect("list").len(), 1);
}

#[test]
fn store_failures_abort_the_batch() {
    let service =
        LeadScreeningService::new(Arc::new(UnavailableStore), Arc::new(HeuristicJudge::default()));

    match service.run_batch(&batch()) {
        Err(ServiceError::Store(StoreError::Unavailable(detail))) => {
            assert_eq!(detail, "database offline")
        }
        other => panic!("expected store error, got {other:?}"),
    }
}

#[test]
fn empty_batch_is_a_no_op() {
    let (service, store) = sqlite_service();

    let summary = service.run_batch(&[]).expect("batch runs");

    assert!(summary.results.is_empty());
    assert_eq!(summary.stored, 0);
    assert!(store.list_all().expect("list").is_empty());
}

#[test]
fn judge_can_be_chosen_at_runtime() {
    let judges: Vec<Arc<dyn QualityJudge>> = vec![
        Arc::new(HeuristicJudge::default()),
        Arc::new(FailingJudge(JudgeError::Unavailable("offline".to_string()))),
    ];
    let verdicts: Vec<FinalVerdict> = judges
        .into_iter()
        .map(|judge| {
            let store = Arc::new(MemoryResultStore::default());
            let service = LeadScreeningService::new(store, judge);
            let (result, _) = service.screen(&scenario_b_lead()).expect("screen");
            result.verdict
        })
        .collect();

    assert_eq!(verdicts, vec![FinalVerdict::Approved, FinalVerdict::NeedsReview]);
}
