use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::decision::decide;
use super::domain::{FinalVerdict, Lead, LeadId};
use super::judge::{Judgment, QualityJudge};
use super::rules;

/// Per-lead summary emitted by the pipeline, in the shape of the run's output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadResult {
    pub lead_id: LeadId,
    #[serde(rename = "decision")]
    pub verdict: FinalVerdict,
    pub rule_errors: Vec<String>,
    #[serde(rename = "llm_reason")]
    pub judge_rationale: String,
}

impl LeadResult {
    /// Reason persisted alongside the verdict: the reviewer rationale when one was
    /// obtained, otherwise the rule violations joined into one line.
    pub fn reason(&self) -> String {
        if self.judge_rationale.is_empty() {
            self.rule_errors.join(", ")
        } else {
            self.judge_rationale.clone()
        }
    }
}

/// Runs rule validation, the conditional reviewer call and the combiner for one lead.
/// Persistence is left to the caller.
pub struct LeadPipeline<J: ?Sized> {
    judge: Arc<J>,
}

impl<J> LeadPipeline<J>
where
    J: QualityJudge + ?Sized + 'static,
{
    pub fn new(judge: Arc<J>) -> Self {
        Self { judge }
    }

    pub fn process_lead(&self, lead: &Lead) -> LeadResult {
        let rule_errors = rules::validate(lead);

        let judgment = if rule_errors.is_empty() {
            self.consult_judge(lead)
        } else {
            debug!(lead_id = %lead.id, violations = rule_errors.len(), "rules preempted review");
            None
        };

        let verdict = decide(&rule_errors, judgment.as_ref());

        LeadResult {
            lead_id: lead.id.clone(),
            verdict,
            rule_errors,
            judge_rationale: judgment
                .map(|judgment| judgment.rationale)
                .unwrap_or_default(),
        }
    }

    fn consult_judge(&self, lead: &Lead) -> Option<Judgment> {
        match self.judge.judge(lead) {
            Ok(judgment) => Some(judgment),
            Err(err) => {
                warn!(lead_id = %lead.id, error = %err, "quality review failed; continuing without judgment");
                None
            }
        }
    }
}
