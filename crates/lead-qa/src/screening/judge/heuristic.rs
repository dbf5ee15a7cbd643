use serde::{Deserialize, Serialize};

use super::{JudgeError, JudgeVerdict, Judgment, QualityJudge};
use crate::screening::domain::Lead;

const APPROVE_RATIONALE: &str = "Clear description and valid contact info";
const REVIEW_RATIONALE: &str = "Adequate description but limited contact details";
const REJECT_RATIONALE: &str = "Insufficient information provided";

/// Length cut-offs used by the heuristic reviewer. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeThresholds {
    pub approve_description_chars: usize,
    pub min_phone_chars: usize,
    pub review_description_chars: usize,
}

impl Default for JudgeThresholds {
    fn default() -> Self {
        Self {
            approve_description_chars: 30,
            min_phone_chars: 5,
            review_description_chars: 10,
        }
    }
}

/// Rule-based stand-in for the external reviewer.
#[derive(Debug, Clone, Default)]
pub struct HeuristicJudge {
    thresholds: JudgeThresholds,
}

impl HeuristicJudge {
    pub fn new(thresholds: JudgeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &JudgeThresholds {
        &self.thresholds
    }
}

impl QualityJudge for HeuristicJudge {
    fn judge(&self, lead: &Lead) -> Result<Judgment, JudgeError> {
        let description_len = lead.description_len();
        let phone_len = lead
            .phone
            .as_deref()
            .map(|phone| phone.chars().count())
            .unwrap_or(0);

        let judgment = if description_len > self.thresholds.approve_description_chars
            && phone_len > self.thresholds.min_phone_chars
        {
            Judgment::new(JudgeVerdict::Approve, APPROVE_RATIONALE)
        } else if description_len > self.thresholds.review_description_chars {
            Judgment::new(JudgeVerdict::NeedsReview, REVIEW_RATIONALE)
        } else {
            Judgment::new(JudgeVerdict::Reject, REJECT_RATIONALE)
        };

        Ok(judgment)
    }
}
