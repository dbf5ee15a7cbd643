use super::domain::FinalVerdict;
use super::judge::{JudgeVerdict, Judgment};

/// Combines rule violations with the optional reviewer judgment.
///
/// Rules always win. Only an explicit reviewer approval yields `Approved`; a reviewer
/// rejection is routed to manual review rather than rejected outright.
pub fn decide(violations: &[String], judgment: Option<&Judgment>) -> FinalVerdict {
    if !violations.is_empty() {
        return FinalVerdict::Rejected;
    }

    match judgment {
        Some(Judgment {
            verdict: JudgeVerdict::Approve,
            ..
        }) => FinalVerdict::Approved,
        _ => FinalVerdict::NeedsReview,
    }
}
