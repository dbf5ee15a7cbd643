//! Automated quality review consulted for leads that pass the static rules.
//!
//! The judge stands in for an external reviewer that may be slow or unreliable.
//! Implementations report failures through [`JudgeError`]; the pipeline turns any
//! error into "no judgment", which the combiner resolves to manual review.

mod heuristic;

pub use heuristic::{HeuristicJudge, JudgeThresholds};

use serde::{Deserialize, Serialize};

use super::domain::Lead;

/// Swappable reviewer contract. A service-backed reviewer implements this and maps
/// transport or parse failures into [`JudgeError`].
pub trait QualityJudge: Send + Sync {
    fn judge(&self, lead: &Lead) -> Result<Judgment, JudgeError>;
}

/// Verdict vocabulary used by the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JudgeVerdict {
    Approve,
    Reject,
    NeedsReview,
}

impl JudgeVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            JudgeVerdict::Approve => "APPROVE",
            JudgeVerdict::Reject => "REJECT",
            JudgeVerdict::NeedsReview => "NEEDS_REVIEW",
        }
    }

    /// Parses a verdict string returned by a reviewer, ignoring case and surrounding
    /// whitespace. Anything outside the vocabulary is a malformed response.
    pub fn parse(raw: &str) -> Result<Self, JudgeError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "APPROVE" => Ok(JudgeVerdict::Approve),
            "REJECT" => Ok(JudgeVerdict::Reject),
            "NEEDS_REVIEW" => Ok(JudgeVerdict::NeedsReview),
            other => Err(JudgeError::MalformedResponse(format!(
                "unrecognized verdict '{other}'"
            ))),
        }
    }
}

/// Reviewer output: a verdict plus a short human-readable rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub verdict: JudgeVerdict,
    pub rationale: String,
}

impl Judgment {
    pub fn new(verdict: JudgeVerdict, rationale: impl Into<String>) -> Self {
        Self {
            verdict,
            rationale: rationale.into(),
        }
    }

    /// Reads a reviewer reply shaped as `{"decision": "...", "reason": "..."}`.
    pub fn from_response(raw: &str) -> Result<Self, JudgeError> {
        #[derive(Deserialize)]
        struct Reply {
            decision: String,
            #[serde(default)]
            reason: Option<String>,
        }

        let reply: Reply = serde_json::from_str(raw)
            .map_err(|err| JudgeError::MalformedResponse(err.to_string()))?;
        let verdict = JudgeVerdict::parse(&reply.decision)?;

        Ok(Self::new(verdict, reply.reason.unwrap_or_default()))
    }
}

/// Failure modes of a reviewer call. None of them abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JudgeError {
    #[error("quality judge unavailable: {0}")]
    Unavailable(String),
    #[error("quality judge returned a malformed response: {0}")]
    MalformedResponse(String),
}
