use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for inbound leads.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl LeadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LeadId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Contact or inquiry submission as received from the intake source.
///
/// Nothing is validated here. Blank or malformed fields are surfaced later as
/// rule violations so a defective lead still produces a result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Lead {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: LeadId(id.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Description text, with an absent value read as empty.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Description length in characters.
    pub fn description_len(&self) -> usize {
        self.description().chars().count()
    }
}

/// Final disposition stored per lead. Only produced by the decision combiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalVerdict {
    Approved,
    Rejected,
    NeedsReview,
}

impl FinalVerdict {
    pub const ALL: [FinalVerdict; 3] = [
        FinalVerdict::Approved,
        FinalVerdict::Rejected,
        FinalVerdict::NeedsReview,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            FinalVerdict::Approved => "APPROVED",
            FinalVerdict::Rejected => "REJECTED",
            FinalVerdict::NeedsReview => "NEEDS_REVIEW",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|verdict| verdict.label() == value.trim())
    }
}

impl fmt::Display for FinalVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
