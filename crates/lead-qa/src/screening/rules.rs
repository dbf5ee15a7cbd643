use super::domain::Lead;

pub const MISSING_NAME: &str = "Missing name";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const DESCRIPTION_TOO_SHORT: &str = "Description too short";

/// Descriptions under this many characters fail validation.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Runs every static check against a lead and returns the failures in check order
/// (name, email, description). An empty list means the lead may go to the judge.
///
/// All checks run even after one fails so the caller sees every defect at once.
pub fn validate(lead: &Lead) -> Vec<String> {
    let mut violations = Vec::new();

    if lead.name.as_deref().map_or(true, str::is_empty) {
        violations.push(MISSING_NAME.to_string());
    }

    if !lead
        .email
        .as_deref()
        .is_some_and(|email| email.contains('@'))
    {
        violations.push(INVALID_EMAIL.to_string());
    }

    if lead.description_len() < MIN_DESCRIPTION_CHARS {
        violations.push(DESCRIPTION_TOO_SHORT.to_string());
    }

    violations
}
