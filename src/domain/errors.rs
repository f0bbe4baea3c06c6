use std::fmt;

use custom_error::custom_error;

/// A validation rule a send request can break, in the order the rules are
/// checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    MissingRequiredFields,
    InvalidEmail,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingRequiredFields => {
                write!(f, "Missing required fields: to, subject, body")
            }
            Violation::InvalidEmail => write!(f, "Invalid email address"),
        }
    }
}

fn first_violation(violations: &[Violation]) -> String {
    violations
        .first()
        .map(Violation::to_string)
        .unwrap_or_default()
}

custom_error! {
///! Custom error for a request body that cannot become a `SendRequest`.
pub MalformedInput
    InvalidJson{source:serde_json::Error} = "Invalid JSON body",
    Violations{violations:Vec<Violation>} = @{ first_violation(violations) },
}

impl MalformedInput {
    pub fn violations(&self) -> &[Violation] {
        match self {
            MalformedInput::InvalidJson { .. } => &[],
            MalformedInput::Violations { violations } => violations,
        }
    }
}
