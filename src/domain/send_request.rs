use std::convert::TryFrom;

use serde_json::{
    Map,
    Value,
};

use crate::domain::errors::{
    MalformedInput,
    Violation,
};
use crate::domain::recipient_email::RecipientEmail;

/// A validated notification: who gets it, what it says, and an optional
/// category tag the caller uses for its own bookkeeping.
#[derive(Clone, Debug)]
pub struct SendRequest {
    pub to: RecipientEmail,
    pub subject: String,
    pub body: String,
    pub category: Option<String>,
}

impl SendRequest {
    /// Parse and validate a raw JSON request body in a single pass.
    ///
    /// An empty body reads as `{}`, and so does any JSON document that is not
    /// an object. Every broken rule is collected in check order.
    pub fn parse(raw_body: &[u8]) -> Result<Self, MalformedInput> {
        let document: Value = if raw_body.is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(raw_body)?
        };
        match document {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Self::from_fields(Map::new()),
        }
    }

    fn from_fields(mut fields: Map<String, Value>) -> Result<Self, MalformedInput> {
        let to = present(fields.remove("to"));
        let subject = present(fields.remove("subject"));
        let body = present(fields.remove("body"));
        let category = present(fields.remove("type"));

        let mut violations = Vec::new();
        if to.is_none() || subject.is_none() || body.is_none() {
            violations.push(Violation::MissingRequiredFields);
        }
        let to = match to.map(RecipientEmail::try_from) {
            Some(Ok(to)) => Some(to),
            Some(Err(violation)) => {
                violations.push(violation);
                None
            }
            None => None,
        };

        match (to, subject, body) {
            (Some(to), Some(subject), Some(body)) if violations.is_empty() => Ok(Self {
                to,
                subject,
                body,
                category,
            }),
            _ => Err(MalformedInput::Violations { violations }),
        }
    }
}

/// A field counts as missing when it is absent, `null`, `""`, `false` or `0`.
/// Other non-string values are kept as their JSON text.
fn present(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
