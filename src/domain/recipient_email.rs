use std::convert::TryFrom;

use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::errors::Violation;

lazy_static! {
    // `\s` leaves out U+FEFF, which browsers count as whitespace
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$")
            .expect("the email pattern is a valid regex");
}

/// An address shaped like `local@domain.tld`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientEmail(String);

impl AsRef<str> for RecipientEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipientEmail {
    type Error = Violation;

    fn try_from(email: String) -> Result<Self, Self::Error> {
        if EMAIL_PATTERN.is_match(&email) {
            Ok(RecipientEmail(email))
        } else {
            Err(Violation::InvalidEmail)
        }
    }
}
