//! Person domain model and field validation.
//!
//! # Responsibility
//! - Define the stored `Person` record and the unsaved `PersonDraft`.
//! - Provide pure validation shared by create and update paths.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - `name` has at least 3 characters.
//! - `number` has at least 8 characters and starts with 2-3 digits, a dash
//!   and at least one more digit.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned identifier of a person.
pub type PersonId = Uuid;

pub const NAME_MIN_CHARS: usize = 3;
pub const NUMBER_MIN_CHARS: usize = 8;

const NUMBER_FORMAT_MESSAGE: &str = "The number should be at least 8 characters long, divided into two groups (first 2-3 numbers) separated with a dash.";

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2,3}-[0-9]+").expect("valid number regex"));

/// Persisted phonebook record.
///
/// Serializes as `{id, name, number}`; no storage-internal fields leak out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub number: String,
}

/// Field values for a person that has not been persisted yet.
///
/// Used for both inserts and full replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub number: String,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Checks both field rules and reports every failing field.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_person(&self.name, &self.number)
    }

    /// Attaches a store-assigned id.
    pub fn into_person(self, id: PersonId) -> Person {
        Person {
            id,
            name: self.name,
            number: self.number,
        }
    }
}

/// Field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    Name,
    Number,
}

impl PersonField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Number => "number",
        }
    }
}

/// One failing rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: PersonField,
    pub message: String,
}

/// Validation failure for a person draft.
///
/// Always carries at least one violation, in field order (`name`, `number`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonValidationError {
    violations: Vec<FieldViolation>,
}

impl PersonValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn has_field(&self, field: PersonField) -> bool {
        self.violations.iter().any(|item| item.field == field)
    }
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Person validation failed: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", violation.field.as_str(), violation.message)?;
        }
        Ok(())
    }
}

impl Error for PersonValidationError {}

/// Validates the name rule alone.
pub fn validate_name(name: &str) -> Option<FieldViolation> {
    let length = name.chars().count();
    if length >= NAME_MIN_CHARS {
        return None;
    }
    let message = if name.is_empty() {
        "Path `name` is required.".to_string()
    } else {
        format!(
            "Path `name` is shorter than the minimum allowed length ({NAME_MIN_CHARS}), got {length}."
        )
    };
    Some(FieldViolation {
        field: PersonField::Name,
        message,
    })
}

/// Validates the number rule alone.
///
/// The format check wins over the length check so a malformed number always
/// reports the format message.
pub fn validate_number(number: &str) -> Option<FieldViolation> {
    let message = if !NUMBER_RE.is_match(number) {
        NUMBER_FORMAT_MESSAGE.to_string()
    } else if number.chars().count() < NUMBER_MIN_CHARS {
        format!(
            "Path `number` is shorter than the minimum allowed length ({NUMBER_MIN_CHARS}), got {}.",
            number.chars().count()
        )
    } else {
        return None;
    };
    Some(FieldViolation {
        field: PersonField::Number,
        message,
    })
}

/// Runs both field rules, identically for create and update.
pub fn validate_person(name: &str, number: &str) -> Result<(), PersonValidationError> {
    let violations = [validate_name(name), validate_number(number)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PersonValidationError { violations })
    }
}
