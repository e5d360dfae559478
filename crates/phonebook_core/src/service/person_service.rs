//! Person use-case service.
//!
//! # Responsibility
//! - Provide list/get/create/update/delete/info entry points.
//! - Validate field input before any store call.
//! - Translate store failures into service-level error kinds.
//!
//! # Invariants
//! - Create and update run the exact same validation.
//! - Invalid input never reaches the store.
//! - Update never changes a person's id.
//! - Service layer remains storage-agnostic.

use crate::model::person::{Person, PersonDraft, PersonValidationError};
use crate::repo::person_store::{PersonStore, StoreError};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for person use-cases.
#[derive(Debug)]
pub enum PersonServiceError {
    /// Field input broke one or more person rules.
    Validation(PersonValidationError),
    /// Well-formed id with no matching person.
    NotFound(String),
    /// Id does not have the store's identifier shape.
    InvalidId(String),
    /// Any other store failure.
    Store(StoreError),
}

impl Display for PersonServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "person not found: {id}"),
            Self::InvalidId(id) => write!(f, "malformatted id: `{id}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersonServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::InvalidId(_) => None,
        }
    }
}

impl From<PersonValidationError> for PersonServiceError {
    fn from(value: PersonValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for PersonServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::MalformedId(id) => Self::InvalidId(id),
            other => Self::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, PersonServiceError>;

/// Snapshot returned by the info use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhonebookInfo {
    pub person_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl PhonebookInfo {
    /// Renders the short HTML summary served on `/info`.
    pub fn to_html(&self) -> String {
        format!(
            "<p>Phonebook has info for {} persons</p><p>{}</p>",
            self.person_count,
            self.generated_at.format("%a %b %d %Y %H:%M:%S GMT%z")
        )
    }
}

/// Person service facade over store implementations.
pub struct PersonService<S: PersonStore> {
    store: S,
}

impl<S: PersonStore> PersonService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Gives the store back, e.g. to close it on shutdown.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Lists every person in store order.
    pub fn list(&self) -> ServiceResult<Vec<Person>> {
        Ok(self.store.find_all()?)
    }

    /// Gets one person by id.
    pub fn get(&self, id: &str) -> ServiceResult<Person> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| PersonServiceError::NotFound(id.to_string()))
    }

    /// Validates and persists a new person; the store assigns its id.
    pub fn create(
        &self,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> ServiceResult<Person> {
        let draft = PersonDraft::new(name, number);
        if let Err(err) = draft.validate() {
            warn!(
                "event=person_create module=service status=rejected violations={}",
                err.violations().len()
            );
            return Err(err.into());
        }

        let person = self.store.insert(&draft)?;
        info!(
            "event=person_create module=service status=ok id={}",
            person.id
        );
        Ok(person)
    }

    /// Replaces name and number of an existing person.
    ///
    /// Validation runs before the id is even looked at, matching `create`.
    pub fn update(
        &self,
        id: &str,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> ServiceResult<Person> {
        let draft = PersonDraft::new(name, number);
        if let Err(err) = draft.validate() {
            warn!(
                "event=person_update module=service status=rejected violations={}",
                err.violations().len()
            );
            return Err(err.into());
        }

        let person = self
            .store
            .replace_by_id(id, &draft)?
            .ok_or_else(|| PersonServiceError::NotFound(id.to_string()))?;
        info!(
            "event=person_update module=service status=ok id={}",
            person.id
        );
        Ok(person)
    }

    /// Deletes a person by id.
    ///
    /// Idempotent for well-formed ids: removing an absent record succeeds.
    /// A malformed id still fails with `InvalidId`.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let removed = self.store.delete_by_id(id)?;
        info!("event=person_delete module=service status=ok removed={removed}");
        Ok(())
    }

    /// Returns the current person count with a generation timestamp.
    pub fn info(&self) -> ServiceResult<PhonebookInfo> {
        Ok(PhonebookInfo {
            person_count: self.store.count()?,
            generated_at: Utc::now(),
        })
    }
}
