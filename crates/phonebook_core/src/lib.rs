//! Core domain logic for the phonebook service.
//! This crate is the single source of truth for person invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::person::{
    validate_person, FieldViolation, Person, PersonDraft, PersonField, PersonId,
    PersonValidationError,
};
pub use repo::person_store::{
    parse_person_id, PersonStore, SqlitePersonStore, StoreError, StoreResult,
};
pub use service::person_service::{
    PersonService, PersonServiceError, PhonebookInfo, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
