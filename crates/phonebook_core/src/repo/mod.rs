//! Store boundary for person records.
//!
//! # Responsibility
//! - Define the storage contract the service depends on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Identifier shape is owned by the store; malformed ids surface as
//!   `StoreError::MalformedId`, never as "not found".

pub mod person_store;
