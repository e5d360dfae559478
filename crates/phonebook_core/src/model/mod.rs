//! Phonebook domain model.
//!
//! # Responsibility
//! - Define the canonical person record exposed to callers.
//! - Own the field rules every persisted person must satisfy.
//!
//! # Invariants
//! - Every person is identified by a store-assigned `PersonId`.
//! - Field rules run before persistence, never after.

pub mod person;
