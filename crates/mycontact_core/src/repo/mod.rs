//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define read-only data access contracts over the contacts store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs never write to the store.
//! - Absence is structural (`None`, empty `Vec`), not an error.

pub mod contact_repo;
