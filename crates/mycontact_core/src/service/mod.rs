//! Service layer for contact use-cases.
//!
//! # Responsibility
//! - Assemble contact aggregates from repository point queries.
//! - Emit metadata-only diagnostics for each use-case.

pub mod contact_service;
