//! Core read layer for the on-device contacts store.
//! This crate owns the contact model, store bootstrap and query mapping.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, ContactsConfig};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget, LoggingError,
};
pub use model::contact::{Address, Contact, ContactId, DataKind, Email, Phone, PhoneHint};
pub use repo::contact_repo::{
    ContactRepository, ContactRow, NotePolicy, RepoError, RepoOptions, RepoResult,
    SqliteContactRepository,
};
pub use service::contact_service::ContactService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
