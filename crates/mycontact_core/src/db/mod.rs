//! Contacts store access: connection opening and the provider-shaped schema.
//!
//! # Responsibility
//! - Hand out configured `rusqlite` connections over a contacts store.
//! - Own the `contacts` + `data` layout used for local mirrors and fixtures.
//!
//! # Invariants
//! - A writable open leaves the store at `migrations::latest_version()`.
//! - A read-only open never changes the store, including its `user_version`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_db_read_only};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or prepare a contacts store.
#[derive(Debug)]
pub enum DbError {
    /// SQLite refused the open, a pragma or a schema statement.
    Sqlite(rusqlite::Error),
    /// The store was written by a newer build whose layout this one cannot read.
    StoreTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "contacts store error: {err}"),
            Self::StoreTooNew { found, supported } => write!(
                f,
                "contacts store layout v{found} is newer than this build reads (v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::StoreTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
