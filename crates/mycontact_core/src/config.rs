//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the contacts store path, note policy and log level.
//! - Reject malformed values with readable messages.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.

use crate::logging::default_log_level;
use crate::repo::contact_repo::{NotePolicy, RepoOptions};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "MYCONTACT_DB_PATH";
pub const NOTE_POLICY_ENV: &str = "MYCONTACT_NOTE_POLICY";
pub const LOG_LEVEL_ENV: &str = "MYCONTACT_LOG_LEVEL";
const DEFAULT_DB_FILE_NAME: &str = "mycontact_contacts.sqlite3";

/// Configuration error for invalid environment values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNotePolicy(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNotePolicy(value) => write!(
                f,
                "unsupported {NOTE_POLICY_ENV} `{value}`; expected first_row|all_non_empty"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactsConfig {
    pub db_path: PathBuf,
    pub note_policy: NotePolicy,
    pub log_level: String,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            note_policy: NotePolicy::default(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl ContactsConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(policy) = value(NOTE_POLICY_ENV) {
            config.note_policy =
                NotePolicy::parse(&policy).ok_or(ConfigError::InvalidNotePolicy(policy))?;
        }
        if let Some(level) = value(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        Ok(config)
    }

    pub fn repo_options(&self) -> RepoOptions {
        RepoOptions {
            note_policy: self.note_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ContactsConfig, DB_PATH_ENV, NOTE_POLICY_ENV};
    use crate::repo::contact_repo::NotePolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ContactsConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ContactsConfig::default());
        assert_eq!(config.note_policy, NotePolicy::FirstRow);
    }

    #[test]
    fn values_override_defaults_and_blanks_are_ignored() {
        let config = ContactsConfig::from_lookup(lookup(&[
            (DB_PATH_ENV, " /data/contacts.db "),
            (NOTE_POLICY_ENV, "all_non_empty"),
            ("MYCONTACT_LOG_LEVEL", "   "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/contacts.db"));
        assert_eq!(config.repo_options().note_policy, NotePolicy::AllNonEmpty);
        assert_eq!(config.log_level, ContactsConfig::default().log_level);
    }

    #[test]
    fn invalid_note_policy_is_rejected() {
        let err = ContactsConfig::from_lookup(lookup(&[(NOTE_POLICY_ENV, "random")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidNotePolicy("random".to_string()));
        assert!(err.to_string().contains("first_row"));
    }
}
