//! FFI contact API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level contact reads to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The store path and note policy come from `ContactsConfig` once per process.
//! - The store is opened read-only; a missing store is an error, never created.

use log::warn;
use mycontact_core::db::open_db_read_only;
use mycontact_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Contact, ContactService, ContactsConfig, SqliteContactRepository,
};
use std::sync::OnceLock;

static CONFIG: OnceLock<ContactsConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Phone entry as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactPhoneItem {
    pub number: String,
    pub kind: String,
    pub label: String,
}

/// Email entry as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmailItem {
    pub address: String,
    pub kind: String,
    pub label: String,
}

/// Postal address entry as seen by Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAddressItem {
    pub po_box: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    pub kind: String,
    pub label: String,
}

/// Minimal list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListItem {
    pub contact_id: String,
    pub display_name: String,
}

/// Full contact detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetail {
    pub contact_id: String,
    pub raw_contact_id: Option<String>,
    pub display_name: String,
    pub phones: Vec<ContactPhoneItem>,
    pub emails: Vec<ContactEmailItem>,
    pub notes: Vec<String>,
    pub addresses: Vec<ContactAddressItem>,
}

/// Response envelope for `contacts_list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    /// Contacts in store order; empty on failure.
    pub items: Vec<ContactListItem>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

/// Response envelope for `contact_get`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetailResponse {
    /// Whether the read succeeded (a missing contact is still `ok`).
    pub ok: bool,
    /// `None` when the contact does not exist or the read failed.
    pub contact: Option<ContactDetail>,
    pub message: String,
}

/// Lists all contacts as `(id, display_name)` entries.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    list_contacts_with(resolve_config())
}

/// Gets one fully-populated contact by id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Blank ids are rejected without touching the store.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_get(contact_id: String) -> ContactDetailResponse {
    get_contact_with(resolve_config(), contact_id.as_str())
}

fn list_contacts_with(config: &ContactsConfig) -> ContactListResponse {
    match with_contact_service(config, |service| service.list_contacts()) {
        Ok(contacts) => {
            let items = contacts
                .into_iter()
                .map(|contact| ContactListItem {
                    contact_id: contact.id,
                    display_name: contact.display_name,
                })
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("Found {} contact(s).", items.len())
            };
            ContactListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => ContactListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("contacts_list failed: {err}"),
        },
    }
}

fn get_contact_with(config: &ContactsConfig, contact_id: &str) -> ContactDetailResponse {
    if contact_id.trim().is_empty() {
        return ContactDetailResponse {
            ok: false,
            contact: None,
            message: "contact_get failed: contact_id cannot be empty".to_string(),
        };
    }

    match with_contact_service(config, |service| service.get_contact(contact_id)) {
        Ok(Some(contact)) => ContactDetailResponse {
            ok: true,
            contact: Some(to_contact_detail(contact)),
            message: "Contact found.".to_string(),
        },
        Ok(None) => ContactDetailResponse {
            ok: true,
            contact: None,
            message: "Contact not found.".to_string(),
        },
        Err(err) => ContactDetailResponse {
            ok: false,
            contact: None,
            message: format!("contact_get failed: {err}"),
        },
    }
}

fn resolve_config() -> &'static ContactsConfig {
    CONFIG.get_or_init(|| {
        ContactsConfig::from_env().unwrap_or_else(|err| {
            warn!("event=config_load module=ffi status=fallback error={err}");
            ContactsConfig::default()
        })
    })
}

fn with_contact_service<T>(
    config: &ContactsConfig,
    f: impl FnOnce(
        &ContactService<SqliteContactRepository<'_>>,
    ) -> mycontact_core::RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db_read_only(&config.db_path)
        .map_err(|err| format!("contacts store unavailable: {err}"))?;
    let repo = SqliteContactRepository::try_with_options(&conn, config.repo_options())
        .map_err(|err| format!("contacts repo init failed: {err}"))?;
    let service = ContactService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn to_contact_detail(contact: Contact) -> ContactDetail {
    ContactDetail {
        contact_id: contact.id,
        raw_contact_id: contact.raw_id,
        display_name: contact.display_name,
        phones: contact
            .phones
            .into_iter()
            .map(|phone| ContactPhoneItem {
                number: phone.number,
                kind: phone.kind,
                label: phone.label,
            })
            .collect(),
        emails: contact
            .emails
            .into_iter()
            .map(|email| ContactEmailItem {
                address: email.address,
                kind: email.kind,
                label: email.label,
            })
            .collect(),
        notes: contact.notes,
        addresses: contact
            .addresses
            .into_iter()
            .map(|address| ContactAddressItem {
                po_box: address.po_box,
                street: address.street,
                city: address.city,
                region: address.region,
                postal_code: address.postal_code,
                country: address.country,
                kind: address.kind,
                label: address.label,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        contact_get, core_version, get_contact_with, init_logging, list_contacts_with, ping,
    };
    use mycontact_core::db::open_db;
    use mycontact_core::{ContactsConfig, DataKind};

    fn config_at(dir: &tempfile::TempDir, file_name: &str) -> ContactsConfig {
        ContactsConfig {
            db_path: dir.path().join(file_name),
            ..ContactsConfig::default()
        }
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn contact_get_rejects_blank_id() {
        let response = contact_get("   ".to_string());
        assert!(!response.ok);
        assert!(response.contact.is_none());
    }

    #[test]
    fn missing_store_is_reported_and_not_created() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_at(&dir, "absent.sqlite3");

        let listed = list_contacts_with(&config);
        assert!(!listed.ok);
        assert!(listed.message.contains("unavailable"), "{}", listed.message);

        let detail = get_contact_with(&config, "1");
        assert!(!detail.ok);
        assert!(detail.contact.is_none());
        assert!(!config.db_path.exists());
    }

    #[test]
    fn reads_leave_an_unversioned_store_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_at(&dir, "mirror.sqlite3");
        {
            let conn = open_db(&config.db_path).expect("create store");
            conn.execute_batch(
                "DROP INDEX idx_data_contact_mimetype;
                 PRAGMA user_version = 0;",
            )
            .expect("reset store version");
        }

        assert!(list_contacts_with(&config).ok);

        let conn = rusqlite::Connection::open(&config.db_path).expect("reopen store");
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .expect("read user_version");
        assert_eq!(version, 0);
        let indexes: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_data_contact_mimetype';",
                [],
                |row| row.get(0),
            )
            .expect("count indexes");
        assert_eq!(indexes, 0);
    }

    #[test]
    fn contact_get_reads_seeded_contact_and_reports_missing_ones() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = config_at(&dir, "contacts.sqlite3");
        {
            let conn = open_db(&config.db_path).expect("create store");
            conn.execute(
                "INSERT INTO contacts (_id, display_name, has_phone_number)
                 VALUES ('42', 'Ann', 1);",
                [],
            )
            .expect("seed contact");
            conn.execute(
                "INSERT INTO data (contact_id, mimetype, data1, data2)
                 VALUES ('42', ?1, '555-1000', 'mobile');",
                [DataKind::Phone.mime_type()],
            )
            .expect("seed phone");
        }

        let found = get_contact_with(&config, "42");
        assert!(found.ok, "{}", found.message);
        let detail = found.contact.expect("seeded contact should be returned");
        assert_eq!(detail.contact_id, "42");
        assert_eq!(detail.phones.len(), 1);
        assert_eq!(detail.phones[0].number, "555-1000");
        assert!(detail.emails.is_empty());

        let listed = list_contacts_with(&config);
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].contact_id, "42");

        let missing = get_contact_with(&config, "7");
        assert!(missing.ok);
        assert!(missing.contact.is_none());
    }
}
