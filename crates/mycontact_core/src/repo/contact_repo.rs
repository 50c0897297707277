//! Contact repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide read-only point queries over the `contacts` and `data` collections.
//! - Map provider rows into contact value objects.
//!
//! # Invariants
//! - Every statement and row cursor is scoped to one call and released on
//!   every exit path.
//! - Contact lookup is a single-key query, never a scan of all contacts.
//! - Ids compare as exact text even when the store declares them INTEGER,
//!   so `"01"` or `"1.0"` never match contact `1`.
//! - Unmatched ids yield `None` or empty `Vec`s, never errors.

use crate::db::DbError;
use crate::model::contact::{Address, Contact, DataKind, Email, Phone, PhoneHint};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACT_SELECT_SQL: &str = "SELECT
    _id,
    display_name,
    name_raw_contact_id,
    has_phone_number
FROM contacts";

const DATA_SELECT_SQL: &str = "SELECT
    data1,
    data2,
    data3,
    data4,
    data5,
    data7,
    data8,
    data9,
    data10
FROM data
WHERE contact_id = ?1
  AND CAST(contact_id AS TEXT) = ?1
  AND mimetype = ?2
ORDER BY _id ASC;";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "contacts",
        &["_id", "display_name", "name_raw_contact_id", "has_phone_number"],
    ),
    (
        "data",
        &[
            "_id",
            "contact_id",
            "mimetype",
            "data1",
            "data2",
            "data3",
            "data4",
            "data5",
            "data7",
            "data8",
            "data9",
            "data10",
        ],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for contacts store queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    /// The store lacks a collection, so it cannot serve contact reads.
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid contacts store data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "contacts store unavailable: missing table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "contacts store unavailable: missing column `{table}.{column}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Which note rows contribute to `Contact::notes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotePolicy {
    /// Only the first matching row, and only when its text is non-empty.
    #[default]
    FirstRow,
    /// Every matching row with non-empty text, in row order.
    AllNonEmpty,
}

impl NotePolicy {
    /// Parses a config value (`first_row` | `all_non_empty`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first_row" | "first" => Some(Self::FirstRow),
            "all_non_empty" | "all" => Some(Self::AllNonEmpty),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstRow => "first_row",
            Self::AllNonEmpty => "all_non_empty",
        }
    }
}

/// Behavior knobs for repository reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoOptions {
    pub note_policy: NotePolicy,
}

/// One row of the `contacts` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub id: String,
    pub display_name: String,
    pub raw_id: Option<String>,
    pub phone_hint: PhoneHint,
}

/// Repository interface for contact reads.
pub trait ContactRepository {
    /// Lists every contacts row in natural store order.
    fn list_contacts(&self) -> RepoResult<Vec<ContactRow>>;
    /// Looks up one contacts row by exact id.
    fn find_contact(&self, id: &str) -> RepoResult<Option<ContactRow>>;
    /// Counts contacts rows.
    fn count_contacts(&self) -> RepoResult<u64>;
    fn phones(&self, id: &str) -> RepoResult<Vec<Phone>>;
    fn emails(&self, id: &str) -> RepoResult<Vec<Email>>;
    /// Returns note texts according to the configured `NotePolicy`.
    fn notes(&self, id: &str) -> RepoResult<Vec<String>>;
    fn addresses(&self, id: &str) -> RepoResult<Vec<Address>>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
    options: RepoOptions,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository after checking the store layout.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the store does
    ///   not expose the provider collections.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::try_with_options(conn, RepoOptions::default())
    }

    /// Same as `try_new` with explicit behavior options.
    pub fn try_with_options(conn: &'conn Connection, options: RepoOptions) -> RepoResult<Self> {
        ensure_contacts_store_ready(conn)?;
        Ok(Self { conn, options })
    }

    pub fn options(&self) -> RepoOptions {
        self.options
    }

    fn query_data<T>(
        &self,
        id: &str,
        kind: DataKind,
        mut map: impl FnMut(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(DATA_SELECT_SQL)?;
        let mut rows = stmt.query(params![id, kind.mime_type()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(map(row)?);
        }
        Ok(items)
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_contacts(&self) -> RepoResult<Vec<ContactRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn find_contact(&self, id: &str) -> RepoResult<Option<ContactRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTACT_SELECT_SQL}
             WHERE _id = ?1
               AND CAST(_id AS TEXT) = ?1
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }
        Ok(None)
    }

    fn count_contacts(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative contacts count `{count}`")))
    }

    fn phones(&self, id: &str) -> RepoResult<Vec<Phone>> {
        self.query_data(id, DataKind::Phone, |row| {
            Ok(Phone {
                number: text_or_empty(row, "data1")?,
                kind: text_or_empty(row, "data2")?,
                label: text_or_empty(row, "data3")?,
            })
        })
    }

    fn emails(&self, id: &str) -> RepoResult<Vec<Email>> {
        self.query_data(id, DataKind::Email, |row| {
            Ok(Email {
                address: text_or_empty(row, "data1")?,
                kind: text_or_empty(row, "data2")?,
                label: text_or_empty(row, "data3")?,
            })
        })
    }

    fn notes(&self, id: &str) -> RepoResult<Vec<String>> {
        let texts = match self.options.note_policy {
            NotePolicy::FirstRow => {
                let mut stmt = self.conn.prepare(DATA_SELECT_SQL)?;
                let mut rows = stmt.query(params![id, DataKind::Note.mime_type()])?;
                let mut first = Vec::new();
                if let Some(row) = rows.next()? {
                    first.push(text_or_empty(row, "data1")?);
                }
                first
            }
            NotePolicy::AllNonEmpty => {
                self.query_data(id, DataKind::Note, |row| text_or_empty(row, "data1"))?
            }
        };
        Ok(texts.into_iter().filter(|note| !note.is_empty()).collect())
    }

    fn addresses(&self, id: &str) -> RepoResult<Vec<Address>> {
        self.query_data(id, DataKind::PostalAddress, |row| {
            Ok(Address {
                po_box: text_or_empty(row, "data5")?,
                street: text_or_empty(row, "data4")?,
                city: text_or_empty(row, "data7")?,
                region: text_or_empty(row, "data8")?,
                postal_code: text_or_empty(row, "data9")?,
                country: text_or_empty(row, "data10")?,
                kind: text_or_empty(row, "data2")?,
                label: text_or_empty(row, "data3")?,
            })
        })
    }
}

/// Builds the minimal list projection for one contacts row.
impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact::summary(row.id, row.display_name)
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<ContactRow> {
    let id = match row.get::<_, Value>("_id")? {
        Value::Text(text) => text,
        Value::Integer(number) => number.to_string(),
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid contact id {other:?} in contacts._id"
            )));
        }
    };

    let raw_id = match row.get::<_, Value>("name_raw_contact_id")? {
        Value::Null => None,
        Value::Text(text) => Some(text),
        Value::Integer(number) => Some(number.to_string()),
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid raw contact id {other:?} in contacts.name_raw_contact_id"
            )));
        }
    };

    let phone_hint = match row.get::<_, Value>("has_phone_number")? {
        Value::Integer(count) => PhoneHint::from_count(count),
        Value::Text(text) => PhoneHint::from_text(&text),
        _ => PhoneHint::Unknown,
    };

    Ok(ContactRow {
        id,
        display_name: text_or_empty(row, "display_name")?,
        raw_id,
        phone_hint,
    })
}

fn text_or_empty(row: &Row<'_>, column: &str) -> RepoResult<String> {
    let value = match row.get::<_, Value>(column)? {
        Value::Null => String::new(),
        Value::Text(text) => text,
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Blob(_) => {
            return Err(RepoError::InvalidData(format!(
                "unexpected blob in column `{column}`"
            )));
        }
    };
    Ok(value)
}

fn ensure_contacts_store_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::NotePolicy;

    #[test]
    fn note_policy_parses_config_values() {
        assert_eq!(NotePolicy::parse("first_row"), Some(NotePolicy::FirstRow));
        assert_eq!(
            NotePolicy::parse(" ALL_NON_EMPTY "),
            Some(NotePolicy::AllNonEmpty)
        );
        assert_eq!(NotePolicy::parse("every"), None);
        assert_eq!(NotePolicy::default(), NotePolicy::FirstRow);
    }
}
