//! Contact aggregate and value objects.
//!
//! # Responsibility
//! - Represent one contact with its phones, emails, notes and postal addresses.
//! - Interpret the contacts row phone-count column.
//!
//! # Invariants
//! - `Contact::id` equals the id used to fetch every sub-list.
//! - String fields never carry SQL `NULL`; missing values are empty strings.

use serde::{Deserialize, Serialize};

/// Stable contact identifier as exposed by the contacts store.
pub type ContactId = String;

/// Row kinds stored in the generic `data` collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Phone,
    Email,
    Note,
    PostalAddress,
}

impl DataKind {
    /// MIME-type discriminator stored in `data.mimetype`.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Phone => "vnd.android.cursor.item/phone_v2",
            Self::Email => "vnd.android.cursor.item/email_v2",
            Self::Note => "vnd.android.cursor.item/note",
            Self::PostalAddress => "vnd.android.cursor.item/postal-address_v2",
        }
    }
}

/// Phone number entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub number: String,
    /// Platform type code (`mobile`, `2`, ...), kept verbatim.
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

impl Phone {
    pub fn new(
        number: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            kind: kind.into(),
            label: label.into(),
        }
    }
}

/// Email address entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub address: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

impl Email {
    pub fn new(
        address: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            kind: kind.into(),
            label: label.into(),
        }
    }
}

/// Structured postal address entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub po_box: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

/// Contact aggregate returned by list and detail reads.
///
/// List reads fill only `id` and `display_name`; detail reads fill all
/// fields. Every read builds a fresh value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    /// Raw contact that supplies the display name, when known.
    pub raw_id: Option<String>,
    pub display_name: String,
    pub phones: Vec<Phone>,
    pub emails: Vec<Email>,
    pub notes: Vec<String>,
    pub addresses: Vec<Address>,
}

impl Contact {
    /// Creates an empty contact carrying only its id.
    pub fn new(id: impl Into<ContactId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Creates the minimal list projection.
    pub fn summary(id: impl Into<ContactId>, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::new(id)
        }
    }
}

/// Interpretation of the contacts row `has_phone_number` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneHint {
    /// Count is a positive number.
    Present,
    /// Count is zero (or negative).
    Absent,
    /// Count is missing or unparsable; phones must still be fetched.
    Unknown,
}

impl PhoneHint {
    /// Builds a hint from an integer count.
    pub fn from_count(count: i64) -> Self {
        if count > 0 {
            Self::Present
        } else {
            Self::Absent
        }
    }

    /// Builds a hint from a textual count, tolerating surrounding whitespace.
    pub fn from_text(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(count) => Self::from_count(count),
            Err(_) => Self::Unknown,
        }
    }

    /// Returns whether the phone collection should be queried.
    pub fn should_fetch_phones(self) -> bool {
        self != Self::Absent
    }
}
