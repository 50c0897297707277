//! Contact use-case service.
//!
//! # Responsibility
//! - List contacts as minimal `(id, display_name)` projections.
//! - Assemble a full contact from four independent sub-queries.
//!
//! # Invariants
//! - The phone query is skipped only when the contacts row reports zero
//!   phones; unknown counts still fetch phones.
//! - Email, note and address queries always run for a matched contact.
//! - Logs carry counts and durations only, never contact content.

use crate::model::contact::{Address, Contact, Email, Phone};
use crate::repo::contact_repo::{ContactRepository, RepoResult};
use log::{debug, error, info};
use std::time::Instant;

/// Contact service facade over repository implementations.
pub struct ContactService<R: ContactRepository> {
    repo: R,
}

impl<R: ContactRepository> ContactService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every contact as a minimal projection in store order.
    ///
    /// Only `id` and `display_name` are filled; sub-lists stay empty.
    pub fn list_contacts(&self) -> RepoResult<Vec<Contact>> {
        let started_at = Instant::now();
        match self.repo.list_contacts() {
            Ok(rows) => {
                info!(
                    "event=contact_list module=service status=ok count={} duration_ms={}",
                    rows.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(rows.into_iter().map(Contact::from).collect())
            }
            Err(err) => {
                error!(
                    "event=contact_list module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Gets one fully-populated contact by exact id.
    ///
    /// Returns `Ok(None)` when no contacts row matches.
    pub fn get_contact(&self, id: &str) -> RepoResult<Option<Contact>> {
        let started_at = Instant::now();
        match self.assemble_contact(id) {
            Ok(Some(contact)) => {
                info!(
                    "event=contact_get module=service status=ok found=true phones={} emails={} notes={} addresses={} duration_ms={}",
                    contact.phones.len(),
                    contact.emails.len(),
                    contact.notes.len(),
                    contact.addresses.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(contact))
            }
            Ok(None) => {
                info!(
                    "event=contact_get module=service status=ok found=false duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(None)
            }
            Err(err) => {
                error!(
                    "event=contact_get module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Counts contacts in the store.
    pub fn count_contacts(&self) -> RepoResult<u64> {
        self.repo.count_contacts()
    }

    pub fn phones(&self, id: &str) -> RepoResult<Vec<Phone>> {
        self.repo.phones(id)
    }

    pub fn emails(&self, id: &str) -> RepoResult<Vec<Email>> {
        self.repo.emails(id)
    }

    pub fn notes(&self, id: &str) -> RepoResult<Vec<String>> {
        self.repo.notes(id)
    }

    pub fn addresses(&self, id: &str) -> RepoResult<Vec<Address>> {
        self.repo.addresses(id)
    }

    fn assemble_contact(&self, id: &str) -> RepoResult<Option<Contact>> {
        let Some(row) = self.repo.find_contact(id)? else {
            return Ok(None);
        };

        let mut contact = Contact::new(row.id);
        contact.raw_id = row.raw_id;
        contact.display_name = row.display_name;
        if row.phone_hint.should_fetch_phones() {
            contact.phones = self.repo.phones(id)?;
        } else {
            debug!("event=contact_get module=service status=skip_phones reason=zero_count");
        }
        contact.emails = self.repo.emails(id)?;
        contact.notes = self.repo.notes(id)?;
        contact.addresses = self.repo.addresses(id)?;
        Ok(Some(contact))
    }
}

#[cfg(test)]
mod tests {
    use super::ContactService;
    use crate::model::contact::{Address, Email, Phone, PhoneHint};
    use crate::repo::contact_repo::{ContactRepository, ContactRow, RepoResult};
    use std::cell::RefCell;

    /// In-process repository that records which sub-queries ran.
    struct RecordingRepo {
        rows: Vec<ContactRow>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl RecordingRepo {
        fn with_hint(hint: PhoneHint) -> Self {
            Self {
                rows: vec![ContactRow {
                    id: "1".to_string(),
                    display_name: "Ann".to_string(),
                    raw_id: Some("10".to_string()),
                    phone_hint: hint,
                }],
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ContactRepository for RecordingRepo {
        fn list_contacts(&self) -> RepoResult<Vec<ContactRow>> {
            Ok(self.rows.clone())
        }

        fn find_contact(&self, id: &str) -> RepoResult<Option<ContactRow>> {
            Ok(self.rows.iter().find(|row| row.id == id).cloned())
        }

        fn count_contacts(&self) -> RepoResult<u64> {
            Ok(self.rows.len() as u64)
        }

        fn phones(&self, _id: &str) -> RepoResult<Vec<Phone>> {
            self.calls.borrow_mut().push("phones");
            Ok(vec![Phone::new("555-1000", "mobile", "")])
        }

        fn emails(&self, _id: &str) -> RepoResult<Vec<Email>> {
            self.calls.borrow_mut().push("emails");
            Ok(Vec::new())
        }

        fn notes(&self, _id: &str) -> RepoResult<Vec<String>> {
            self.calls.borrow_mut().push("notes");
            Ok(Vec::new())
        }

        fn addresses(&self, _id: &str) -> RepoResult<Vec<Address>> {
            self.calls.borrow_mut().push("addresses");
            Ok(Vec::new())
        }
    }

    #[test]
    fn absent_phone_hint_skips_only_the_phone_query() {
        let service = ContactService::new(RecordingRepo::with_hint(PhoneHint::Absent));
        let contact = service.get_contact("1").unwrap().expect("contact exists");
        assert!(contact.phones.is_empty());
        assert_eq!(
            *service.repo.calls.borrow(),
            vec!["emails", "notes", "addresses"]
        );
    }

    #[test]
    fn unknown_phone_hint_still_fetches_phones() {
        let service = ContactService::new(RecordingRepo::with_hint(PhoneHint::Unknown));
        let contact = service.get_contact("1").unwrap().expect("contact exists");
        assert_eq!(contact.phones.len(), 1);
        assert_eq!(contact.raw_id.as_deref(), Some("10"));
    }

    #[test]
    fn missing_contact_issues_no_sub_queries() {
        let service = ContactService::new(RecordingRepo::with_hint(PhoneHint::Present));
        assert!(service.get_contact("9").unwrap().is_none());
        assert!(service.repo.calls.borrow().is_empty());
    }
}
