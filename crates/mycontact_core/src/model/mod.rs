//! Contact domain model.
//!
//! # Responsibility
//! - Define the contact aggregate and its value objects.
//! - Keep platform MIME-type discriminators in one place.
//!
//! # Invariants
//! - Sub-lists are always present, possibly empty.
//! - Value objects have no identity beyond their fields.

pub mod contact;
