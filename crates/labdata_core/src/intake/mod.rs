//! Parse boundary between upstream field-keyed records and the engine.
//!
//! # Responsibility
//! - Validate raw publication records into typed `PublicationEntry` values.
//! - Split author fields into ordered display names.
//!
//! # Invariants
//! - Invalid records fail here, once, as `EntryError`; nothing downstream
//!   probes raw fields.

pub mod authors;
pub mod entry;
