//! Domain model for the assembled lab dataset.
//!
//! # Responsibility
//! - Define input records (roster, project table, raw publications).
//! - Define the resolved entities emitted in the final snapshot.
//!
//! # Invariants
//! - Entity ids are unique per kind within one snapshot.
//! - Computed back-link fields are only ever filled by the assembler.
//!
//! # See also
//! - service::assembler

pub mod collaborator;
pub mod dataset;
pub mod person;
pub mod project;
pub mod publication;
pub mod warning;
