//! Run-level orchestration and read-only views over its result.
//!
//! # Responsibility
//! - Drive intake, resolution and aggregation over the full input set.
//! - Derive validation/unresolved reports from an assembled snapshot.
//!
//! # See also
//! - resolve

pub mod assembler;
pub mod report;
