//! Resolution and cross-reference engine.
//!
//! # Responsibility
//! - Canonicalize free-text names (`normalize`).
//! - Resolve author names against the roster (`matcher`).
//! - Resolve project tags against the project table (`tags`).
//! - Aggregate publication back-links on people and projects (`backlinks`).
//!
//! # Invariants
//! - Every function here is pure over its explicit inputs; indexes are built
//!   once per run and passed in, never held as global state.
//! - Output order never depends on hash-map iteration order.

pub mod backlinks;
pub mod matcher;
pub mod normalize;
pub mod tags;
