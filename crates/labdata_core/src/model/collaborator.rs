//! External co-authors that matched no roster entry.

use serde::Serialize;

/// Unmatched author, deduplicated by normalized name.
///
/// Only the first display form seen in input order is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collaborator {
    pub display_name: String,
}
