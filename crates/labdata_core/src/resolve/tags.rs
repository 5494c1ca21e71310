//! Project tag resolution.
//!
//! Tags are structured identifiers, so lookup is exact and case-sensitive
//! with no fuzzy fallback.

use crate::model::project::ProjectRecord;
use crate::model::warning::{Warning, WarningKind};
use std::collections::BTreeSet;

/// Known project identifiers for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTable {
    ids: BTreeSet<String>,
}

impl ProjectTable {
    pub fn build(projects: &[ProjectRecord]) -> Self {
        Self {
            ids: projects.iter().map(|project| project.id.clone()).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Outcome of resolving one publication's tag field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagResolution {
    pub resolved_ids: BTreeSet<String>,
    pub dropped: BTreeSet<String>,
}

impl TagResolution {
    /// One `reference_error` per dropped tag, attributed to `context`.
    pub fn warnings(&self, context: &str) -> Vec<Warning> {
        self.dropped
            .iter()
            .map(|tag| {
                Warning::new(
                    WarningKind::ReferenceError,
                    context,
                    format!("unknown project tag `{tag}` dropped"),
                )
            })
            .collect()
    }
}

/// Splits a comma-separated tag field and resolves each tag.
///
/// Surrounding whitespace and brace groups are trimmed per tag; blank
/// segments are ignored.
pub fn resolve_tags(raw_tags: &str, table: &ProjectTable) -> TagResolution {
    let mut resolution = TagResolution::default();
    for tag in raw_tags
        .split(',')
        .map(|segment| segment.trim_matches(|c: char| c.is_whitespace() || c == '{' || c == '}'))
        .filter(|segment| !segment.is_empty())
    {
        if table.contains(tag) {
            resolution.resolved_ids.insert(tag.to_string());
        } else {
            resolution.dropped.insert(tag.to_string());
        }
    }
    resolution
}
