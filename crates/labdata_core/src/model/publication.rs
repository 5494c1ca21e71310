//! Raw bibliography records and resolved publications.
//!
//! # Responsibility
//! - Carry field-keyed records produced by the upstream bibliography adapter.
//! - Define the resolved `Publication` shape emitted in the snapshot.
//!
//! # Invariants
//! - `AuthorRef.person_id`, when set, names a roster entry.
//! - `project_ids` only contains identifiers from the project table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Scalar value of one raw record field.
///
/// Bibliography adapters disagree on whether `year` is text or a number, so
/// both are accepted and interpreted at the intake boundary. Hand-kept files
/// leave optional fields empty (`note:`, `doi: ~`); those decode as `Null`
/// and read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl RawValue {
    /// Text rendering; `Null` renders empty.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Null => String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Field-keyed publication record, untyped until intake validation.
///
/// Field names are matched case-insensitively (`ID`, `bib_id`, `Author`...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPublication {
    fields: BTreeMap<String, RawValue>,
}

impl RawPublication {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }

    /// Text of a field with surrounding whitespace removed; blank or null
    /// counts as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|value| !value.is_null())
            .map(RawValue::to_text)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// One author position inside a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRef {
    pub display_name: String,
    pub person_id: Option<String>,
}

impl AuthorRef {
    pub fn is_resolved(&self) -> bool {
        self.person_id.is_some()
    }
}

/// Fully resolved publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Publication {
    pub bib_id: String,
    pub title: String,
    pub authors: Vec<AuthorRef>,
    pub year: i32,
    pub venue: String,
    pub category: String,
    pub entry_type: String,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub note: Option<String>,
    pub pdf_url: Option<String>,
    pub doi_url: Option<String>,
    pub arxiv_url: Option<String>,
    pub url: Option<String>,
    pub video_url: Option<String>,
    pub project_ids: BTreeSet<String>,
}

impl Publication {
    /// Roster ids of resolved authors, in author order, without repeats.
    pub fn person_ids(&self) -> impl Iterator<Item = &str> {
        let mut seen = BTreeSet::new();
        self.authors
            .iter()
            .filter_map(|author| author.person_id.as_deref())
            .filter(move |id| seen.insert(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::{RawPublication, RawValue};

    #[test]
    fn raw_fields_are_case_insensitive_and_blank_is_absent() {
        let raw = RawPublication::new()
            .with("ID", "smith2020")
            .with("Title", "  A Title ")
            .with("note", "   ");
        assert_eq!(raw.text("id").as_deref(), Some("smith2020"));
        assert_eq!(raw.text("title").as_deref(), Some("A Title"));
        assert_eq!(raw.text("note"), None);
        assert_eq!(raw.text("venue"), None);
    }

    #[test]
    fn raw_values_accept_text_and_numbers() {
        let raw: RawPublication =
            serde_yaml::from_str("bib_id: x\nyear: 2021\ntitle: T\n").expect("decode raw");
        assert_eq!(raw.get("year"), Some(&RawValue::Integer(2021)));
        assert_eq!(raw.text("year").as_deref(), Some("2021"));
    }

    #[test]
    fn empty_and_boolean_fields_decode() {
        let raw: RawPublication =
            serde_yaml::from_str("bib_id: x\nnote:\ndoi: ~\nselected: true\n")
                .expect("decode raw");
        assert_eq!(raw.get("note"), Some(&RawValue::Null));
        assert_eq!(raw.text("note"), None);
        assert_eq!(raw.text("doi"), None);
        assert_eq!(raw.get("selected"), Some(&RawValue::Bool(true)));
        assert_eq!(raw.text("selected").as_deref(), Some("true"));
    }
}
