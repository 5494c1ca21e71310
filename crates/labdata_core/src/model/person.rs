//! Roster records and the back-linked `Person` entity.
//!
//! # Invariants
//! - `publication_count` is never stored; it is always `publication_ids.len()`.
//! - `publication_ids` follows the back-link sort contract.

use serde::{Deserialize, Serialize, Serializer};

/// Membership state of a roster entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonStatus {
    #[default]
    Current,
    Alumni,
}

/// One roster entry as maintained by hand (`people.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    /// Alternate renderings used as matching keys.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: PersonStatus,
    #[serde(default)]
    pub start_year: Option<i32>,
    #[serde(default)]
    pub end_year: Option<i32>,
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub current_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
}

impl PersonRecord {
    /// Creates a current member with no aliases or optional metadata.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            role: None,
            status: PersonStatus::Current,
            start_year: None,
            end_year: None,
            thesis_title: None,
            current_position: None,
            website: None,
            photo: None,
            email: None,
            degree: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Canonical name followed by every alias, in declaration order.
    pub fn match_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Roster entry with computed publication back-links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    record: PersonRecord,
    publication_ids: Vec<String>,
}

impl Person {
    pub(crate) fn new(record: PersonRecord, publication_ids: Vec<String>) -> Self {
        Self {
            record,
            publication_ids,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &PersonRecord {
        &self.record
    }

    pub fn publication_ids(&self) -> &[String] {
        &self.publication_ids
    }

    pub fn publication_count(&self) -> usize {
        self.publication_ids.len()
    }
}

#[derive(Serialize)]
struct PersonView<'a> {
    #[serde(flatten)]
    record: &'a PersonRecord,
    publication_ids: &'a [String],
    publication_count: usize,
}

impl Serialize for Person {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PersonView {
            record: &self.record,
            publication_ids: &self.publication_ids,
            publication_count: self.publication_count(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonRecord, PersonStatus};

    #[test]
    fn record_defaults_status_and_aliases() {
        let record: PersonRecord =
            serde_yaml::from_str("id: jdoe\nname: Jane Doe\n").expect("minimal record");
        assert_eq!(record.status, PersonStatus::Current);
        assert!(record.aliases.is_empty());
        assert_eq!(record.role, None);
    }

    #[test]
    fn match_names_lists_name_before_aliases() {
        let record = PersonRecord::new("jdoe", "Jane Doe").with_aliases(["J. Doe", "Jane Q. Doe"]);
        let names: Vec<&str> = record.match_names().collect();
        assert_eq!(names, vec!["Jane Doe", "J. Doe", "Jane Q. Doe"]);
    }

    #[test]
    fn publication_count_tracks_ids() {
        let person = Person::new(
            PersonRecord::new("jdoe", "Jane Doe"),
            vec!["a2020".to_string(), "b2019".to_string()],
        );
        assert_eq!(person.publication_count(), 2);

        let yaml = serde_yaml::to_string(&person).expect("serialize person");
        assert!(yaml.contains("publication_count: 2"));
        assert!(yaml.contains("status: current"));
    }
}
