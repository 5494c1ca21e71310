//! Project table records and the back-linked `Project` entity.

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
}

/// One row of the project table (`projects.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Structured identifier; publication tags must match it exactly.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            website: None,
            status: ProjectStatus::Active,
        }
    }
}

/// Project with computed publication and people back-links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    record: ProjectRecord,
    publication_ids: Vec<String>,
    people_ids: Vec<String>,
}

impl Project {
    pub(crate) fn new(
        record: ProjectRecord,
        publication_ids: Vec<String>,
        people_ids: Vec<String>,
    ) -> Self {
        Self {
            record,
            publication_ids,
            people_ids,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &ProjectRecord {
        &self.record
    }

    pub fn publication_ids(&self) -> &[String] {
        &self.publication_ids
    }

    /// Sorted, deduplicated roster ids of resolved authors.
    pub fn people_ids(&self) -> &[String] {
        &self.people_ids
    }
}

#[derive(Serialize)]
struct ProjectView<'a> {
    #[serde(flatten)]
    record: &'a ProjectRecord,
    publication_ids: &'a [String],
    people_ids: &'a [String],
}

impl Serialize for Project {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProjectView {
            record: &self.record,
            publication_ids: &self.publication_ids,
            people_ids: &self.people_ids,
        }
        .serialize(serializer)
    }
}
