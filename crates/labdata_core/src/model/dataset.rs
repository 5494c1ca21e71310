//! Immutable output snapshot of one assembly run.

use crate::model::collaborator::Collaborator;
use crate::model::person::Person;
use crate::model::project::Project;
use crate::model::publication::Publication;
use crate::model::warning::{Warning, WarningKind};
use serde::Serialize;

/// Final dataset handed to exporters and reports.
///
/// Field names and nesting form the downstream compatibility contract:
/// `publications`, `people`, `projects`, `collaborators`, `warnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledData {
    publications: Vec<Publication>,
    people: Vec<Person>,
    projects: Vec<Project>,
    collaborators: Vec<Collaborator>,
    warnings: Vec<Warning>,
}

impl AssembledData {
    pub(crate) fn new(
        publications: Vec<Publication>,
        people: Vec<Person>,
        projects: Vec<Project>,
        collaborators: Vec<Collaborator>,
        warnings: Vec<Warning>,
    ) -> Self {
        Self {
            publications,
            people,
            projects,
            collaborators,
            warnings,
        }
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn collaborators(&self) -> &[Collaborator] {
        &self.collaborators
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn publication(&self, bib_id: &str) -> Option<&Publication> {
        self.publications.iter().find(|publication| publication.bib_id == bib_id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|person| person.id() == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id() == id)
    }

    pub fn warnings_of(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |warning| warning.kind == kind)
    }
}
