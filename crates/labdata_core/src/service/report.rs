//! Read-only reports over an assembly result.

use crate::model::dataset::AssembledData;
use crate::model::warning::WarningKind;
use crate::service::assembler::AssemblyResult;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Summary used by `--validate`.
///
/// Unknown project tags count as errors; unresolved authors are informative
/// only, since external co-authors are expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub publication_count: usize,
    pub people_count: usize,
    pub project_count: usize,
    pub collaborator_count: usize,
    pub unresolved_authors: Vec<String>,
    pub unknown_projects: Vec<String>,
    pub skipped_entries: Vec<String>,
    pub ambiguity_count: usize,
}

impl ValidationReport {
    pub fn new(result: &AssemblyResult) -> Self {
        let data = &result.data;
        Self {
            publication_count: data.publications().len(),
            people_count: data.people().len(),
            project_count: data.projects().len(),
            collaborator_count: data.collaborators().len(),
            unresolved_authors: unresolved_authors(data),
            unknown_projects: result.unknown_projects.clone(),
            skipped_entries: result.skipped_entries.clone(),
            ambiguity_count: data.warnings_of(WarningKind::MatchAmbiguity).count(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.unknown_projects.len()
    }

    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Publications: {}", self.publication_count)?;
        writeln!(f, "People: {}", self.people_count)?;
        writeln!(f, "Projects: {}", self.project_count)?;
        writeln!(f, "Collaborators: {}", self.collaborator_count)?;

        write_section(f, "Skipped entries", &self.skipped_entries)?;
        write_section(f, "Unresolved authors", &self.unresolved_authors)?;
        write_section(f, "Unknown project IDs", &self.unknown_projects)?;
        if self.ambiguity_count > 0 {
            writeln!(f, "\nAmbiguous matches: {}", self.ambiguity_count)?;
        }

        if self.passed() {
            write!(f, "\nValidation passed.")
        } else {
            write!(f, "\nValidation found {} error(s).", self.error_count())
        }
    }
}

fn write_section(f: &mut Formatter<'_>, title: &str, items: &[String]) -> std::fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{title} ({}):", items.len())?;
    for item in items {
        writeln!(f, "  - {item}")?;
    }
    Ok(())
}

/// Distinct display names of authors that matched no roster entry, sorted.
pub fn unresolved_authors(data: &AssembledData) -> Vec<String> {
    data.publications()
        .iter()
        .flat_map(|publication| publication.authors.iter())
        .filter(|author| !author.is_resolved())
        .map(|author| author.display_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
