//! Back-link aggregation from resolved publications.
//!
//! # Invariants
//! - Runs once over the complete set of resolved publications.
//! - Every back-link list follows `publication_order`: year descending,
//!   category, first author's normalized name, then `bib_id`.

use crate::model::publication::Publication;
use crate::resolve::normalize::normalize_name;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet};

/// Back-links computed for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectLinks {
    pub publication_ids: Vec<String>,
    /// Sorted union of resolved author ids over `publication_ids`.
    pub people_ids: Vec<String>,
}

/// Person and project back-links for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossReferences {
    people: BTreeMap<String, Vec<String>>,
    projects: BTreeMap<String, ProjectLinks>,
}

impl CrossReferences {
    /// Aggregates back-links in a single pass.
    ///
    /// Publications are visited in `publication_order`, so each accumulator
    /// is already in contract order when the pass ends.
    pub fn build(publications: &[Publication]) -> Self {
        let mut people: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut project_pubs: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut project_people: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for publication in sorted_publications(publications) {
            for person_id in publication.person_ids() {
                people
                    .entry(person_id.to_string())
                    .or_default()
                    .push(publication.bib_id.clone());
            }

            for project_id in &publication.project_ids {
                project_pubs
                    .entry(project_id.clone())
                    .or_default()
                    .push(publication.bib_id.clone());
                project_people
                    .entry(project_id.clone())
                    .or_default()
                    .extend(publication.person_ids().map(str::to_string));
            }
        }

        let projects = project_pubs
            .into_iter()
            .map(|(project_id, publication_ids)| {
                let people_ids = project_people
                    .remove(&project_id)
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                (
                    project_id,
                    ProjectLinks {
                        publication_ids,
                        people_ids,
                    },
                )
            })
            .collect();

        Self { people, projects }
    }

    /// Ordered publication ids authored by `person_id`; empty when none.
    pub fn person_publications(&self, person_id: &str) -> &[String] {
        self.people
            .get(person_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn project_links(&self, project_id: &str) -> Option<&ProjectLinks> {
        self.projects.get(project_id)
    }

    pub fn project_publications(&self, project_id: &str) -> &[String] {
        self.projects
            .get(project_id)
            .map(|links| links.publication_ids.as_slice())
            .unwrap_or_default()
    }

    pub fn project_people(&self, project_id: &str) -> &[String] {
        self.projects
            .get(project_id)
            .map(|links| links.people_ids.as_slice())
            .unwrap_or_default()
    }
}

/// Deterministic publication ordering shared by back-links and output.
pub fn publication_order(a: &Publication, b: &Publication) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// References to `publications` sorted by `publication_order`.
pub fn sorted_publications(publications: &[Publication]) -> Vec<&Publication> {
    let mut ordered: Vec<&Publication> = publications.iter().collect();
    ordered.sort_by_cached_key(|publication| sort_key(*publication));
    ordered
}

fn sort_key(publication: &Publication) -> (Reverse<i32>, &str, String, &str) {
    let first_author = publication
        .authors
        .first()
        .map(|author| normalize_name(&author.display_name))
        .unwrap_or_default();
    (
        Reverse(publication.year),
        publication.category.as_str(),
        first_author,
        publication.bib_id.as_str(),
    )
}
