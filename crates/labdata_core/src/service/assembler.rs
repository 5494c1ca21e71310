//! Batch assembly of the cross-referenced dataset.
//!
//! # Responsibility
//! - Validate roster and project table up front (fatal on failure).
//! - Validate, match and tag every publication entry independently.
//! - Aggregate back-links once all entries are resolved.
//!
//! # Invariants
//! - Entry-level problems never abort the run; each becomes a warning.
//! - Identical input yields an identical snapshot, ordering included.
//! - Warnings appear in input order: loader, roster index, then per entry.

use crate::config::{validate_matcher_settings, ConfigResult, LabConfig};
use crate::intake::entry::{validate_entry, EntryError, EntryIntake};
use crate::loader::{load_configured_publications, load_projects, load_roster, validate_projects, validate_roster};
use crate::model::collaborator::Collaborator;
use crate::model::dataset::AssembledData;
use crate::model::person::{Person, PersonRecord};
use crate::model::project::{Project, ProjectRecord};
use crate::model::publication::{AuthorRef, Publication, RawPublication};
use crate::model::warning::{Warning, WarningKind};
use crate::resolve::backlinks::{publication_order, CrossReferences};
use crate::resolve::matcher::{AuthorMatcher, MatchMethod, MatcherSettings, RosterIndex};
use crate::resolve::normalize::normalize_name;
use crate::resolve::tags::{resolve_tags, ProjectTable};
use log::info;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::time::Instant;

/// Snapshot plus diagnostics that are not part of the output contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyResult {
    pub data: AssembledData,
    /// Distinct unknown project tags, sorted.
    pub unknown_projects: Vec<String>,
    /// Context (id or position label) of every skipped entry, in input order.
    pub skipped_entries: Vec<String>,
}

/// Pipeline driver configured with matcher tunables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Assembler {
    settings: MatcherSettings,
}

enum Slot {
    Skipped(EntryError),
    Valid(EntryIntake),
}

struct ResolvedEntry {
    publication: Publication,
    warnings: Vec<Warning>,
    dropped_tags: BTreeSet<String>,
}

impl Assembler {
    /// Creates an assembler; rejects out-of-range settings.
    pub fn new(settings: MatcherSettings) -> ConfigResult<Self> {
        validate_matcher_settings(&settings)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> MatcherSettings {
        self.settings
    }

    /// Assembles the snapshot from already-loaded inputs.
    pub fn assemble(
        &self,
        raw_publications: &[RawPublication],
        roster: &[PersonRecord],
        projects: &[ProjectRecord],
    ) -> ConfigResult<AssembledData> {
        self.run(raw_publications, roster, projects, Vec::new())
            .map(|result| result.data)
    }

    /// Full run with diagnostics.
    ///
    /// `prior_warnings` (e.g. from loaders) lead the warnings log.
    pub fn run(
        &self,
        raw_publications: &[RawPublication],
        roster: &[PersonRecord],
        projects: &[ProjectRecord],
        prior_warnings: Vec<Warning>,
    ) -> ConfigResult<AssemblyResult> {
        let started_at = Instant::now();
        validate_roster(roster)?;
        validate_projects(projects)?;

        let index = RosterIndex::build(roster);
        let table = ProjectTable::build(projects);
        let matcher = AuthorMatcher::new(&index, self.settings);

        let mut warnings = prior_warnings;
        warnings.extend(index.ambiguities().iter().map(|ambiguity| ambiguity.to_warning()));

        let slots = intake(raw_publications);
        let resolved: Vec<Result<ResolvedEntry, EntryError>> = slots
            .into_par_iter()
            .map(|slot| match slot {
                Slot::Skipped(err) => Err(err),
                Slot::Valid(intake) => Ok(resolve_entry(intake, &matcher, &table)),
            })
            .collect();

        let mut publications = Vec::with_capacity(resolved.len());
        let mut unknown_projects = BTreeSet::new();
        let mut skipped_entries = Vec::new();
        for outcome in resolved {
            match outcome {
                Ok(entry) => {
                    warnings.extend(entry.warnings);
                    unknown_projects.extend(entry.dropped_tags);
                    publications.push(entry.publication);
                }
                Err(err) => {
                    warnings.push(err.to_warning());
                    skipped_entries.push(err.context().to_string());
                }
            }
        }

        let collaborators = collect_collaborators(&publications);
        let references = CrossReferences::build(&publications);
        publications.sort_by(publication_order);

        let people = roster
            .iter()
            .map(|record| {
                Person::new(
                    record.clone(),
                    references.person_publications(&record.id).to_vec(),
                )
            })
            .collect::<Vec<_>>();
        let projects = projects
            .iter()
            .map(|record| {
                Project::new(
                    record.clone(),
                    references.project_publications(&record.id).to_vec(),
                    references.project_people(&record.id).to_vec(),
                )
            })
            .collect::<Vec<_>>();

        info!(
            "event=assemble module=assembler status=ok duration_ms={} publications={} skipped={} people={} projects={} collaborators={} warnings={}",
            started_at.elapsed().as_millis(),
            publications.len(),
            skipped_entries.len(),
            people.len(),
            projects.len(),
            collaborators.len(),
            warnings.len()
        );

        Ok(AssemblyResult {
            data: AssembledData::new(publications, people, projects, collaborators, warnings),
            unknown_projects: unknown_projects.into_iter().collect(),
            skipped_entries,
        })
    }
}

/// Assembles with default matcher settings.
pub fn assemble(
    raw_publications: &[RawPublication],
    roster: &[PersonRecord],
    projects: &[ProjectRecord],
) -> ConfigResult<AssembledData> {
    Assembler::default().assemble(raw_publications, roster, projects)
}

/// Loads every input named by `config`, then assembles.
///
/// Roster and project table load first, so a missing or invalid one fails
/// before any publication file is read.
pub fn assemble_from_config(config: &LabConfig) -> ConfigResult<AssemblyResult> {
    let assembler = Assembler::new(config.matcher_settings()?)?;
    let roster = load_roster(config.people_path())?;
    let projects = load_projects(config.projects_path())?;
    let batch = load_configured_publications(config)?;
    assembler.run(&batch.records, &roster, &projects, batch.warnings)
}

// Sequential: duplicate detection needs the whole prefix of the input.
fn intake(raw_publications: &[RawPublication]) -> Vec<Slot> {
    let mut seen = BTreeSet::new();
    raw_publications
        .iter()
        .enumerate()
        .map(|(position, raw)| match validate_entry(raw, position) {
            Ok(intake) if !seen.insert(intake.entry.bib_id.clone()) => {
                Slot::Skipped(EntryError::DuplicateBibId(intake.entry.bib_id))
            }
            Ok(intake) => Slot::Valid(intake),
            Err(err) => Slot::Skipped(err),
        })
        .collect()
}

fn resolve_entry(intake: EntryIntake, matcher: &AuthorMatcher<'_>, table: &ProjectTable) -> ResolvedEntry {
    let EntryIntake { entry, mut warnings } = intake;

    let mut authors = Vec::with_capacity(entry.authors.len());
    for display_name in entry.authors {
        let outcome = matcher.resolve(&display_name);
        if outcome.method == MatchMethod::Fuzzy && !outcome.tied_person_ids.is_empty() {
            warnings.push(Warning::new(
                WarningKind::MatchAmbiguity,
                entry.bib_id.clone(),
                format!(
                    "author `{}` ties between [{}]; using `{}`",
                    display_name,
                    outcome.tied_person_ids.join(", "),
                    outcome.person_id.as_deref().unwrap_or_default()
                ),
            ));
        }
        authors.push(AuthorRef {
            display_name,
            person_id: outcome.person_id,
        });
    }

    let tags = entry
        .project_tags
        .as_deref()
        .map(|raw| resolve_tags(raw, table))
        .unwrap_or_default();
    warnings.extend(tags.warnings(&entry.bib_id));

    ResolvedEntry {
        publication: Publication {
            bib_id: entry.bib_id,
            title: entry.title,
            authors,
            year: entry.year,
            venue: entry.venue,
            category: entry.category,
            entry_type: entry.entry_type,
            abstract_text: entry.abstract_text,
            note: entry.note,
            pdf_url: entry.pdf_url,
            doi_url: entry.doi_url,
            arxiv_url: entry.arxiv_url,
            url: entry.url,
            video_url: entry.video_url,
            project_ids: tags.resolved_ids,
        },
        warnings,
        dropped_tags: tags.dropped,
    }
}

/// Unmatched authors deduplicated by normalized key, first display form kept.
///
/// Names whose key is empty dedupe on their exact display text instead.
fn collect_collaborators(publications: &[Publication]) -> Vec<Collaborator> {
    let mut seen = BTreeSet::new();
    let mut collaborators = Vec::new();
    for author in publications
        .iter()
        .flat_map(|publication| publication.authors.iter())
        .filter(|author| !author.is_resolved())
    {
        let key = normalize_name(&author.display_name);
        let key = if key.is_empty() {
            author.display_name.clone()
        } else {
            key
        };
        if seen.insert(key) {
            collaborators.push(Collaborator {
                display_name: author.display_name.clone(),
            });
        }
    }
    collaborators
}
