//! YAML loaders for the roster, project table and publication records.
//!
//! # Responsibility
//! - Read input files and validate them into typed records.
//! - Enforce roster/project schema before any publication is processed.
//!
//! # Invariants
//! - Missing or structurally invalid roster/project files are `ConfigError`.
//! - A single undecodable publication record is a warning, not a failure.

use crate::config::{ConfigError, ConfigResult, LabConfig};
use crate::intake::entry::EntryError;
use crate::model::person::PersonRecord;
use crate::model::project::ProjectRecord;
use crate::model::publication::{RawPublication, RawValue};
use crate::model::warning::Warning;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;

const PERSON_KIND: &str = "person";
const PROJECT_KIND: &str = "project";

/// Publication records loaded from one or more files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationBatch {
    pub records: Vec<RawPublication>,
    /// `parse_error` warnings for records that could not be decoded.
    pub warnings: Vec<Warning>,
}

impl PublicationBatch {
    pub fn extend(&mut self, other: PublicationBatch) {
        self.records.extend(other.records);
        self.warnings.extend(other.warnings);
    }
}

/// Loads and validates the roster (`people.yaml`).
pub fn load_roster(path: impl AsRef<Path>) -> ConfigResult<Vec<PersonRecord>> {
    let path = path.as_ref();
    let people = load_typed_list::<PersonRecord>(path, PERSON_KIND)?;
    validate_roster(&people).inspect_err(|err| log_load_error("load_roster", path, err))?;
    info!(
        "event=load_roster module=loader status=ok path={} records={}",
        path.display(),
        people.len()
    );
    Ok(people)
}

/// Loads and validates the project table (`projects.yaml`).
pub fn load_projects(path: impl AsRef<Path>) -> ConfigResult<Vec<ProjectRecord>> {
    let path = path.as_ref();
    let projects = load_typed_list::<ProjectRecord>(path, PROJECT_KIND)?;
    validate_projects(&projects).inspect_err(|err| log_load_error("load_projects", path, err))?;
    info!(
        "event=load_projects module=loader status=ok path={} records={}",
        path.display(),
        projects.len()
    );
    Ok(projects)
}

/// Loads raw publication records from one file.
///
/// Entries without a `category` receive `default_category` when given.
pub fn load_publications(
    path: impl AsRef<Path>,
    default_category: Option<&str>,
) -> ConfigResult<PublicationBatch> {
    let path = path.as_ref();
    let values =
        read_record_list(path).inspect_err(|err| log_load_error("publications", path, err))?;
    let mut batch = PublicationBatch::default();

    for (position, value) in values.into_iter().enumerate() {
        let context = record_label(&value)
            .unwrap_or_else(|| format!("{}#{}", file_label(path), position + 1));
        match serde_yaml::from_value::<RawPublication>(value) {
            Ok(mut record) => {
                if let Some(category) = default_category {
                    if record.text("category").is_none() {
                        record.insert("category", category);
                    }
                }
                batch.records.push(record);
            }
            Err(err) => {
                let failure = EntryError::Undecodable {
                    context,
                    message: err.to_string(),
                };
                batch.warnings.push(failure.to_warning());
            }
        }
    }

    info!(
        "event=load_publications module=loader status=ok path={} records={} undecodable={}",
        path.display(),
        batch.records.len(),
        batch.warnings.len()
    );
    Ok(batch)
}

/// Loads every publication source named by `config`, in order.
///
/// With `pdf_base_url` configured, records lacking a `pdf_url` get one from
/// `resolve_pdf_url`.
pub fn load_configured_publications(config: &LabConfig) -> ConfigResult<PublicationBatch> {
    let mut batch = PublicationBatch::default();
    for source in &config.publication_files {
        let path = config.resolve_path(&source.path);
        batch.extend(load_publications(&path, source.category.as_deref())?);
    }
    if let Some(base) = config.pdf_base_url.as_deref() {
        attach_pdf_urls(&mut batch.records, base, config.base_dir());
    }
    Ok(batch)
}

/// `<pdf_base_url>/<bib_id>.pdf`.
///
/// Remote (`http://`, `https://`) bases always yield a link. A local base only
/// does when the file exists; relative local bases resolve against `base_dir`.
pub fn resolve_pdf_url(bib_id: &str, pdf_base_url: &str, base_dir: &Path) -> Option<String> {
    let base = pdf_base_url.trim().trim_end_matches('/');
    if base.is_empty() || bib_id.is_empty() {
        return None;
    }
    let pdf_path = format!("{base}/{bib_id}.pdf");
    if base.starts_with("http://") || base.starts_with("https://") {
        return Some(pdf_path);
    }
    base_dir.join(&pdf_path).is_file().then_some(pdf_path)
}

fn attach_pdf_urls(records: &mut [RawPublication], pdf_base_url: &str, base_dir: &Path) {
    for record in records {
        if record.text("pdf_url").is_some() {
            continue;
        }
        let pdf_url = record
            .text("bib_id")
            .or_else(|| record.text("id"))
            .and_then(|bib_id| resolve_pdf_url(&bib_id, pdf_base_url, base_dir));
        if let Some(pdf_url) = pdf_url {
            record.insert("pdf_url", pdf_url);
        }
    }
}

/// Schema checks for roster records: non-blank id and name, unique ids.
pub fn validate_roster(people: &[PersonRecord]) -> ConfigResult<()> {
    let mut seen = BTreeSet::new();
    for (position, person) in people.iter().enumerate() {
        require_text(PERSON_KIND, position, "id", &person.id)?;
        require_text(PERSON_KIND, position, "name", &person.name)?;
        if !seen.insert(person.id.as_str()) {
            return Err(ConfigError::DuplicateId {
                kind: PERSON_KIND,
                id: person.id.clone(),
            });
        }
    }
    Ok(())
}

/// Schema checks for project records: non-blank id and title, unique ids.
pub fn validate_projects(projects: &[ProjectRecord]) -> ConfigResult<()> {
    let mut seen = BTreeSet::new();
    for (position, project) in projects.iter().enumerate() {
        require_text(PROJECT_KIND, position, "id", &project.id)?;
        require_text(PROJECT_KIND, position, "title", &project.title)?;
        if !seen.insert(project.id.as_str()) {
            return Err(ConfigError::DuplicateId {
                kind: PROJECT_KIND,
                id: project.id.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn read_text_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::Missing(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

fn read_record_list(path: &Path) -> ConfigResult<Vec<Value>> {
    let text = read_text_file(path)?;
    let document: Value = serde_yaml::from_str(&text).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    match document {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(values) => Ok(values),
        _ => Err(ConfigError::NotAList(path.to_path_buf())),
    }
}

fn load_typed_list<T: DeserializeOwned>(path: &Path, kind: &'static str) -> ConfigResult<Vec<T>> {
    read_record_list(path)
        .and_then(|values| {
            values
                .into_iter()
                .enumerate()
                .map(|(position, value)| {
                    serde_yaml::from_value::<T>(value).map_err(|err| ConfigError::InvalidRecord {
                        kind,
                        position,
                        message: err.to_string(),
                    })
                })
                .collect()
        })
        .inspect_err(|err| log_load_error(kind, path, err))
}

fn require_text(
    kind: &'static str,
    position: usize,
    field: &str,
    value: &str,
) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidRecord {
            kind,
            position,
            message: format!("`{field}` must not be blank"),
        });
    }
    Ok(())
}

fn record_label(value: &Value) -> Option<String> {
    let mapping = value.as_mapping()?;
    ["bib_id", "ID", "id"].iter().find_map(|key| {
        mapping
            .get(*key)
            .and_then(|id| serde_yaml::from_value::<RawValue>(id.clone()).ok())
            .map(|id| id.to_text().trim().to_string())
            .filter(|id| !id.is_empty())
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_load_error(stage: &str, path: &Path, err: &ConfigError) {
    error!(
        "event=load_input module=loader status=error stage={} path={} error={}",
        stage,
        path.display(),
        err
    );
}
