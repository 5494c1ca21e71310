//! Raw publication record validation.

use crate::intake::authors::split_author_field;
use crate::model::publication::RawPublication;
use crate::model::warning::{Warning, WarningKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be", "vimeo.com"];
const DOI_RESOLVER: &str = "https://doi.org/";
const ARXIV_ABS: &str = "https://arxiv.org/abs/";

/// Per-entry intake failure. The entry is skipped; the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Record could not be decoded into field-keyed form.
    Undecodable { context: String, message: String },
    /// Required field absent or blank.
    MissingField {
        context: String,
        field: &'static str,
    },
    /// `year` present but not an integer.
    InvalidYear { context: String, value: String },
    /// Author field yielded no usable name.
    NoAuthors { context: String, raw: String },
    /// `bib_id` already used by an earlier entry.
    DuplicateBibId(String),
}

impl EntryError {
    /// Entry id, or positional label when the id is unknown.
    pub fn context(&self) -> &str {
        match self {
            Self::Undecodable { context, .. }
            | Self::MissingField { context, .. }
            | Self::InvalidYear { context, .. }
            | Self::NoAuthors { context, .. } => context,
            Self::DuplicateBibId(bib_id) => bib_id,
        }
    }

    pub fn kind(&self) -> WarningKind {
        match self {
            Self::Undecodable { .. } => WarningKind::ParseError,
            _ => WarningKind::ValidationError,
        }
    }

    pub fn to_warning(&self) -> Warning {
        Warning::new(self.kind(), self.context(), format!("entry skipped: {self}"))
    }
}

impl Display for EntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undecodable { message, .. } => write!(f, "undecodable record: {message}"),
            Self::MissingField { field, .. } => write!(f, "missing required field `{field}`"),
            Self::InvalidYear { value, .. } => write!(f, "invalid year `{value}`"),
            Self::NoAuthors { raw, .. } => write!(f, "no usable author in `{raw}`"),
            Self::DuplicateBibId(bib_id) => write!(f, "duplicate bib_id `{bib_id}`"),
        }
    }
}

impl Error for EntryError {}

/// Typed, validated publication input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationEntry {
    pub bib_id: String,
    pub title: String,
    /// Display names in author order.
    pub authors: Vec<String>,
    pub year: i32,
    pub venue: String,
    pub category: String,
    /// BibTeX entry type (`article`, `inproceedings`, ...); empty when unknown.
    pub entry_type: String,
    pub abstract_text: Option<String>,
    pub note: Option<String>,
    pub pdf_url: Option<String>,
    pub doi_url: Option<String>,
    pub arxiv_url: Option<String>,
    pub url: Option<String>,
    pub video_url: Option<String>,
    /// Raw comma-separated project tag field.
    pub project_tags: Option<String>,
}

/// Validated entry plus notes about recoverable defects inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIntake {
    pub entry: PublicationEntry,
    pub warnings: Vec<Warning>,
}

/// Positional label used before an entry's id is known (1-based).
pub fn position_label(position: usize) -> String {
    format!("entry#{}", position + 1)
}

/// Validates one raw record.
///
/// `position` is the zero-based index in input order.
pub fn validate_entry(raw: &RawPublication, position: usize) -> Result<EntryIntake, EntryError> {
    let bib_id = raw
        .text("bib_id")
        .or_else(|| raw.text("id"))
        .ok_or_else(|| EntryError::MissingField {
            context: position_label(position),
            field: "bib_id",
        })?;
    let missing = |field: &'static str| EntryError::MissingField {
        context: bib_id.clone(),
        field,
    };

    let title = raw.text("title").ok_or_else(|| missing("title"))?;
    let author_field = raw.text("author").ok_or_else(|| missing("author"))?;
    let year_text = raw.text("year").ok_or_else(|| missing("year"))?;
    let year = year_text
        .parse::<i32>()
        .map_err(|_| EntryError::InvalidYear {
            context: bib_id.clone(),
            value: year_text.clone(),
        })?;

    let mut warnings = Vec::new();
    let mut authors = Vec::new();
    for (idx, name) in split_author_field(&author_field).into_iter().enumerate() {
        if name.is_empty() {
            warnings.push(Warning::new(
                WarningKind::ValidationError,
                bib_id.clone(),
                format!("empty author name at position {} dropped", idx + 1),
            ));
        } else {
            authors.push(name);
        }
    }
    if authors.is_empty() {
        return Err(EntryError::NoAuthors {
            context: bib_id,
            raw: author_field,
        });
    }

    let venue = raw
        .text("venue")
        .or_else(|| raw.text("journal"))
        .or_else(|| raw.text("booktitle"))
        .unwrap_or_default();
    let category = raw.text("category").unwrap_or_default();
    let note = raw
        .text("note")
        .map(|note| note.trim_end_matches(['.', ' ']).to_string())
        .filter(|note| !note.is_empty());
    let (url, video_url) = split_video_url(raw.text("url"));

    Ok(EntryIntake {
        entry: PublicationEntry {
            bib_id,
            title,
            authors,
            year,
            venue,
            category,
            entry_type: raw
                .text("entry_type")
                .or_else(|| raw.text("ENTRYTYPE"))
                .unwrap_or_default(),
            abstract_text: raw.text("abstract"),
            note,
            pdf_url: raw.text("pdf_url"),
            doi_url: raw.text("doi").map(|doi| doi_url(&doi)),
            arxiv_url: arxiv_url(raw),
            url,
            video_url,
            project_tags: raw.text("project"),
        },
        warnings,
    })
}

fn doi_url(doi: &str) -> String {
    if doi.starts_with("http") {
        doi.to_string()
    } else {
        format!("{DOI_RESOLVER}{doi}")
    }
}

// Only arXiv e-prints get a link; other archives (`archivePrefix = HAL`) do not.
fn arxiv_url(raw: &RawPublication) -> Option<String> {
    let eprint = raw.text("eprint")?;
    match raw.text("archivePrefix") {
        Some(prefix) if !prefix.eq_ignore_ascii_case("arxiv") => None,
        _ => Some(format!("{ARXIV_ABS}{eprint}")),
    }
}

fn split_video_url(url: Option<String>) -> (Option<String>, Option<String>) {
    match url {
        Some(url) if VIDEO_HOSTS.iter().any(|host| url.contains(host)) => (None, Some(url)),
        other => (other, None),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_entry, EntryError};
    use crate::model::publication::{RawPublication, RawValue};
    use crate::model::warning::WarningKind;

    fn complete() -> RawPublication {
        RawPublication::new()
            .with("bib_id", "smith2020")
            .with("title", "Feeding Robots")
            .with("author", "A. Smith and J. Doe")
            .with("year", "2020")
            .with("venue", "ICRA")
            .with("category", "Conference Papers")
    }

    #[test]
    fn complete_record_validates() {
        let intake = validate_entry(&complete(), 0).expect("valid entry");
        assert_eq!(intake.entry.bib_id, "smith2020");
        assert_eq!(intake.entry.authors, vec!["A. Smith", "J. Doe"]);
        assert_eq!(intake.entry.year, 2020);
        assert!(intake.warnings.is_empty());
    }

    #[test]
    fn missing_required_fields_are_reported_by_name() {
        for field in ["title", "author", "year"] {
            let mut raw = complete();
            raw.insert(field, "  ");
            let err = validate_entry(&raw, 0).expect_err("blank field must fail");
            assert_eq!(
                err,
                EntryError::MissingField {
                    context: "smith2020".to_string(),
                    field,
                }
            );
            assert_eq!(err.kind(), WarningKind::ValidationError);
        }
    }

    #[test]
    fn missing_bib_id_uses_position_label() {
        let raw = RawPublication::new().with("title", "T").with("author", "A").with("year", 2020);
        let err = validate_entry(&raw, 4).expect_err("missing id must fail");
        assert_eq!(err.context(), "entry#5");
    }

    #[test]
    fn non_numeric_year_is_invalid() {
        let raw = complete().with("year", "in press");
        let err = validate_entry(&raw, 0).expect_err("bad year must fail");
        assert!(matches!(err, EntryError::InvalidYear { .. }));
        assert!(err.to_warning().message.contains("in press"));
    }

    #[test]
    fn empty_author_segments_warn_but_keep_entry() {
        let raw = complete().with("author", "A. Smith and and J. Doe");
        let intake = validate_entry(&raw, 0).expect("entry survives");
        assert_eq!(intake.entry.authors.len(), 2);
        assert_eq!(intake.warnings.len(), 1);
    }

    #[test]
    fn doi_video_and_note_are_derived() {
        let raw = complete()
            .with("doi", "10.1000/xyz")
            .with("url", "https://www.youtube.com/watch?v=abc")
            .with("note", "Best paper award. ")
            .with("eprint", "2101.00001")
            .with("abstract", "Abs")
            .with("ENTRYTYPE", "inproceedings")
            .with("pdf_url", "https://lab.edu/pdfs/smith2020.pdf");
        let intake = validate_entry(&raw, 0).expect("valid entry");
        assert_eq!(intake.entry.doi_url.as_deref(), Some("https://doi.org/10.1000/xyz"));
        assert_eq!(intake.entry.url, None);
        assert!(intake.entry.video_url.is_some());
        assert_eq!(intake.entry.note.as_deref(), Some("Best paper award"));
        assert_eq!(
            intake.entry.arxiv_url.as_deref(),
            Some("https://arxiv.org/abs/2101.00001")
        );
        assert_eq!(intake.entry.abstract_text.as_deref(), Some("Abs"));
        assert_eq!(intake.entry.entry_type, "inproceedings");
        assert_eq!(
            intake.entry.pdf_url.as_deref(),
            Some("https://lab.edu/pdfs/smith2020.pdf")
        );
    }

    #[test]
    fn arxiv_link_requires_arxiv_archive() {
        let explicit = complete()
            .with("eprint", "2101.00001")
            .with("archiveprefix", "arXiv");
        assert!(validate_entry(&explicit, 0)
            .expect("valid entry")
            .entry
            .arxiv_url
            .is_some());

        let other = complete().with("eprint", "hal-0001").with("archivePrefix", "HAL");
        assert_eq!(validate_entry(&other, 0).expect("valid entry").entry.arxiv_url, None);
        assert_eq!(validate_entry(&complete(), 0).expect("valid entry").entry.arxiv_url, None);
    }

    #[test]
    fn null_optional_fields_are_absent() {
        let raw = complete()
            .with("note", RawValue::Null)
            .with("doi", RawValue::Null)
            .with("abstract", RawValue::Null);
        let intake = validate_entry(&raw, 0).expect("entry survives empty optionals");
        assert_eq!(intake.entry.note, None);
        assert_eq!(intake.entry.doi_url, None);
        assert_eq!(intake.entry.abstract_text, None);
    }
}
