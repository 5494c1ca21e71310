//! Resolution and cross-reference engine for lab bibliography data.
//! Turns roster, project table and raw publication records into one
//! deterministic, back-linked snapshot.

pub mod config;
pub mod intake;
pub mod loader;
pub mod logging;
pub mod model;
pub mod resolve;
pub mod service;

pub use config::{ConfigError, ConfigResult, LabConfig, MatchingConfig, PublicationSource};
pub use intake::entry::{EntryError, PublicationEntry};
pub use loader::{
    load_projects, load_publications, load_roster, resolve_pdf_url, PublicationBatch,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::collaborator::Collaborator;
pub use model::dataset::AssembledData;
pub use model::person::{Person, PersonRecord, PersonStatus};
pub use model::project::{Project, ProjectRecord, ProjectStatus};
pub use model::publication::{AuthorRef, Publication, RawPublication, RawValue};
pub use model::warning::{Warning, WarningKind};
pub use resolve::backlinks::CrossReferences;
pub use resolve::matcher::{
    AuthorMatcher, MatchMethod, MatchOutcome, MatcherSettings, RosterIndex,
    DEFAULT_FUZZY_THRESHOLD,
};
pub use resolve::normalize::normalize_name;
pub use resolve::tags::{resolve_tags, ProjectTable, TagResolution};
pub use service::assembler::{assemble, assemble_from_config, Assembler, AssemblyResult};
pub use service::report::{unresolved_authors, ValidationReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
