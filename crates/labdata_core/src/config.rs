//! Run configuration and fatal configuration errors.
//!
//! # Responsibility
//! - Load `lab.yaml`, naming the roster, project table and publication files.
//! - Validate matcher tunables before any entry is processed.
//!
//! # Invariants
//! - Relative paths resolve against the directory holding the config file.
//! - Every `ConfigError` aborts the run before entry processing starts.

use crate::loader::read_text_file;
use crate::resolve::matcher::{MatcherSettings, DEFAULT_FUZZY_THRESHOLD};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal configuration-level failure.
#[derive(Debug)]
pub enum ConfigError {
    /// Input file does not exist.
    Missing(PathBuf),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File exists but is not valid YAML of the expected shape.
    Malformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    /// Document parsed but its top level is not a list of records.
    NotAList(PathBuf),
    /// One roster/project record violates the schema.
    InvalidRecord {
        kind: &'static str,
        position: usize,
        message: String,
    },
    DuplicateId {
        kind: &'static str,
        id: String,
    },
    InvalidSetting {
        name: &'static str,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "input file not found: {}", path.display()),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "malformed YAML in `{}`: {source}", path.display())
            }
            Self::NotAList(path) => {
                write!(f, "expected a list of records in `{}`", path.display())
            }
            Self::InvalidRecord {
                kind,
                position,
                message,
            } => write!(f, "invalid {kind} record #{}: {message}", position + 1),
            Self::DuplicateId { kind, id } => write!(f, "duplicate {kind} id `{id}`"),
            Self::InvalidSetting { name, message } => {
                write!(f, "invalid setting `{name}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// `matching:` block of `lab.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub fuzzy_threshold: f64,
    pub skip_abbreviated_fuzzy: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            skip_abbreviated_fuzzy: false,
        }
    }
}

impl From<MatchingConfig> for MatcherSettings {
    fn from(value: MatchingConfig) -> Self {
        Self {
            fuzzy_threshold: value.fuzzy_threshold,
            skip_abbreviated_fuzzy: value.skip_abbreviated_fuzzy,
        }
    }
}

/// One publication input file and the category applied to its entries
/// when they carry none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicationSource {
    pub path: PathBuf,
    #[serde(default)]
    pub category: Option<String>,
}

/// Parsed `lab.yaml`.
///
/// ```yaml
/// people_file: data/people.yaml
/// projects_file: data/projects.yaml
/// publication_files:
///   - path: data/journal.yaml
///     category: Journal Papers
/// pdf_base_url: https://lab.edu/pdfs
/// matching:
///   fuzzy_threshold: 0.85
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabConfig {
    pub people_file: PathBuf,
    pub projects_file: PathBuf,
    #[serde(default)]
    pub publication_files: Vec<PublicationSource>,
    /// URL prefix or local directory holding `<bib_id>.pdf` files.
    #[serde(default)]
    pub pdf_base_url: Option<String>,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl LabConfig {
    /// Reads and parses a config file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = read_text_file(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_yaml_str(&text, path, base_dir)
    }

    /// Parses config text; `origin` is only used in error messages.
    pub fn from_yaml_str(
        text: &str,
        origin: impl AsRef<Path>,
        base_dir: impl Into<PathBuf>,
    ) -> ConfigResult<Self> {
        let mut config: Self =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Malformed {
                path: origin.as_ref().to_path_buf(),
                source,
            })?;
        config.base_dir = base_dir.into();
        config.matcher_settings()?;
        Ok(config)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn people_path(&self) -> PathBuf {
        self.resolve_path(&self.people_file)
    }

    pub fn projects_path(&self) -> PathBuf {
        self.resolve_path(&self.projects_file)
    }

    /// Validated matcher tunables.
    pub fn matcher_settings(&self) -> ConfigResult<MatcherSettings> {
        let settings = MatcherSettings::from(self.matching);
        validate_matcher_settings(&settings)?;
        Ok(settings)
    }
}

/// Rejects thresholds outside `[0.0, 1.0]` (including NaN).
pub fn validate_matcher_settings(settings: &MatcherSettings) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&settings.fuzzy_threshold) {
        return Err(ConfigError::InvalidSetting {
            name: "fuzzy_threshold",
            message: format!(
                "expected a value in [0.0, 1.0], got {}",
                settings.fuzzy_threshold
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_matcher_settings, ConfigError, LabConfig};
    use crate::resolve::matcher::MatcherSettings;
    use std::path::{Path, PathBuf};

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config = LabConfig::from_yaml_str(
            "people_file: people.yaml\nprojects_file: /abs/projects.yaml\n",
            "lab.yaml",
            "/data/lab",
        )
        .expect("minimal config");
        assert!(config.publication_files.is_empty());
        assert_eq!(config.people_path(), PathBuf::from("/data/lab/people.yaml"));
        assert_eq!(config.projects_path(), PathBuf::from("/abs/projects.yaml"));
        assert_eq!(
            config.matcher_settings().expect("default settings"),
            MatcherSettings::default()
        );
    }

    #[test]
    fn missing_roster_path_is_malformed() {
        let err = LabConfig::from_yaml_str("projects_file: p.yaml\n", "lab.yaml", "")
            .expect_err("people_file is required");
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("lab.yaml"));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = LabConfig::from_yaml_str(
            "people_file: a\nprojects_file: b\nmatching:\n  fuzzy_threshold: 1.5\n",
            Path::new("lab.yaml"),
            "",
        )
        .expect_err("threshold above 1.0");
        assert!(matches!(
            err,
            ConfigError::InvalidSetting {
                name: "fuzzy_threshold",
                ..
            }
        ));

        let nan = MatcherSettings {
            fuzzy_threshold: f64::NAN,
            ..MatcherSettings::default()
        };
        assert!(validate_matcher_settings(&nan).is_err());
    }
}
