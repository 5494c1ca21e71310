//! Non-fatal diagnostics collected during one assembly run.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Category of a recorded warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Input record could not be decoded at all.
    ParseError,
    /// Entry decoded but misses a required field or holds an invalid value.
    ValidationError,
    /// A project tag (or author reference) could not be resolved.
    ReferenceError,
    /// Several roster candidates tied; resolved by deterministic tie-break.
    MatchAmbiguity,
}

impl WarningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::ValidationError => "validation_error",
            Self::ReferenceError => "reference_error",
            Self::MatchAmbiguity => "match_ambiguity",
        }
    }
}

/// One actionable diagnostic.
///
/// `context` is the entry id when one exists, otherwise the offending name or
/// a positional label such as `entry#3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub context: String,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
            message: message.into(),
        }
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.kind.as_str(), self.context, self.message)
    }
}
