//! Author name resolution against the roster.
//!
//! # Responsibility
//! - Build the normalized alias index once per run (`RosterIndex`).
//! - Resolve one raw author name by exact lookup, then fuzzy fallback.
//!
//! # Invariants
//! - An exact hit short-circuits; the fuzzy pass never overrides it.
//! - A fuzzy best score below the threshold never resolves.
//! - Ties resolve deterministically: shared surname first, then the smallest
//!   person id.

use crate::model::person::PersonRecord;
use crate::model::warning::{Warning, WarningKind};
use crate::resolve::normalize::{last_token, normalize_name};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Minimum normalized similarity accepted by the fuzzy pass.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;

// Single initial plus surname after normalization, e.g. `s choudhury`.
static ABBREVIATED_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z] [a-z]+$").expect("valid abbreviated-name regex"));

/// Tunables for the matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherSettings {
    /// Fuzzy acceptance threshold in `[0.0, 1.0]`.
    pub fuzzy_threshold: f64,
    /// When set, single-initial names skip the fuzzy pass entirely.
    pub skip_abbreviated_fuzzy: bool,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            skip_abbreviated_fuzzy: false,
        }
    }
}

/// How a raw name was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Fuzzy,
    None,
}

/// Result of resolving one raw author name.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub person_id: Option<String>,
    pub method: MatchMethod,
    /// Similarity of the accepted candidate (`1.0` for exact hits).
    pub score: Option<f64>,
    /// Distinct people sharing the top fuzzy score, when more than one.
    pub tied_person_ids: Vec<String>,
}

impl MatchOutcome {
    fn unmatched() -> Self {
        Self {
            person_id: None,
            method: MatchMethod::None,
            score: None,
            tied_person_ids: Vec::new(),
        }
    }

    fn exact(person_id: &str) -> Self {
        Self {
            person_id: Some(person_id.to_string()),
            method: MatchMethod::Exact,
            score: Some(1.0),
            tied_person_ids: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.person_id.is_some()
    }
}

/// Normalized key claimed by more than one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasAmbiguity {
    pub key: String,
    /// Sorted ascending; the first one owns the key.
    pub person_ids: Vec<String>,
    /// Name or alias as written in the roster, parallel to `person_ids`.
    pub raw_names: Vec<String>,
}

impl AliasAmbiguity {
    pub fn chosen(&self) -> &str {
        &self.person_ids[0]
    }

    pub fn to_warning(&self) -> Warning {
        let claims = self
            .person_ids
            .iter()
            .zip(&self.raw_names)
            .map(|(person_id, raw_name)| format!("`{raw_name}` ({person_id})"))
            .collect::<Vec<_>>()
            .join(", ");
        Warning::new(
            WarningKind::MatchAmbiguity,
            self.raw_names[0].clone(),
            format!(
                "roster names {claims} all normalize to `{}`; using `{}`",
                self.key,
                self.chosen()
            ),
        )
    }
}

/// Reverse index `normalize(name_or_alias) -> person_id`.
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    keys: BTreeMap<String, String>,
    ambiguities: Vec<AliasAmbiguity>,
}

impl RosterIndex {
    /// Indexes every person's canonical name and aliases.
    ///
    /// Empty keys are not indexed. Keys claimed by several people go to the
    /// lexicographically smallest id and are reported in `ambiguities()`.
    pub fn build(roster: &[PersonRecord]) -> Self {
        // key -> person_id -> first raw name of that person producing the key
        let mut claims: BTreeMap<String, BTreeMap<&str, &str>> = BTreeMap::new();
        for person in roster {
            for name in person.match_names() {
                let key = normalize_name(name);
                if key.is_empty() {
                    continue;
                }
                claims
                    .entry(key)
                    .or_default()
                    .entry(person.id.as_str())
                    .or_insert(name);
            }
        }

        let mut keys = BTreeMap::new();
        let mut ambiguities = Vec::new();
        for (key, claimants) in claims {
            let Some(owner) = claimants.keys().next().map(|id| id.to_string()) else {
                continue;
            };
            if claimants.len() > 1 {
                let (person_ids, raw_names): (Vec<String>, Vec<String>) = claimants
                    .into_iter()
                    .map(|(person_id, raw_name)| (person_id.to_string(), raw_name.to_string()))
                    .unzip();
                ambiguities.push(AliasAmbiguity {
                    key: key.clone(),
                    person_ids,
                    raw_names,
                });
            }
            keys.insert(key, owner);
        }

        Self { keys, ambiguities }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Exact lookup by normalized key.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }

    /// `(key, person_id)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys.iter().map(|(key, id)| (key.as_str(), id.as_str()))
    }

    pub fn ambiguities(&self) -> &[AliasAmbiguity] {
        &self.ambiguities
    }
}

/// Stateless resolver over a borrowed roster index.
#[derive(Debug, Clone, Copy)]
pub struct AuthorMatcher<'a> {
    index: &'a RosterIndex,
    settings: MatcherSettings,
}

impl<'a> AuthorMatcher<'a> {
    pub fn new(index: &'a RosterIndex, settings: MatcherSettings) -> Self {
        Self { index, settings }
    }

    pub fn settings(&self) -> MatcherSettings {
        self.settings
    }

    /// Resolves one raw author name to a roster id.
    pub fn resolve(&self, raw_name: &str) -> MatchOutcome {
        let key = normalize_name(raw_name);
        if key.is_empty() {
            return MatchOutcome::unmatched();
        }

        if let Some(person_id) = self.index.lookup(&key) {
            return MatchOutcome::exact(person_id);
        }

        if self.settings.skip_abbreviated_fuzzy && is_abbreviated(&key) {
            return MatchOutcome::unmatched();
        }

        self.fuzzy(&key)
    }

    fn fuzzy(&self, key: &str) -> MatchOutcome {
        let mut best_score = f64::NEG_INFINITY;
        let mut top: Vec<(&str, &str)> = Vec::new();
        for (candidate, person_id) in self.index.entries() {
            let score = similarity(key, candidate);
            if score > best_score {
                best_score = score;
                top.clear();
                top.push((candidate, person_id));
            } else if score == best_score {
                top.push((candidate, person_id));
            }
        }

        if top.is_empty() || best_score < self.settings.fuzzy_threshold {
            return MatchOutcome::unmatched();
        }

        let surname = last_token(key);
        let sharing_surname: BTreeSet<&str> = top
            .iter()
            .filter(|(candidate, _)| last_token(candidate) == surname)
            .map(|(_, person_id)| *person_id)
            .collect();
        let all_tied: BTreeSet<&str> = top.iter().map(|(_, person_id)| *person_id).collect();

        let pool = if sharing_surname.is_empty() {
            &all_tied
        } else {
            &sharing_surname
        };
        let chosen = match pool.iter().next() {
            Some(person_id) => *person_id,
            None => return MatchOutcome::unmatched(),
        };

        debug!(
            "event=author_match module=matcher status=ok method=fuzzy score={:.3} person_id={} tied={}",
            best_score,
            chosen,
            all_tied.len()
        );

        MatchOutcome {
            person_id: Some(chosen.to_string()),
            method: MatchMethod::Fuzzy,
            score: Some(best_score),
            tied_person_ids: if all_tied.len() > 1 {
                all_tied.iter().map(|id| id.to_string()).collect()
            } else {
                Vec::new()
            },
        }
    }
}

/// Normalized Levenshtein similarity in `[0.0, 1.0]` between two keys.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Whether a normalized key is a single initial plus surname.
pub fn is_abbreviated(key: &str) -> bool {
    ABBREVIATED_NAME_RE.is_match(key)
}
