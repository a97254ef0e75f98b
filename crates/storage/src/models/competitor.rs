use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Canonical identifier of a competitor.
///
/// Upstream results and user picks must agree on a single spelling, so the
/// identifier is derived from the family name: lower-cased, decomposed with
/// NFKD and stripped of everything outside `[a-z0-9_]`. "Pérez", "PEREZ" and
/// " perez " all produce `perez`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(String);

impl CompetitorId {
    /// Builds the identifier from a raw family name.
    ///
    /// Returns `None` when nothing survives normalization (empty input or a
    /// name written entirely outside the Latin script).
    pub fn from_family_name(name: &str) -> Option<Self> {
        let slug: String = name
            .to_lowercase()
            .nfkd()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        if slug.is_empty() { None } else { Some(Self(slug)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
