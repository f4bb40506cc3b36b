use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ScoringCategory, TermKey};
use crate::error::ConfigError;

/// Bounds and category for a single scoring term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    pub category: ScoringCategory,
    pub min: f64,
    pub max: f64,
}

impl TermSpec {
    pub fn contains(&self, weight: f64) -> bool {
        (self.min..=self.max).contains(&weight)
    }
}

/// Per-term weight bounds and per-category share caps profiles are checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringCategorySchema {
    terms: BTreeMap<TermKey, TermSpec>,
    max_shares: BTreeMap<ScoringCategory, f64>,
}

impl ScoringCategorySchema {
    pub fn standard() -> Self {
        let terms = TermKey::ALL
            .into_iter()
            .map(|term| {
                let (min, max) = match term {
                    TermKey::Pref | TermKey::Coverage => (0.0, 10.0),
                    _ => (-10.0, 0.0),
                };
                let spec = TermSpec {
                    category: term.category(),
                    min,
                    max,
                };
                (term, spec)
            })
            .collect();

        let max_shares = [
            (ScoringCategory::Fairness, 0.6),
            (ScoringCategory::Satisfaction, 0.5),
            (ScoringCategory::Regularity, 0.6),
            (ScoringCategory::Efficiency, 0.5),
        ]
        .into_iter()
        .collect();

        Self { terms, max_shares }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let schema: Self = serde_json::from_str(raw)?;
        schema.check()?;
        Ok(schema)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn term(&self, term: TermKey) -> Option<&TermSpec> {
        self.terms.get(&term)
    }

    /// Declared cap for a category; undeclared categories are uncapped.
    pub fn max_share(&self, category: ScoringCategory) -> f64 {
        self.max_shares.get(&category).copied().unwrap_or(1.0)
    }

    pub fn categories(&self) -> impl Iterator<Item = ScoringCategory> + '_ {
        let mut seen: Vec<ScoringCategory> = self.terms.values().map(|spec| spec.category).collect();
        seen.sort();
        seen.dedup();
        seen.into_iter()
    }

    fn check(&self) -> Result<(), ConfigError> {
        for term in TermKey::ALL {
            let spec = self
                .terms
                .get(&term)
                .ok_or(ConfigError::SchemaMissingTerm(term))?;
            if !spec.min.is_finite() || !spec.max.is_finite() || spec.min > spec.max {
                return Err(ConfigError::InvalidTermBounds {
                    term,
                    min: spec.min,
                    max: spec.max,
                });
            }
        }

        for (category, share) in &self.max_shares {
            if !(*share > 0.0 && *share <= 1.0) {
                return Err(ConfigError::InvalidCategoryShare {
                    category: *category,
                    share: *share,
                });
            }
        }

        Ok(())
    }
}

impl Default for ScoringCategorySchema {
    fn default() -> Self {
        Self::standard()
    }
}
