use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::schema::ScoringCategorySchema;
use super::{ScoringCategory, TermKey};
use crate::error::ConfigError;

const SHARE_TOLERANCE: f64 = 1e-9;

/// Reason a weight vector was refused.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ProfileError {
    #[error("weight for {term} is missing")]
    MissingTerm { term: TermKey },
    #[error("unknown scoring term '{term}'")]
    UnknownTerm { term: String },
    #[error("weight for {term} is not a finite number")]
    NotFinite { term: TermKey },
    #[error("weight {value} for {term} is outside [{min}, {max}]")]
    OutOfBounds {
        term: TermKey,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{category} holds {share:.3} of total weight, above the {max:.3} cap")]
    CategoryShareExceeded {
        category: ScoringCategory,
        share: f64,
        max: f64,
    },
}

/// Built-in strategy profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProfilePreset {
    A,
    B,
    C,
}

impl ProfilePreset {
    pub const ALL: [ProfilePreset; 3] = [ProfilePreset::A, ProfilePreset::B, ProfilePreset::C];

    pub const fn as_str(self) -> &'static str {
        match self {
            ProfilePreset::A => "A",
            ProfilePreset::B => "B",
            ProfilePreset::C => "C",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ProfilePreset::A => "balanced fairness and coverage",
            ProfilePreset::B => "staff preference first",
            ProfilePreset::C => "regular rhythms, fewest long streaks and night-to-day flips",
        }
    }

    /// Weights in [`TermKey::ALL`] order.
    const fn raw_weights(self) -> [f64; 6] {
        match self {
            ProfilePreset::A => [-2.0, -2.0, 1.0, -1.0, -1.0, 3.0],
            ProfilePreset::B => [-1.0, -1.0, 4.0, -1.0, -1.0, 2.0],
            ProfilePreset::C => [-1.0, -1.0, 1.0, -3.0, -3.0, 1.0],
        }
    }

    pub fn profile(self) -> StrategyWeightProfile {
        StrategyWeightProfile {
            name: self.as_str().to_string(),
            weights: TermKey::ALL.into_iter().zip(self.raw_weights()).collect(),
        }
    }
}

impl fmt::Display for ProfilePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfilePreset {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        ProfilePreset::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| ConfigError::UnknownProfile(raw.to_string()))
    }
}

/// A named weight vector that has passed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyWeightProfile {
    name: String,
    weights: BTreeMap<TermKey, f64>,
}

impl StrategyWeightProfile {
    pub fn preset(preset: ProfilePreset) -> Self {
        preset.profile()
    }

    pub fn custom(
        name: impl Into<String>,
        weights: BTreeMap<TermKey, f64>,
        schema: &ScoringCategorySchema,
    ) -> Result<Self, Vec<ProfileError>> {
        validate_profile(&weights, schema)?;
        Ok(Self {
            name: name.into(),
            weights,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weights(&self) -> &BTreeMap<TermKey, f64> {
        &self.weights
    }

    pub fn weight(&self, term: TermKey) -> f64 {
        self.weights.get(&term).copied().unwrap_or(0.0)
    }
}

/// Check presence, finiteness, per-term bounds, and category shares. Every
/// failure is reported.
pub fn validate_profile(
    weights: &BTreeMap<TermKey, f64>,
    schema: &ScoringCategorySchema,
) -> Result<(), Vec<ProfileError>> {
    let mut errors = Vec::new();

    for term in TermKey::ALL {
        let Some(value) = weights.get(&term).copied() else {
            errors.push(ProfileError::MissingTerm { term });
            continue;
        };
        if !value.is_finite() {
            errors.push(ProfileError::NotFinite { term });
            continue;
        }
        if let Some(spec) = schema.term(term) {
            if !spec.contains(value) {
                errors.push(ProfileError::OutOfBounds {
                    term,
                    value,
                    min: spec.min,
                    max: spec.max,
                });
            }
        }
    }

    if errors.is_empty() {
        errors.extend(share_errors(weights, schema));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn share_errors(
    weights: &BTreeMap<TermKey, f64>,
    schema: &ScoringCategorySchema,
) -> Vec<ProfileError> {
    let total: f64 = weights.values().map(|weight| weight.abs()).sum();
    if total == 0.0 {
        return Vec::new();
    }

    let mut by_category: BTreeMap<ScoringCategory, f64> = BTreeMap::new();
    for (term, weight) in weights {
        let category = schema
            .term(*term)
            .map(|spec| spec.category)
            .unwrap_or_else(|| term.category());
        *by_category.entry(category).or_default() += weight.abs();
    }

    by_category
        .into_iter()
        .filter_map(|(category, magnitude)| {
            let share = magnitude / total;
            let max = schema.max_share(category);
            (share > max + SHARE_TOLERANCE).then_some(ProfileError::CategoryShareExceeded {
                category,
                share,
                max,
            })
        })
        .collect()
}

/// Profile choice as it arrives over configuration or the API: a preset name
/// or an explicit weight map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProfileSelection {
    Preset(ProfilePreset),
    Custom {
        #[serde(default)]
        name: Option<String>,
        weights: BTreeMap<TermKey, f64>,
    },
}

impl ProfileSelection {
    pub fn resolve(
        self,
        schema: &ScoringCategorySchema,
    ) -> Result<StrategyWeightProfile, ConfigError> {
        match self {
            ProfileSelection::Preset(preset) => {
                let profile = preset.profile();
                validate_profile(profile.weights(), schema)?;
                Ok(profile)
            }
            ProfileSelection::Custom { name, weights } => Ok(StrategyWeightProfile::custom(
                name.unwrap_or_else(|| "custom".to_string()),
                weights,
                schema,
            )?),
        }
    }
}

impl From<ProfilePreset> for ProfileSelection {
    fn from(preset: ProfilePreset) -> Self {
        ProfileSelection::Preset(preset)
    }
}
