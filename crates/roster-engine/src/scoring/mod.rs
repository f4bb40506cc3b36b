//! Multi-objective scoring of candidate rosters.

mod metrics;
mod profile;
mod schema;

pub use metrics::{compute_metrics, MetricVector};
pub use profile::{
    validate_profile, ProfileError, ProfilePreset, ProfileSelection, StrategyWeightProfile,
};
pub use schema::{ScoringCategorySchema, TermSpec};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::roster::{ScheduleMonth, StaffRegistry};

/// One of the six soft objectives a roster is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TermKey {
    #[serde(rename = "overwork")]
    Overwork,
    #[serde(rename = "shiftBalance")]
    ShiftBalance,
    #[serde(rename = "pref")]
    Pref,
    #[serde(rename = "cons")]
    Cons,
    #[serde(rename = "nToD")]
    NightToDay,
    #[serde(rename = "coverage")]
    Coverage,
}

impl TermKey {
    /// Canonical order; weighted sums are accumulated in this order.
    pub const ALL: [TermKey; 6] = [
        TermKey::Overwork,
        TermKey::ShiftBalance,
        TermKey::Pref,
        TermKey::Cons,
        TermKey::NightToDay,
        TermKey::Coverage,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TermKey::Overwork => "overwork",
            TermKey::ShiftBalance => "shiftBalance",
            TermKey::Pref => "pref",
            TermKey::Cons => "cons",
            TermKey::NightToDay => "nToD",
            TermKey::Coverage => "coverage",
        }
    }

    /// Category the term belongs to in the standard schema.
    pub const fn category(self) -> ScoringCategory {
        match self {
            TermKey::Overwork | TermKey::ShiftBalance => ScoringCategory::Fairness,
            TermKey::Pref => ScoringCategory::Satisfaction,
            TermKey::Cons | TermKey::NightToDay => ScoringCategory::Regularity,
            TermKey::Coverage => ScoringCategory::Efficiency,
        }
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermKey {
    type Err = ProfileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        TermKey::ALL
            .into_iter()
            .find(|term| term.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| ProfileError::UnknownTerm {
                term: raw.to_string(),
            })
    }
}

/// Grouping of terms whose combined weight share is capped by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringCategory {
    Fairness,
    Satisfaction,
    Regularity,
    Efficiency,
}

impl ScoringCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScoringCategory::Fairness => "fairness",
            ScoringCategory::Satisfaction => "satisfaction",
            ScoringCategory::Regularity => "regularity",
            ScoringCategory::Efficiency => "efficiency",
        }
    }
}

impl fmt::Display for ScoringCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weighted contribution of a single term, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub term: TermKey,
    pub metric: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub profile: String,
    pub metrics: MetricVector,
    pub components: Vec<ScoreComponent>,
    pub weighted: f64,
}

impl ScoreResult {
    pub fn metric(&self, term: TermKey) -> f64 {
        self.metrics.get(term)
    }
}

/// Stateless scorer bound to one validated weight profile.
#[derive(Debug, Clone)]
pub struct MultiObjectiveScorer {
    profile: StrategyWeightProfile,
}

impl MultiObjectiveScorer {
    pub fn new(profile: StrategyWeightProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &StrategyWeightProfile {
        &self.profile
    }

    pub fn score(
        &self,
        schedule: &ScheduleMonth,
        registry: &StaffRegistry,
    ) -> Result<ScoreResult, InputError> {
        score(schedule, registry, &self.profile)
    }
}

pub fn score(
    schedule: &ScheduleMonth,
    registry: &StaffRegistry,
    profile: &StrategyWeightProfile,
) -> Result<ScoreResult, InputError> {
    let metrics = compute_metrics(schedule, registry)?;
    Ok(weigh(metrics, profile))
}

/// Apply a profile to precomputed metrics.
pub fn weigh(metrics: MetricVector, profile: &StrategyWeightProfile) -> ScoreResult {
    let mut components = Vec::with_capacity(TermKey::ALL.len());
    let mut weighted = 0.0;

    for term in TermKey::ALL {
        let metric = metrics.get(term);
        let weight = profile.weight(term);
        let contribution = weight * metric;
        weighted += contribution;
        components.push(ScoreComponent {
            term,
            metric,
            weight,
            contribution,
        });
    }

    ScoreResult {
        profile: profile.name().to_string(),
        metrics,
        components,
        weighted,
    }
}
