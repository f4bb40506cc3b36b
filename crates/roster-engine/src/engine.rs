use serde::Serialize;

use crate::error::InputError;
use crate::roster::{ScheduleDraft, ScheduleMonth, StaffRegistry};
use crate::rules::RuleSet;
use crate::scoring::{self, ScoreResult, StrategyWeightProfile};
use crate::validation::{self, ValidationResult};

/// Validation and score for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEvaluation {
    pub feasible: bool,
    pub violations: ValidationResult,
    pub score: ScoreResult,
}

/// Evaluates candidate rosters under one rule set and one weight profile.
#[derive(Debug, Clone)]
pub struct RosterEvaluator {
    rules: RuleSet,
    profile: StrategyWeightProfile,
}

impl RosterEvaluator {
    pub fn new(rules: RuleSet, profile: StrategyWeightProfile) -> Self {
        Self { rules, profile }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn profile(&self) -> &StrategyWeightProfile {
        &self.profile
    }

    pub fn evaluate(
        &self,
        schedule: &ScheduleMonth,
        registry: &StaffRegistry,
    ) -> Result<RosterEvaluation, InputError> {
        let violations = validation::validate(schedule, &self.rules, registry)?;
        let score = scoring::score(schedule, registry, &self.profile)?;

        tracing::debug!(
            year = schedule.year(),
            month = schedule.month(),
            profile = %self.profile.name(),
            violations = violations.len(),
            weighted = score.weighted,
            "evaluated candidate roster"
        );

        Ok(RosterEvaluation {
            feasible: violations.is_feasible(),
            violations,
            score,
        })
    }

    pub fn evaluate_draft(
        &self,
        draft: &ScheduleDraft,
        registry: &StaffRegistry,
    ) -> Result<RosterEvaluation, InputError> {
        let schedule = draft.build(registry)?;
        self.evaluate(&schedule, registry)
    }

    /// Results keep the order of `candidates`.
    #[cfg(feature = "parallel")]
    pub fn evaluate_batch(
        &self,
        candidates: &[ScheduleMonth],
        registry: &StaffRegistry,
    ) -> Vec<Result<RosterEvaluation, InputError>> {
        use rayon::prelude::*;

        candidates
            .par_iter()
            .map(|candidate| self.evaluate(candidate, registry))
            .collect()
    }

    /// Results keep the order of `candidates`.
    #[cfg(not(feature = "parallel"))]
    pub fn evaluate_batch(
        &self,
        candidates: &[ScheduleMonth],
        registry: &StaffRegistry,
    ) -> Vec<Result<RosterEvaluation, InputError>> {
        candidates
            .iter()
            .map(|candidate| self.evaluate(candidate, registry))
            .collect()
    }
}
