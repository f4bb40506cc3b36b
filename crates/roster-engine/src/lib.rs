//! Constraint validation and multi-objective scoring for monthly duty rosters.
//!
//! The engine never proposes schedules. It certifies a candidate against a
//! [`RuleSet`] and ranks it with a [`StrategyWeightProfile`].

pub mod config;
pub mod engine;
pub mod error;
pub mod roster;
pub mod rules;
pub mod scoring;
pub mod telemetry;
pub mod validation;

pub use engine::{RosterEvaluation, RosterEvaluator};
pub use error::{ConfigError, InputError};
pub use roster::{
    PreScheduleRequest, ScheduleDraft, ScheduleMonth, ShiftCode, Staff, StaffId, StaffRegistry,
};
pub use rules::{RuleSet, RuleSetConfig};
pub use scoring::{
    MultiObjectiveScorer, ProfilePreset, ScoreResult, ScoringCategorySchema,
    StrategyWeightProfile, TermKey,
};
pub use validation::{ConstraintValidator, ValidationResult, Violation, ViolationKind};

#[cfg(test)]
mod tests;
