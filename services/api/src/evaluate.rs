use crate::error::AppError;
use crate::infra::{parse_date, EvaluationDefaults};
use chrono::NaiveDate;
use clap::Args;
use roster_engine::roster::{DraftDocument, RecordError, StaffCsvImporter, StaffRecord};
use roster_engine::scoring::ProfileSelection;
use roster_engine::{
    ProfilePreset, RosterEvaluation, RosterEvaluator, RuleSet, RuleSetConfig, ScheduleDraft,
    StaffRegistry, TermKey,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// One evaluation as submitted over HTTP.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EvaluationRequest {
    #[serde(default)]
    pub(crate) staff: Vec<StaffRecord>,
    /// Takes precedence over `staff` when present.
    #[serde(default)]
    pub(crate) staff_csv: Option<String>,
    #[serde(default)]
    pub(crate) rules: Option<RuleSetConfig>,
    /// Shift tokens resolve after parsing so unknown codes surface as input errors.
    pub(crate) schedule: DraftDocument,
    #[serde(default)]
    pub(crate) profile: Option<ProfileSelection>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EvaluationResponse {
    #[serde(flatten)]
    pub(crate) evaluation: RosterEvaluation,
    pub(crate) rejected_staff: Vec<RecordError>,
}

pub(crate) fn evaluate_request(
    request: EvaluationRequest,
    defaults: &EvaluationDefaults,
) -> Result<EvaluationResponse, AppError> {
    let EvaluationRequest {
        staff,
        staff_csv,
        rules,
        schedule,
        profile,
    } = request;

    let build = match staff_csv {
        Some(csv) => StaffCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?,
        None => StaffRegistry::build(staff),
    };
    let rules = match rules {
        Some(config) => RuleSet::build(config)?,
        None => defaults.rules.clone().ok_or(AppError::MissingRules)?,
    };
    let schedule = ScheduleDraft::try_from(schedule)?;
    let profile = profile
        .unwrap_or_else(|| defaults.profile.into())
        .resolve(&defaults.schema)?;

    let evaluator = RosterEvaluator::new(rules, profile);
    let evaluation = evaluator.evaluate_draft(&schedule, &build.registry)?;

    Ok(EvaluationResponse {
        evaluation,
        rejected_staff: build.rejected,
    })
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Staff export in CSV form
    #[arg(long)]
    pub(crate) staff: PathBuf,
    /// Rule set JSON (defaults to ROSTER_RULES_PATH)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Candidate schedule JSON
    #[arg(long)]
    pub(crate) schedule: PathBuf,
    /// Preset profile to score with (defaults to ROSTER_PROFILE)
    #[arg(long, conflicts_with = "weights")]
    pub(crate) profile: Option<ProfilePreset>,
    /// Custom weight map JSON, validated against the scoring schema
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
    /// Extra holiday (YYYY-MM-DD); may be repeated
    #[arg(long = "holiday", value_parser = parse_date)]
    pub(crate) holidays: Vec<NaiveDate>,
    /// Print the full evaluation as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(
    args: EvaluateArgs,
    defaults: &EvaluationDefaults,
) -> Result<(), AppError> {
    let EvaluateArgs {
        staff,
        rules,
        schedule,
        profile,
        weights,
        holidays,
        json,
    } = args;

    let rules = rules.map(RuleSetConfig::from_path).transpose()?;
    let mut document = DraftDocument::from_json_str(&read(&schedule)?)?;
    document.holidays.extend(holidays);
    let profile = match weights {
        Some(path) => ProfileSelection::Custom {
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned()),
            weights: serde_json::from_str::<BTreeMap<TermKey, f64>>(&read(&path)?)?,
        },
        None => profile.unwrap_or(defaults.profile).into(),
    };

    let response = evaluate_request(
        EvaluationRequest {
            staff: Vec::new(),
            staff_csv: Some(read(&staff)?),
            rules,
            schedule: document,
            profile: Some(profile),
        },
        defaults,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for rejected in &response.rejected_staff {
            eprintln!("skipped {rejected}");
        }
        render(&response.evaluation);
    }
    Ok(())
}

pub(crate) fn run_profiles(defaults: &EvaluationDefaults) {
    for preset in ProfilePreset::ALL {
        let marker = if preset == defaults.profile { "*" } else { " " };
        println!("{marker} {preset}  {}", preset.description());
        let profile = preset.profile();
        for term in TermKey::ALL {
            println!("      {:<13}{:>6.1}", term.as_str(), profile.weight(term));
        }
    }
}

fn read(path: &Path) -> Result<String, AppError> {
    Ok(std::fs::read_to_string(path)?)
}

fn render(evaluation: &RosterEvaluation) {
    let verdict = if evaluation.feasible {
        "feasible"
    } else {
        "infeasible"
    };
    println!(
        "Roster is {verdict} ({} violations)",
        evaluation.violations.len()
    );
    for (kind, count) in evaluation.violations.count_by_kind() {
        println!("  {kind:<28}{count:>4}");
    }
    for violation in evaluation.violations.violations() {
        println!("  - {violation}");
    }

    println!("\nScore under profile {}", evaluation.score.profile);
    for component in &evaluation.score.components {
        println!(
            "  {:<13} metric {:>8.3}  weight {:>5.1}  contribution {:>8.3}",
            component.term.as_str(),
            component.metric,
            component.weight,
            component.contribution
        );
    }
    println!("  weighted {:>.3}", evaluation.score.weighted);
}
