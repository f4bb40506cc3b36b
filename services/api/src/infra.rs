use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use roster_engine::config::EvaluationSettings;
use roster_engine::scoring::ProfileSelection;
use roster_engine::{ConfigError, ProfilePreset, RuleSet, RuleSetConfig, ScoringCategorySchema};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) evaluation: Arc<EvaluationDefaults>,
}

/// Rule set, schema, and profile used when a request does not bring its own.
#[derive(Debug, Clone)]
pub(crate) struct EvaluationDefaults {
    pub(crate) rules: Option<RuleSet>,
    pub(crate) schema: ScoringCategorySchema,
    pub(crate) profile: ProfilePreset,
}

impl EvaluationDefaults {
    pub(crate) fn load(settings: &EvaluationSettings) -> Result<Self, ConfigError> {
        let rules = settings
            .rules_path
            .as_ref()
            .map(|path| RuleSetConfig::from_path(path).and_then(RuleSet::build))
            .transpose()?;
        let schema = match &settings.schema_path {
            Some(path) => ScoringCategorySchema::from_path(path)?,
            None => ScoringCategorySchema::standard(),
        };

        Self::new(rules, schema, settings.default_profile)
    }

    /// The default preset must satisfy the schema it will be scored under.
    pub(crate) fn new(
        rules: Option<RuleSet>,
        schema: ScoringCategorySchema,
        profile: ProfilePreset,
    ) -> Result<Self, ConfigError> {
        ProfileSelection::from(profile).resolve(&schema)?;
        Ok(Self {
            rules,
            schema,
            profile,
        })
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_paths_use_the_standard_schema() {
        let defaults = EvaluationDefaults::load(&EvaluationSettings {
            default_profile: ProfilePreset::C,
            rules_path: None,
            schema_path: None,
        })
        .expect("defaults load");

        assert!(defaults.rules.is_none());
        assert_eq!(defaults.profile, ProfilePreset::C);
        assert_eq!(defaults.schema, ScoringCategorySchema::standard());
    }

    #[test]
    fn default_preset_must_fit_the_schema() {
        let mut raw = serde_json::to_value(ScoringCategorySchema::standard()).expect("serializes");
        raw["maxShares"]["regularity"] = serde_json::json!(0.5);
        let schema = ScoringCategorySchema::from_json_str(&raw.to_string()).expect("schema valid");

        match EvaluationDefaults::new(None, schema.clone(), ProfilePreset::C) {
            Err(ConfigError::InvalidProfile(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected invalid profile, got {other:?}"),
        }
        assert!(EvaluationDefaults::new(None, schema, ProfilePreset::B).is_ok());
    }

    #[test]
    fn missing_rules_file_is_reported() {
        let result = EvaluationDefaults::load(&EvaluationSettings {
            default_profile: ProfilePreset::A,
            rules_path: Some("/nonexistent/rules.json".into()),
            schema_path: None,
        });

        match result {
            Err(ConfigError::Io { path, .. }) => {
                assert!(path.ends_with("rules.json"))
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn dates_parse_in_iso_format() {
        assert_eq!(
            parse_date(" 2025-09-06 "),
            Ok(NaiveDate::from_ymd_opt(2025, 9, 6).expect("valid date"))
        );
        assert!(parse_date("06/09/2025").is_err());
    }
}
