use crate::error::AppError;
use crate::evaluate::{evaluate_request, EvaluationRequest, EvaluationResponse};
use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use roster_engine::scoring::{validate_profile, ProfileError};
use roster_engine::{ProfilePreset, TermKey};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileValidationRequest {
    #[serde(default)]
    pub(crate) name: Option<String>,
    pub(crate) weights: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PresetView {
    pub(crate) name: ProfilePreset,
    pub(crate) description: &'static str,
    pub(crate) weights: BTreeMap<TermKey, f64>,
    pub(crate) default: bool,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/roster/evaluate", post(evaluate_endpoint))
        .route("/api/v1/profiles", get(profiles_endpoint))
        .route("/api/v1/profiles/validate", post(validate_profile_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn evaluate_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResponse>, AppError> {
    let response = evaluate_request(request, &state.evaluation)?;
    tracing::info!(
        feasible = response.evaluation.feasible,
        violations = response.evaluation.violations.len(),
        rejected_staff = response.rejected_staff.len(),
        "roster evaluated"
    );
    Ok(Json(response))
}

pub(crate) async fn profiles_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<PresetView>> {
    let presets = ProfilePreset::ALL
        .into_iter()
        .map(|preset| PresetView {
            name: preset,
            description: preset.description(),
            weights: preset.profile().weights().clone(),
            default: preset == state.evaluation.profile,
        })
        .collect();
    Json(presets)
}

/// Unknown term names are reported alongside schema violations.
pub(crate) async fn validate_profile_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<ProfileValidationRequest>,
) -> impl IntoResponse {
    let mut errors = Vec::new();
    let mut weights = BTreeMap::new();
    for (raw, weight) in request.weights {
        match raw.parse::<TermKey>() {
            Ok(term) => {
                weights.insert(term, weight);
            }
            Err(error) => errors.push(error),
        }
    }
    if let Err(found) = validate_profile(&weights, &state.evaluation.schema) {
        errors.extend(found);
    }

    let name = request.name.unwrap_or_else(|| "custom".to_string());
    if errors.is_empty() {
        (
            StatusCode::OK,
            Json(json!({ "valid": true, "name": name })),
        )
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "valid": false, "name": name, "errors": errors_json(&errors) })),
        )
    }
}

fn errors_json(errors: &[ProfileError]) -> Vec<serde_json::Value> {
    errors
        .iter()
        .map(|error| {
            let mut value = serde_json::to_value(error).unwrap_or_else(|_| json!({}));
            if let Some(object) = value.as_object_mut() {
                object.insert("message".to_string(), json!(error.to_string()));
            }
            value
        })
        .collect()
}
