//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::error::{ApiError, EngineError};
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Engine(EngineError::ScenarioNotFound(_)) => StatusCode::NOT_FOUND,
      ApiError::MissingStartTarget
      | ApiError::Engine(EngineError::NoActiveScenario)
      | ApiError::Engine(EngineError::ChoiceNotFound(_)) => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, scenarios: state.catalog.len() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_scenarios(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out = list_scenarios(&state);
  info!(target: "scenario", count = out.scenarios.len(), "HTTP scenarios listed");
  Json(out)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_start(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartIn>,
) -> Result<Json<StartOut>, ApiError> {
  Ok(Json(start_scenario(&state, &body).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.choice_id))]
pub async fn http_post_choice(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChoiceIn>,
) -> Result<Json<SubmitOut>, ApiError> {
  let out = submit_choice(&state, &body.choice_id).await?;
  let complete = matches!(out, SubmitOut::Complete { .. });
  info!(target: "scenario", choice_id = %body.choice_id, %complete, "HTTP submit_choice evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(status(&state).await)
}
