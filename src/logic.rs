//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Listing the catalog
//!   - Starting a scenario (by id, by location, or at random)
//!   - Submitting a choice and shaping the follow-up / report
//!   - Reading the session status
//!
//! Every engine call takes the engine lock for its whole duration.

use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::protocol::{
  start_out, submit_out, summaries_out, ScenarioListOut, StartIn, StartOut, StatusOut, SubmitOut,
};
use crate::state::AppState;

#[instrument(level = "debug", skip(state))]
pub fn list_scenarios(state: &AppState) -> ScenarioListOut {
  summaries_out(state.catalog.list_summaries())
}

#[instrument(level = "info", skip(state))]
pub async fn start_scenario(state: &AppState, req: &StartIn) -> Result<StartOut, ApiError> {
  let target = req.target().ok_or(ApiError::MissingStartTarget)?;
  let mut engine = state.engine.lock().await;
  match engine.start_target(&target) {
    Ok(view) => {
      info!(target: "scenario", id = %view.scenario.id, attempt_id = %view.attempt_id, ?target, "Scenario served");
      Ok(start_out(&view))
    }
    Err(e) => {
      warn!(target: "scenario", ?target, error = %e, "Start rejected");
      Err(e.into())
    }
  }
}

#[instrument(level = "info", skip(state))]
pub async fn submit_choice(state: &AppState, choice_id: &str) -> Result<SubmitOut, ApiError> {
  let mut engine = state.engine.lock().await;
  match engine.submit_choice(choice_id) {
    Ok(outcome) => Ok(submit_out(outcome)),
    Err(e) => {
      warn!(target: "scenario", %choice_id, error = %e, "Choice rejected");
      Err(e.into())
    }
  }
}

#[instrument(level = "debug", skip(state))]
pub async fn status(state: &AppState) -> StatusOut {
  state.engine.lock().await.status().into()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  use tracing::{Event, Level, Subscriber};
  use tracing_subscriber::layer::{Context, SubscriberExt};
  use tracing_subscriber::Layer;

  use crate::catalog::Catalog;
  use crate::config::AppConfig;

  /// Counts INFO events on the `scenario` target.
  struct ScenarioInfoCounter(Arc<AtomicUsize>);

  impl<S: Subscriber> Layer<S> for ScenarioInfoCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
      let meta = event.metadata();
      if *meta.level() == Level::INFO && meta.target() == "scenario" {
        self.0.fetch_add(1, Ordering::SeqCst);
      }
    }
  }

  fn state() -> AppState {
    let cat = Catalog::from_json_str(
      r#"{"scenarios":[{"id":"s1","title":"t","description":"d","location":"office",
          "choices":[{"id":"a","text":"Cover","score":5,"correct":true}]}]}"#,
    )
    .unwrap();
    AppState::with_catalog(cat, AppConfig::default())
  }

  #[tokio::test]
  async fn start_logs_engine_line_and_one_boundary_line() {
    let st = state();
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(ScenarioInfoCounter(count.clone()));
    let _guard = tracing::subscriber::set_default(subscriber);

    let req = StartIn { scenario_id: Some("s1".into()), ..Default::default() };
    start_scenario(&st, &req).await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);

    let ws_msg = serde_json::from_str(r#"{"type":"start_scenario","scenario_id":"s1"}"#).unwrap();
    crate::routes::ws::handle_client_ws(ws_msg, &st).await;
    assert_eq!(count.load(Ordering::SeqCst), 4);
  }

  #[tokio::test]
  async fn missing_selector_is_rejected_before_locking() {
    let st = state();
    let err = start_scenario(&st, &StartIn::default()).await.unwrap_err();
    assert_eq!(err, ApiError::MissingStartTarget);
    assert!(!status(&st).await.has_active_scenario);
  }
}
