//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quake_drill", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quake_drill", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "quake_drill", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "quake_drill", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "quake_drill", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::ListScenarios => ServerWsMessage::Scenarios(list_scenarios(state)),

    ClientWsMessage::StartScenario(req) => match start_scenario(state, &req).await {
      Ok(out) => ServerWsMessage::Scenario(out),
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::SubmitChoice { choice_id } => match submit_choice(state, &choice_id).await {
      Ok(out) => ServerWsMessage::ChoiceOutcome(out),
      Err(e) => ServerWsMessage::Error { message: e.to_string() },
    },

    ClientWsMessage::Status => ServerWsMessage::Status(status(state).await),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::config::AppConfig;

  fn state() -> AppState {
    let cat = Catalog::from_json_str(
      r#"{"scenarios":[{"id":"s1","title":"t","description":"d","location":"mall",
          "choices":[{"id":"a","text":"Cover","score":5,"correct":true,"explanation":"ok"}]}]}"#,
    )
    .unwrap();
    AppState::with_catalog(cat, AppConfig::default())
  }

  #[tokio::test]
  async fn ws_flow_runs_a_scenario() {
    let st = state();
    let msg = |s: &str| serde_json::from_str::<ClientWsMessage>(s).unwrap();

    let out = handle_client_ws(msg(r#"{"type":"start_scenario","scenario_id":"s1"}"#), &st).await;
    assert!(matches!(out, ServerWsMessage::Scenario(ref s) if s.scenario.id == "s1"));

    let out = handle_client_ws(msg(r#"{"type":"submit_choice","choice_id":"a"}"#), &st).await;
    let v = serde_json::to_value(&out).unwrap();
    assert_eq!(v["type"], "choice_outcome");
    assert_eq!(v["scenario_complete"], true);
    assert_eq!(v["results"]["performance"], "excellent");

    let out = handle_client_ws(msg(r#"{"type":"submit_choice","choice_id":"a"}"#), &st).await;
    assert!(matches!(out, ServerWsMessage::Error { ref message } if message == "No active scenario"));
  }
}
