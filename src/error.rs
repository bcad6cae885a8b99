//! Error types for catalog loading and engine operations.

use thiserror::Error;

/// Failure reading or parsing the scenario file. `Catalog::load` turns this into an
/// empty catalog; `Catalog::from_json_str` surfaces it.
#[derive(Error, Debug)]
pub enum CatalogError {
  #[error("cannot read scenario file: {0}")]
  Io(#[from] std::io::Error),

  #[error("malformed scenario file: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Engine failures. None of them touch the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
  #[error("{0}")]
  ScenarioNotFound(String),

  #[error("No active scenario")]
  NoActiveScenario,

  #[error("Choice not found: {0}")]
  ChoiceNotFound(String),
}

/// Failures surfaced to HTTP/WebSocket clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
  #[error("Must specify scenario_id, location, or random=true")]
  MissingStartTarget,

  #[error(transparent)]
  Engine(#[from] EngineError),
}
