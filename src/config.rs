//! Loading service configuration (scenario file location, static dir, scoring overrides)
//! from TOML.
//!
//! Example:
//! ```toml
//! scenarios_path = "data/scenarios.json"
//! static_dir = "./static"
//!
//! [scoring.excellent]
//! min_score = 95
//! ```

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::ScoringRecord;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_scenarios_path")]
  pub scenarios_path: String,
  #[serde(default = "default_static_dir")]
  pub static_dir: String,
  /// Applied on top of the thresholds shipped with the scenario file.
  #[serde(default)]
  pub scoring: Option<ScoringRecord>,
}

fn default_scenarios_path() -> String { "data/scenarios.json".into() }
fn default_static_dir() -> String { "./static".into() }

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      scenarios_path: default_scenarios_path(),
      static_dir: default_static_dir(),
      scoring: None,
    }
  }
}

impl AppConfig {
  /// Config file from DRILL_CONFIG_PATH (or defaults), then SCENARIOS_PATH on top.
  pub fn from_env() -> Self {
    let mut cfg = load_config_from_env().unwrap_or_default();
    if let Ok(p) = std::env::var("SCENARIOS_PATH") {
      if !p.is_empty() {
        cfg.scenarios_path = p;
      }
    }
    cfg
  }
}

pub fn parse_config(s: &str) -> Result<AppConfig, toml::de::Error> {
  toml::from_str::<AppConfig>(s)
}

/// Attempt to load `AppConfig` from DRILL_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("DRILL_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "quake_drill", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quake_drill", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quake_drill", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
