//! Scenario catalog: loaded once from the scenario file, read-only afterwards.
//!
//! A missing or malformed file yields an empty catalog so the service still starts;
//! the failure is logged and every start request then reports "not found".

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::domain::{Difficulty, Scenario, ScenarioRecord, ScoringRecord, ScoringThresholds};
use crate::error::CatalogError;

/// Top-level layout of the scenario file.
#[derive(Debug, Deserialize, Default)]
struct CatalogFile {
  #[serde(default)]
  scenarios: Vec<ScenarioRecord>,
  #[serde(default)]
  scoring: Option<ScoringRecord>,
}

/// Listing entry; difficulty is derived from the scenario shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioSummary {
  pub id: String,
  pub title: String,
  pub description: String,
  pub location: String,
  pub difficulty: Difficulty,
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
  scenarios: Vec<Scenario>,
  by_id: HashMap<String, usize>,
  thresholds: ScoringThresholds,
}

impl Catalog {
  /// Read and parse `path`, degrading to an empty catalog on any failure.
  #[instrument(level = "info", skip_all)]
  pub fn load(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    let parsed = std::fs::read_to_string(path)
      .map_err(CatalogError::from)
      .and_then(|s| Self::from_json_str(&s));
    match parsed {
      Ok(cat) => {
        info!(target: "scenario", path = %path.display(), scenarios = cat.len(), "Loaded scenario catalog");
        cat
      }
      Err(e) => {
        error!(target: "scenario", path = %path.display(), error = %e, "Scenario catalog unavailable; starting with an empty catalog");
        Self::default()
      }
    }
  }

  pub fn from_json_str(s: &str) -> Result<Self, CatalogError> {
    let file: CatalogFile = serde_json::from_str(s)?;
    let thresholds = file
      .scoring
      .as_ref()
      .map(|rec| ScoringThresholds::default().with_overrides(rec))
      .unwrap_or_default();
    Ok(Self::from_records(file.scenarios, thresholds))
  }

  /// Build from already-parsed records. First occurrence of an id wins.
  pub fn from_records(records: Vec<ScenarioRecord>, thresholds: ScoringThresholds) -> Self {
    let mut scenarios = Vec::with_capacity(records.len());
    let mut by_id = HashMap::new();
    for rec in records {
      if by_id.contains_key(&rec.id) {
        warn!(target: "scenario", id = %rec.id, "Skipping duplicate scenario id");
        continue;
      }
      let sc = Scenario::from(rec);
      warn_duplicate_choice_ids(&sc);
      by_id.insert(sc.id.clone(), scenarios.len());
      scenarios.push(sc);
    }
    Self { scenarios, by_id, thresholds }
  }

  pub fn with_thresholds(mut self, thresholds: ScoringThresholds) -> Self {
    self.thresholds = thresholds;
    self
  }

  pub fn len(&self) -> usize { self.scenarios.len() }

  pub fn is_empty(&self) -> bool { self.scenarios.is_empty() }

  pub fn thresholds(&self) -> &ScoringThresholds { &self.thresholds }

  pub fn list_summaries(&self) -> Vec<ScenarioSummary> {
    self.scenarios
      .iter()
      .map(|s| ScenarioSummary {
        id: s.id.clone(),
        title: s.title.clone(),
        description: s.description.clone(),
        location: s.location_label().to_string(),
        difficulty: s.difficulty(),
      })
      .collect()
  }

  pub fn find(&self, id: &str) -> Option<&Scenario> {
    self.by_id.get(id).map(|&i| &self.scenarios[i])
  }

  /// Case-insensitive exact match; scenarios without a tag never match.
  pub fn find_by_location(&self, tag: &str) -> Vec<&Scenario> {
    let wanted = tag.to_lowercase();
    self.scenarios
      .iter()
      .filter(|s| s.location_tag.as_deref().map(str::to_lowercase).as_deref() == Some(wanted.as_str()))
      .collect()
  }

  pub fn random_pick(&self) -> Option<&Scenario> {
    self.random_pick_with(&mut rand::thread_rng())
  }

  pub fn random_pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Scenario> {
    self.scenarios.choose(rng)
  }

  pub fn random_pick_by_location(&self, tag: &str) -> Option<&Scenario> {
    self.random_pick_by_location_with(tag, &mut rand::thread_rng())
  }

  pub fn random_pick_by_location_with<R: Rng + ?Sized>(&self, tag: &str, rng: &mut R) -> Option<&Scenario> {
    self.find_by_location(tag).choose(rng).copied()
  }
}

fn warn_duplicate_choice_ids(sc: &Scenario) {
  for (list, choices) in [("choices", &sc.choices), ("follow_up_choices", &sc.follow_up_choices)] {
    let mut seen = HashSet::new();
    for c in choices {
      if !seen.insert(c.id.as_str()) {
        warn!(target: "scenario", scenario = %sc.id, choice = %c.id, %list, "Duplicate choice id; only the first is reachable");
      }
    }
  }
}
