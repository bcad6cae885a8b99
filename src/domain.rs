//! Domain models: scenarios, choices, location tags, difficulty and performance tiers.
//!
//! Records are deserialized from the scenario file as `ScenarioRecord` and resolved
//! once into `Scenario`, so optional fields never need a fallback at access time.

use serde::{Deserialize, Serialize};

/// A selectable action inside a scenario.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Choice {
  pub id: String,
  pub text: String,
  #[serde(default)] pub score: i64,
  #[serde(default)] pub correct: bool,
  #[serde(default)] pub explanation: String,
}

/// Location tags with dedicated lesson sets. Anything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
  Apartment,
  Office,
  School,
  Mall,
  Other,
}

impl Location {
  /// Exact (case-sensitive) match on the raw tag.
  pub fn from_tag(tag: &str) -> Self {
    match tag {
      "apartment" => Location::Apartment,
      "office" => Location::Office,
      "school" => Location::School,
      "mall" => Location::Mall,
      _ => Location::Other,
    }
  }
}

/// Derived, never stored in the scenario file.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Beginner,
  Intermediate,
  Advanced,
}

/// Named bucket for the percentage of the achievable score.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
  Excellent,
  Good,
  NeedsImprovement,
  Dangerous,
}

/// Scenario entry as written in the scenario file.
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioRecord {
  pub id: String,
  pub title: String,
  pub description: String,
  #[serde(default)] pub location: Option<String>,
  #[serde(default)] pub magnitude: Option<serde_json::Value>,
  #[serde(default)] pub time: Option<serde_json::Value>,
  #[serde(default)] pub choices: Vec<Choice>,
  #[serde(default)] pub follow_up: Option<String>,
  #[serde(default)] pub follow_up_choices: Vec<Choice>,
}

/// Resolved scenario definition held by the catalog.
#[derive(Clone, Debug)]
pub struct Scenario {
  pub id: String,
  pub title: String,
  pub description: String,
  /// Raw tag as written, `None` when the file omits it.
  pub location_tag: Option<String>,
  pub location: Location,
  /// Display metadata only; kept as-is (files use both numbers and strings).
  pub magnitude: Option<serde_json::Value>,
  pub time: Option<serde_json::Value>,
  pub choices: Vec<Choice>,
  pub follow_up: Option<String>,
  pub follow_up_choices: Vec<Choice>,
}

impl From<ScenarioRecord> for Scenario {
  fn from(r: ScenarioRecord) -> Self {
    let location = r.location.as_deref().map(Location::from_tag).unwrap_or(Location::Other);
    Self {
      id: r.id,
      title: r.title,
      description: r.description,
      location_tag: r.location,
      location,
      magnitude: r.magnitude,
      time: r.time,
      choices: r.choices,
      follow_up: r.follow_up,
      follow_up_choices: r.follow_up_choices,
    }
  }
}

impl Scenario {
  pub fn has_follow_up(&self) -> bool {
    self.follow_up.is_some()
  }

  /// Checks are ordered: a follow-up lifts a two-choice scenario to intermediate,
  /// and a three-choice scenario stays intermediate with or without one.
  pub fn difficulty(&self) -> Difficulty {
    let n = self.choices.len();
    if n <= 2 && !self.has_follow_up() {
      Difficulty::Beginner
    } else if n <= 3 || self.has_follow_up() {
      Difficulty::Intermediate
    } else {
      Difficulty::Advanced
    }
  }

  /// Sum over main and follow-up choices.
  pub fn max_score(&self) -> i64 {
    self.choices.iter().chain(self.follow_up_choices.iter()).map(|c| c.score).sum()
  }

  /// Main and follow-up choices share one id namespace: main choices are searched
  /// first and the first match wins.
  pub fn find_choice(&self, choice_id: &str) -> Option<&Choice> {
    self.choices
      .iter()
      .chain(self.follow_up_choices.iter())
      .find(|c| c.id == choice_id)
  }

  /// Tag shown in listings.
  pub fn location_label(&self) -> &str {
    self.location_tag.as_deref().unwrap_or("unknown")
  }
}

/// Minimum percentage per tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoringThresholds {
  pub excellent: f64,
  pub good: f64,
  pub needs_improvement: f64,
}

impl Default for ScoringThresholds {
  fn default() -> Self {
    Self { excellent: 90.0, good: 70.0, needs_improvement: 50.0 }
  }
}

impl ScoringThresholds {
  pub fn tier(&self, percentage: f64) -> PerformanceTier {
    if percentage >= self.excellent {
      PerformanceTier::Excellent
    } else if percentage >= self.good {
      PerformanceTier::Good
    } else if percentage >= self.needs_improvement {
      PerformanceTier::NeedsImprovement
    } else {
      PerformanceTier::Dangerous
    }
  }

  /// Overlay the tiers present in `rec`; missing tiers keep their current value.
  pub fn with_overrides(mut self, rec: &ScoringRecord) -> Self {
    if let Some(v) = rec.excellent.as_ref().and_then(|t| t.min_score) { self.excellent = v; }
    if let Some(v) = rec.good.as_ref().and_then(|t| t.min_score) { self.good = v; }
    if let Some(v) = rec.needs_improvement.as_ref().and_then(|t| t.min_score) { self.needs_improvement = v; }
    self
  }
}

/// `scoring` section as written in data files: `{ "excellent": { "min_score": 90 } }`.
/// Shared by the JSON scenario file and the TOML config override.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ScoringRecord {
  #[serde(default)] pub excellent: Option<TierRecord>,
  #[serde(default)] pub good: Option<TierRecord>,
  #[serde(default)] pub needs_improvement: Option<TierRecord>,
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TierRecord {
  #[serde(default)] pub min_score: Option<f64>,
}

/// Percentage of the achievable score; 0 when nothing is achievable.
pub fn percentage(score: i64, max_score: i64) -> f64 {
  if max_score == 0 {
    0.0
  } else {
    100.0 * score as f64 / max_score as f64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn choice(id: &str, score: i64) -> Choice {
    Choice { id: id.into(), text: id.into(), score, correct: score > 0, explanation: String::new() }
  }

  fn scenario(n_choices: usize, follow_up: bool) -> Scenario {
    Scenario {
      id: "s".into(),
      title: "t".into(),
      description: "d".into(),
      location_tag: None,
      location: Location::Other,
      magnitude: None,
      time: None,
      choices: (0..n_choices).map(|i| choice(&format!("c{i}"), 1)).collect(),
      follow_up: follow_up.then(|| "next?".to_string()),
      follow_up_choices: Vec::new(),
    }
  }

  #[test]
  fn difficulty_follows_ordered_rule() {
    assert_eq!(scenario(2, false).difficulty(), Difficulty::Beginner);
    assert_eq!(scenario(2, true).difficulty(), Difficulty::Intermediate);
    assert_eq!(scenario(3, false).difficulty(), Difficulty::Intermediate);
    assert_eq!(scenario(3, true).difficulty(), Difficulty::Intermediate);
    assert_eq!(scenario(4, false).difficulty(), Difficulty::Advanced);
    assert_eq!(scenario(5, true).difficulty(), Difficulty::Intermediate);
  }

  #[test]
  fn main_choices_win_on_shared_id() {
    let mut s = scenario(0, true);
    s.choices = vec![choice("a", 10)];
    s.follow_up_choices = vec![choice("a", -5), choice("b", 3)];
    assert_eq!(s.find_choice("a").map(|c| c.score), Some(10));
    assert_eq!(s.find_choice("b").map(|c| c.score), Some(3));
    assert!(s.find_choice("z").is_none());
    assert_eq!(s.max_score(), 8);
  }

  #[test]
  fn tiers_use_inclusive_minimums() {
    let t = ScoringThresholds::default();
    assert_eq!(t.tier(100.0), PerformanceTier::Excellent);
    assert_eq!(t.tier(90.0), PerformanceTier::Excellent);
    assert_eq!(t.tier(89.9), PerformanceTier::Good);
    assert_eq!(t.tier(70.0), PerformanceTier::Good);
    assert_eq!(t.tier(50.0), PerformanceTier::NeedsImprovement);
    assert_eq!(t.tier(49.0), PerformanceTier::Dangerous);
    assert_eq!(t.tier(-20.0), PerformanceTier::Dangerous);
  }

  #[test]
  fn overrides_keep_missing_tiers() {
    let rec = ScoringRecord {
      good: Some(TierRecord { min_score: Some(60.0) }),
      ..Default::default()
    };
    let t = ScoringThresholds::default().with_overrides(&rec);
    assert_eq!(t, ScoringThresholds { excellent: 90.0, good: 60.0, needs_improvement: 50.0 });
  }

  #[test]
  fn percentage_guards_zero_max() {
    assert_eq!(percentage(5, 0), 0.0);
    assert_eq!(percentage(10, 10), 100.0);
    assert_eq!(percentage(5, 20), 25.0);
  }

  #[test]
  fn location_tags_are_exact() {
    assert_eq!(Location::from_tag("office"), Location::Office);
    assert_eq!(Location::from_tag("Office"), Location::Other);
    assert_eq!(Location::from_tag("beach"), Location::Other);
  }
}
