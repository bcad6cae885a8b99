//! Scenario engine: one explicit session plus the catalog it draws from.
//!
//! States: idle → awaiting main choice → (awaiting follow-up) → idle. Completing a
//! scenario or starting another one resets the session. Failed operations leave the
//! session untouched.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::domain::{percentage, Choice, Location, PerformanceTier, Scenario};
use crate::error::EngineError;
use crate::lessons::lessons_for;

/// How the caller picks the scenario to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartTarget {
  Id(String),
  Location(String),
  Random,
}

/// In-progress attempt. Empty (`Default`) while idle.
#[derive(Clone, Debug, Default)]
pub struct Session {
  pub attempt_id: Option<Uuid>,
  pub active: Option<Scenario>,
  pub choices_made: Vec<String>,
  pub score: i64,
  pub max_score: i64,
  pub feedback: Vec<String>,
}

impl Session {
  fn begin(scenario: &Scenario, attempt_id: Uuid) -> Self {
    Self {
      attempt_id: Some(attempt_id),
      max_score: scenario.max_score(),
      active: Some(scenario.clone()),
      ..Self::default()
    }
  }
}

/// Shown when a scenario starts: metadata and the main choices, without scores,
/// correctness or explanations.
#[derive(Clone, Debug)]
pub struct ScenarioView {
  pub scenario: Scenario,
  pub attempt_id: Uuid,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChoiceResult {
  pub correct: bool,
  pub explanation: String,
  pub score: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FollowUp {
  pub question: String,
  pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
  pub attempt_id: Option<Uuid>,
  pub scenario_id: String,
  pub choices: Vec<String>,
  pub score: i64,
  pub max_score: i64,
  pub percentage: f64,
  pub performance: PerformanceTier,
  pub feedback: Vec<String>,
  pub lessons_learned: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
  FollowUp { result: ChoiceResult, follow_up: FollowUp },
  Completed(Report),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
  pub has_active: bool,
  pub score: i64,
  pub max_score: i64,
  pub choices_made: usize,
}

pub struct ScenarioEngine {
  catalog: Arc<Catalog>,
  session: Session,
}

impl ScenarioEngine {
  pub fn new(catalog: Arc<Catalog>) -> Self {
    Self { catalog, session: Session::default() }
  }

  pub fn start_target(&mut self, target: &StartTarget) -> Result<ScenarioView, EngineError> {
    match target {
      StartTarget::Id(id) => self.start(id),
      StartTarget::Location(tag) => self.start_by_location(tag),
      StartTarget::Random => self.start_random(),
    }
  }

  /// Start `scenario_id`, discarding any unfinished attempt.
  #[instrument(level = "info", skip(self))]
  pub fn start(&mut self, scenario_id: &str) -> Result<ScenarioView, EngineError> {
    let scenario = self
      .catalog
      .find(scenario_id)
      .cloned()
      .ok_or_else(|| EngineError::ScenarioNotFound("Scenario not found".into()))?;
    Ok(self.begin(scenario))
  }

  #[instrument(level = "info", skip(self))]
  pub fn start_by_location(&mut self, location: &str) -> Result<ScenarioView, EngineError> {
    let scenario = self
      .catalog
      .random_pick_by_location(location)
      .cloned()
      .ok_or_else(|| EngineError::ScenarioNotFound(format!("No scenarios available for location: {location}")))?;
    Ok(self.begin(scenario))
  }

  #[instrument(level = "info", skip(self))]
  pub fn start_random(&mut self) -> Result<ScenarioView, EngineError> {
    let scenario = self
      .catalog
      .random_pick()
      .cloned()
      .ok_or_else(|| EngineError::ScenarioNotFound("No scenarios available".into()))?;
    Ok(self.begin(scenario))
  }

  fn begin(&mut self, scenario: Scenario) -> ScenarioView {
    if let Some(prev) = &self.session.active {
      debug!(target: "scenario", discarded = %prev.id, choices_made = self.session.choices_made.len(), "Discarding unfinished scenario");
    }
    let attempt_id = Uuid::new_v4();
    self.session = Session::begin(&scenario, attempt_id);
    info!(target: "scenario", scenario_id = %scenario.id, %attempt_id, max_score = self.session.max_score, "Scenario started");
    ScenarioView { scenario, attempt_id }
  }

  /// Record a choice. Ids are looked up in the main choices first, then in the
  /// follow-up choices, so either list is accepted at any step.
  #[instrument(level = "info", skip(self))]
  pub fn submit_choice(&mut self, choice_id: &str) -> Result<SubmitOutcome, EngineError> {
    let scenario = self.session.active.as_ref().ok_or(EngineError::NoActiveScenario)?;
    let choice = scenario
      .find_choice(choice_id)
      .cloned()
      .ok_or_else(|| EngineError::ChoiceNotFound(choice_id.to_string()))?;

    let follow_up = scenario.follow_up.clone();
    let follow_up_choices = scenario.follow_up_choices.clone();

    self.session.choices_made.push(choice.id.clone());
    self.session.score += choice.score;
    self.session.feedback.push(choice.explanation.clone());
    debug!(target: "scenario", %choice_id, points = choice.score, score = self.session.score, "Choice recorded");

    match follow_up {
      Some(question) if self.session.choices_made.len() == 1 => Ok(SubmitOutcome::FollowUp {
        result: ChoiceResult { correct: choice.correct, explanation: choice.explanation, score: choice.score },
        follow_up: FollowUp { question, choices: follow_up_choices },
      }),
      _ => Ok(SubmitOutcome::Completed(self.complete())),
    }
  }

  /// Build the report and reset to idle.
  fn complete(&mut self) -> Report {
    let session = std::mem::take(&mut self.session);
    let (scenario_id, location) = session
      .active
      .as_ref()
      .map(|s| (s.id.clone(), s.location))
      .unwrap_or_else(|| (String::new(), Location::Other));
    let pct = percentage(session.score, session.max_score);
    let performance = self.catalog.thresholds().tier(pct);
    info!(
      target: "scenario",
      %scenario_id,
      attempt_id = ?session.attempt_id,
      score = session.score,
      max_score = session.max_score,
      percentage = pct,
      ?performance,
      "Scenario complete"
    );
    Report {
      attempt_id: session.attempt_id,
      scenario_id,
      choices: session.choices_made,
      score: session.score,
      max_score: session.max_score,
      percentage: pct,
      performance,
      feedback: session.feedback,
      lessons_learned: lessons_for(location),
    }
  }

  pub fn status(&self) -> Status {
    Status {
      has_active: self.session.active.is_some(),
      score: self.session.score,
      max_score: self.session.max_score,
      choices_made: self.session.choices_made.len(),
    }
  }
}
