//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ScenarioSummary;
use crate::domain::{Choice, Difficulty, PerformanceTier};
use crate::engine::{Report, ScenarioView, StartTarget, Status, SubmitOutcome};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    ListScenarios,
    StartScenario(StartIn),
    SubmitChoice {
        choice_id: String,
    },
    Status,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Scenarios(ScenarioListOut),
    Scenario(StartOut),
    ChoiceOutcome(SubmitOut),
    Status(StatusOut),
    Error {
        message: String,
    },
}

//
// Catalog listing
//

#[derive(Debug, Serialize)]
pub struct SummaryOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub struct ScenarioListOut {
    pub scenarios: Vec<SummaryOut>,
}

pub fn summaries_out(summaries: Vec<ScenarioSummary>) -> ScenarioListOut {
    ScenarioListOut {
        scenarios: summaries
            .into_iter()
            .map(|s| SummaryOut {
                id: s.id,
                title: s.title,
                description: s.description,
                location: s.location,
                difficulty: s.difficulty,
            })
            .collect(),
    }
}

//
// Start
//

/// Exactly one selector is used: `random` wins over `location`, which wins over `scenario_id`.
#[derive(Debug, Deserialize, Default)]
pub struct StartIn {
    #[serde(default)]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub random: bool,
}

impl StartIn {
    pub fn target(&self) -> Option<StartTarget> {
        if self.random {
            Some(StartTarget::Random)
        } else if let Some(loc) = self.location.as_ref().filter(|l| !l.is_empty()) {
            Some(StartTarget::Location(loc.clone()))
        } else {
            self.scenario_id
                .as_ref()
                .filter(|id| !id.is_empty())
                .map(|id| StartTarget::Id(id.clone()))
        }
    }
}

/// Choice as shown to the player: no score, correctness or explanation.
#[derive(Debug, Serialize)]
pub struct ChoiceOut {
    pub id: String,
    pub text: String,
}

fn choices_out(choices: &[Choice]) -> Vec<ChoiceOut> {
    choices
        .iter()
        .map(|c| ChoiceOut { id: c.id.clone(), text: c.text.clone() })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ScenarioInfoOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub magnitude: Option<serde_json::Value>,
    pub time: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct StartOut {
    pub attempt_id: Uuid,
    pub scenario: ScenarioInfoOut,
    pub choices: Vec<ChoiceOut>,
}

pub fn start_out(view: &ScenarioView) -> StartOut {
    let s = &view.scenario;
    StartOut {
        attempt_id: view.attempt_id,
        scenario: ScenarioInfoOut {
            id: s.id.clone(),
            title: s.title.clone(),
            description: s.description.clone(),
            location: s.location_tag.clone(),
            magnitude: s.magnitude.clone(),
            time: s.time.clone(),
        },
        choices: choices_out(&s.choices),
    }
}

//
// Submit
//

#[derive(Debug, Deserialize)]
pub struct ChoiceIn {
    pub choice_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChoiceResultOut {
    pub correct: bool,
    pub explanation: String,
    pub score: i64,
}

#[derive(Debug, Serialize)]
pub struct FollowUpOut {
    pub question: String,
    pub choices: Vec<ChoiceOut>,
}

#[derive(Debug, Serialize)]
pub struct ResultsOut {
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

impl From<Report> for ResultsOut {
    fn from(r: Report) -> Self {
        Self {
            attempt_id: r.attempt_id,
            scenario_id: r.scenario_id,
            choices: r.choices,
            score: r.score,
            max_score: r.max_score,
            percentage: r.percentage,
            performance: r.performance,
            feedback: r.feedback,
            lessons_learned: r.lessons_learned,
        }
    }
}

/// Either a follow-up prompt or the final report; the shape tells the client which.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SubmitOut {
    FollowUp {
        choice_result: ChoiceResultOut,
        follow_up: FollowUpOut,
    },
    Complete {
        scenario_complete: bool,
        results: ResultsOut,
    },
}

pub fn submit_out(outcome: SubmitOutcome) -> SubmitOut {
    match outcome {
        SubmitOutcome::FollowUp { result, follow_up } => SubmitOut::FollowUp {
            choice_result: ChoiceResultOut {
                correct: result.correct,
                explanation: result.explanation,
                score: result.score,
            },
            follow_up: FollowUpOut {
                question: follow_up.question,
                choices: choices_out(&follow_up.choices),
            },
        },
        SubmitOutcome::Completed(report) => SubmitOut::Complete {
            scenario_complete: true,
            results: report.into(),
        },
    }
}

//
// Status / health
//

#[derive(Debug, Serialize)]
pub struct StatusOut {
    pub has_active_scenario: bool,
    pub current_score: i64,
    pub max_score: i64,
    pub choices_made: usize,
}

impl From<Status> for StatusOut {
    fn from(s: Status) -> Self {
        Self {
            has_active_scenario: s.has_active,
            current_score: s.score,
            max_score: s.max_score,
            choices_made: s.choices_made,
        }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub scenarios: usize,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_in(json: &str) -> StartIn {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn start_selector_precedence() {
        assert_eq!(
            start_in(r#"{"scenario_id":"s1","location":"office","random":true}"#).target(),
            Some(StartTarget::Random)
        );
        assert_eq!(
            start_in(r#"{"scenario_id":"s1","location":"office"}"#).target(),
            Some(StartTarget::Location("office".into()))
        );
        assert_eq!(start_in(r#"{"scenario_id":"s1"}"#).target(), Some(StartTarget::Id("s1".into())));
        assert_eq!(start_in("{}").target(), None);
        assert_eq!(start_in(r#"{"scenario_id":""}"#).target(), None);
    }

    #[test]
    fn ws_messages_use_type_tag() {
        let msg: ClientWsMessage = serde_json::from_str(r#"{"type":"start_scenario","location":"mall"}"#).unwrap();
        match msg {
            ClientWsMessage::StartScenario(s) => assert_eq!(s.target(), Some(StartTarget::Location("mall".into()))),
            other => panic!("unexpected {other:?}"),
        }
        let out = serde_json::to_value(ServerWsMessage::Status(StatusOut {
            has_active_scenario: false,
            current_score: 0,
            max_score: 0,
            choices_made: 0,
        }))
        .unwrap();
        assert_eq!(out["type"], "status");
        assert_eq!(out["has_active_scenario"], false);
    }
}
