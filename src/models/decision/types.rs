use serde::{Deserialize, Serialize};

/// What flavour of decision this is. Polls carry free-text options supplied
/// at creation; disputes carry the fixed pair of party choices. The state
/// machine is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Poll,
    Dispute,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Poll => "poll",
            DecisionKind::Dispute => "dispute",
        }
    }

    pub fn parse(s: &str) -> Option<DecisionKind> {
        match s {
            "poll" => Some(DecisionKind::Poll),
            "dispute" => Some(DecisionKind::Dispute),
            _ => None,
        }
    }
}

/// Decision lifecycle: `Open` is the only non-terminal state. `Resolved` is
/// reached by an explicit resolve with a declared winner; `StaffDecided` by
/// a staff override that supersedes any tally. There is no transition out
/// of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Open,
    Resolved,
    StaffDecided,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Open => "open",
            DecisionStatus::Resolved => "resolved",
            DecisionStatus::StaffDecided => "staff_decided",
        }
    }

    pub fn parse(s: &str) -> Option<DecisionStatus> {
        match s {
            "open" => Some(DecisionStatus::Open),
            "resolved" => Some(DecisionStatus::Resolved),
            "staff_decided" => Some(DecisionStatus::StaffDecided),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DecisionStatus::Open)
    }
}

/// One of the named choices a decision is between.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub id: i64,
    pub decision_id: i64,
    pub label: String,
    pub position: i64,
}

/// A voter's single, immutable choice on a decision.
#[derive(Debug, Clone, Serialize)]
pub struct Ballot {
    pub id: i64,
    pub decision_id: i64,
    pub choice_id: i64,
    pub voter_id: i64,
    pub cast_at: String,
}

/// The decision entity as stored, without its choice list.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub id: i64,
    pub kind: DecisionKind,
    pub project_id: i64,
    pub creator_id: i64,
    pub title: String,
    pub context: Option<String>,
    pub urgency: String,
    pub status: DecisionStatus,
    pub winning_choice_id: Option<i64>,
    pub staff_decider_id: Option<i64>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// Decision plus its declared choices, as returned by create/read paths.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionDetail {
    #[serde(flatten)]
    pub decision: Decision,
    pub choices: Vec<Choice>,
}

/// Input for creating a decision. Poll choices come straight from the
/// caller; dispute creation supplies the two party labels as choices.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDecision {
    pub kind: DecisionKind,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub urgency: Option<String>,
    pub choices: Vec<String>,
}

/// Filters for the decision list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DecisionFilter {
    pub project_id: Option<i64>,
    pub status: Option<String>,
    pub kind: Option<String>,
}
