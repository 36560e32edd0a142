use std::fmt;

use serde::{Deserialize, Serialize};

use crate::agent::error::AbortReason;

pub const USER_REQUEST_PREFIX: &str = "User request: ";
pub const OBSERVATION_PREFIX: &str = "Observation: ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum HistoryEntry {
    UserRequest(String),
    /// Think + act text exactly as retained from the model output.
    ModelTurn(String),
    /// Tool result, stored without its `Observation: ` prefix.
    Observation(String),
}

impl HistoryEntry {
    pub fn text(&self) -> &str {
        match self {
            Self::UserRequest(text) | Self::ModelTurn(text) | Self::Observation(text) => text,
        }
    }

    /// The line(s) this entry contributes to the prompt.
    pub fn render(&self) -> String {
        match self {
            Self::UserRequest(text) => format!("{USER_REQUEST_PREFIX}{text}"),
            Self::ModelTurn(text) => text.clone(),
            Self::Observation(text) => format!("{OBSERVATION_PREFIX}{text}"),
        }
    }
}

/// Chronological record of one run. Entries are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new(user_request: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::UserRequest(user_request.into())],
        }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn push_model_turn(&mut self, text: impl Into<String>) {
        self.append(HistoryEntry::ModelTurn(text.into()));
    }

    pub fn push_observation(&mut self, text: impl Into<String>) {
        self.append(HistoryEntry::Observation(text.into()));
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn model_turns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            HistoryEntry::ModelTurn(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn observations(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            HistoryEntry::Observation(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Newline join of every entry, oldest first. No windowing is applied.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(HistoryEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunOutcome {
    Finished { answer: String },
    Aborted { reason: AbortReason },
    /// The iteration budget ran out; the task may still be solvable with more.
    Exhausted,
}

impl RunOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Finished { answer } => Some(answer),
            _ => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            Self::Aborted { reason } => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finished { answer } => write!(f, "FINISHED({answer})"),
            Self::Aborted { reason } => write!(f, "ABORTED({reason})"),
            Self::Exhausted => write!(f, "EXHAUSTED"),
        }
    }
}

/// What a completed run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRun {
    pub outcome: RunOutcome,
    pub history: ConversationHistory,
    /// Model turns that completed and were committed to history.
    pub iterations: usize,
}
