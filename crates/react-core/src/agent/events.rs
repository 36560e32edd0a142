use serde::{Deserialize, Serialize};

use crate::agent::types::RunOutcome;
use crate::tools::ToolArguments;

/// Progress notifications emitted by the agent loop while a run executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    IterationStart {
        iteration: usize,
        max_iterations: usize,
    },
    ModelTurn {
        content: String,
        truncated: bool,
    },
    ToolStart {
        tool_name: String,
        arguments: ToolArguments,
    },
    ToolComplete {
        tool_name: String,
        observation: String,
    },
    Complete {
        outcome: RunOutcome,
    },
}
