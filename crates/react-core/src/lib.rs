pub mod agent;
pub mod parser;
pub mod tools;

pub use agent::events::AgentEvent;
pub use agent::types::{AgentRun, ConversationHistory, HistoryEntry, RunOutcome};
pub use agent::AbortReason;
pub use parser::{parse_action, parse_turn, ParseFailure, ParsedAction, ParsedTurn};
pub use tools::{
    dispatch_tool_call, RegistryError, SharedTool, Tool, ToolArguments, ToolDescriptor,
    ToolError, ToolRegistry,
};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
