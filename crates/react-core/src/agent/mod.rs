pub mod error;
pub mod events;
pub mod types;

pub use error::AbortReason;
pub use events::AgentEvent;
pub use types::{AgentRun, ConversationHistory, HistoryEntry, RunOutcome};
