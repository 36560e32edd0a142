pub mod config;
pub mod prompt;
pub mod runner;
mod state;

pub use config::{AgentLoopConfig, DEFAULT_MAX_ITERATIONS};
pub use prompt::{build_system_prompt, default_system_prompt};
pub use runner::{run_agent, run_agent_loop_with_config};
