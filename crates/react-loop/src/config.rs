use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Configuration for the agent loop.
#[derive(Debug, Clone)]
pub struct AgentLoopConfig {
    pub max_iterations: usize,
    /// Falls back to a prompt generated from the registry when `None`.
    pub system_prompt: Option<String>,
    /// Wall-clock budget for the whole run, checked between steps.
    pub deadline: Option<Duration>,
    /// Tag for log lines; a random id is generated when `None`.
    pub run_id: Option<String>,
}

impl Default for AgentLoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            system_prompt: None,
            deadline: None,
            run_id: None,
        }
    }
}

impl AgentLoopConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}
