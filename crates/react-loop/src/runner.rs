use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use react_core::tools::{dispatch_tool_call, ToolRegistry};
use react_core::{parse_turn, AbortReason, AgentEvent, AgentRun, ParsedAction, RunOutcome};
use react_llm::LLMProvider;

use crate::config::AgentLoopConfig;
use crate::prompt::default_system_prompt;
use crate::state::LoopState;

/// Runs one request to a terminal state with no cancellation and no events.
pub async fn run_agent(
    user_request: &str,
    max_iterations: usize,
    system_prompt: &str,
    llm: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
) -> AgentRun {
    let config = AgentLoopConfig::default()
        .with_max_iterations(max_iterations)
        .with_system_prompt(system_prompt);

    run_agent_loop_with_config(
        user_request,
        None,
        llm,
        tools,
        CancellationToken::new(),
        config,
    )
    .await
}

/// Drives the Thought/Action/Observation loop.
///
/// Every failure mode ends in a [`RunOutcome`]; nothing is returned as an
/// error. The token and the configured deadline are checked before each
/// provider call, after it returns, and after each tool call returns.
pub async fn run_agent_loop_with_config(
    user_request: &str,
    event_tx: Option<mpsc::Sender<AgentEvent>>,
    llm: Arc<dyn LLMProvider>,
    tools: Arc<ToolRegistry>,
    cancel_token: CancellationToken,
    config: AgentLoopConfig,
) -> AgentRun {
    let debug_logger = DebugLogger::new(log::log_enabled!(log::Level::Debug));
    let run_id = config
        .run_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let interrupt = Interrupt::new(cancel_token, &config);
    let system_prompt = config
        .system_prompt
        .clone()
        .unwrap_or_else(|| default_system_prompt(&tools));

    log::info!(
        "[{}] Starting agent run (max {} iterations): {}",
        run_id,
        config.max_iterations,
        user_request
    );
    debug_logger.log_event(
        &run_id,
        "agent_loop_start",
        serde_json::json!({
            "max_iterations": config.max_iterations,
            "tools": tools.list_tool_names(),
            "system_prompt_chars": system_prompt.len(),
        }),
    );

    let mut state = LoopState::new(user_request, config.max_iterations);

    while state.is_running() {
        let iteration = state.iteration() + 1;
        if interrupt.triggered() {
            log::info!("[{}] Run cancelled before iteration {}", run_id, iteration);
            state.interrupt(cancelled());
            break;
        }

        emit(
            &event_tx,
            AgentEvent::IterationStart {
                iteration,
                max_iterations: state.max_iterations(),
            },
        )
        .await;

        let prompt = state.history().render();
        debug_logger.log_event(
            &run_id,
            "iteration_start",
            serde_json::json!({
                "iteration": iteration,
                "history_entries": state.history().len(),
                "prompt_chars": prompt.len(),
            }),
        );

        let timer = Timer::new("llm_request");
        let generated = llm.generate(&prompt, &system_prompt).await;
        timer.debug(&run_id);

        if interrupt.triggered() {
            log::info!(
                "[{}] Run cancelled while waiting for the model in iteration {}",
                run_id,
                iteration
            );
            state.interrupt(cancelled());
            break;
        }

        let raw_output = match generated {
            Ok(output) => output,
            Err(error) => {
                log::warn!("[{}] Provider call failed: {}", run_id, error);
                state.finish(RunOutcome::Aborted {
                    reason: AbortReason::provider_failure(error.to_string()),
                });
                break;
            }
        };

        let turn = parse_turn(&raw_output);
        if turn.truncated {
            log::info!(
                "[{}] Dropped extra Thought/Action turns from model output ({} -> {} chars)",
                run_id,
                raw_output.len(),
                turn.retained.len()
            );
        }
        log::debug!("[{}] Model turn:\n{}", run_id, turn.retained);

        state.stage_model_turn(turn.retained.clone());
        emit(
            &event_tx,
            AgentEvent::ModelTurn {
                content: turn.retained.clone(),
                truncated: turn.truncated,
            },
        )
        .await;

        match turn.action {
            ParsedAction::Finish { answer } => {
                log::info!("[{}] Finished after {} iterations", run_id, iteration);
                state.finish(RunOutcome::Finished { answer });
            }
            ParsedAction::ParseFailure { reason } => {
                log::warn!("[{}] Could not parse model output: {}", run_id, reason);
                state.finish(RunOutcome::Aborted {
                    reason: AbortReason::parse_failure(reason, raw_output),
                });
            }
            ParsedAction::ToolCall { name, arguments } => {
                emit(
                    &event_tx,
                    AgentEvent::ToolStart {
                        tool_name: name.clone(),
                        arguments: arguments.clone(),
                    },
                )
                .await;

                let timer = Timer::new(format!("tool {}", name));
                let observation = dispatch_tool_call(&tools, &name, &arguments).await;
                timer.debug(&run_id);

                if interrupt.triggered() {
                    log::info!(
                        "[{}] Run cancelled during tool '{}' in iteration {}",
                        run_id,
                        name,
                        iteration
                    );
                    state.interrupt(cancelled());
                    break;
                }

                debug_logger.log_event(
                    &run_id,
                    "tool_complete",
                    serde_json::json!({
                        "tool": name,
                        "arguments": arguments,
                        "observation": observation,
                    }),
                );
                emit(
                    &event_tx,
                    AgentEvent::ToolComplete {
                        tool_name: name,
                        observation: observation.clone(),
                    },
                )
                .await;

                state.stage_observation(observation);
                state.advance();
            }
        }
    }

    let run = state.into_run();
    if run.outcome.is_exhausted() {
        log::info!(
            "[{}] Reached the limit of {} iterations without an answer",
            run_id,
            config.max_iterations
        );
    }
    debug_logger.log_event(
        &run_id,
        "agent_loop_complete",
        serde_json::json!({
            "outcome": run.outcome,
            "iterations": run.iterations,
            "history_entries": run.history.len(),
        }),
    );

    emit(
        &event_tx,
        AgentEvent::Complete {
            outcome: run.outcome.clone(),
        },
    )
    .await;

    run
}

fn cancelled() -> RunOutcome {
    RunOutcome::Aborted {
        reason: AbortReason::Cancelled,
    }
}

async fn emit(event_tx: &Option<mpsc::Sender<AgentEvent>>, event: AgentEvent) {
    if let Some(tx) = event_tx {
        // A dropped receiver only means nobody is watching.
        let _ = tx.send(event).await;
    }
}

/// Cancellation token plus optional wall-clock deadline.
struct Interrupt {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Interrupt {
    fn new(token: CancellationToken, config: &AgentLoopConfig) -> Self {
        let deadline = config
            .deadline
            .and_then(|budget| Instant::now().checked_add(budget));
        Self { token, deadline }
    }

    fn triggered(&self) -> bool {
        self.token.is_cancelled()
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

struct DebugLogger {
    enabled: bool,
}

impl DebugLogger {
    fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn log_event(&self, run_id: &str, event_type: &str, details: serde_json::Value) {
        if !self.enabled {
            return;
        }

        log::debug!("[{}] {}: {}", run_id, event_type, details);
    }
}

struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
        }
    }

    fn debug(&self, run_id: &str) {
        log::debug!(
            "[{}] {} completed in {}ms",
            run_id,
            self.name,
            self.start.elapsed().as_millis()
        );
    }
}
