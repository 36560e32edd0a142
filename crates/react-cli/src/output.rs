use colored::Colorize;
use react_core::{AgentEvent, RunOutcome};

/// Terminal line(s) for one loop event, or `None` for the terminal event,
/// which is printed separately via [`render_outcome`].
pub fn render_event(event: &AgentEvent) -> Option<String> {
    match event {
        AgentEvent::IterationStart {
            iteration,
            max_iterations,
        } => Some(
            format!("--- Iteration {iteration}/{max_iterations} ---")
                .bold()
                .to_string(),
        ),
        AgentEvent::ModelTurn { content, truncated } => {
            let mut text = String::new();
            if *truncated {
                text.push_str(&"Dropped extra Thought-Action pairs".yellow().to_string());
                text.push('\n');
            }
            text.push_str(&format!("{}\n{}", "Model output:".cyan(), content));
            Some(text)
        }
        AgentEvent::ToolStart {
            tool_name,
            arguments,
        } => {
            let args = arguments
                .iter()
                .map(|(key, value)| format!("{key}=\"{value}\""))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("🔧 {}({})", tool_name, args).dimmed().to_string())
        }
        AgentEvent::ToolComplete { observation, .. } => {
            Some(format!("Observation: {observation}").green().to_string())
        }
        AgentEvent::Complete { .. } => None,
    }
}

pub fn render_outcome(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::Finished { answer } => {
            format!("{}\n{}", "✅ Final answer:".green().bold(), answer)
        }
        RunOutcome::Aborted { reason } => {
            let mut text = format!("❌ Aborted: {reason}").red().to_string();
            if let Some(detail) = reason.detail() {
                text.push('\n');
                text.push_str(&detail.dimmed().to_string());
            }
            text
        }
        RunOutcome::Exhausted => "⚠️  Reached the iteration limit without an answer"
            .yellow()
            .to_string(),
    }
}

pub fn exit_code(outcome: &RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Finished { .. } => 0,
        RunOutcome::Aborted { .. } => 1,
        RunOutcome::Exhausted => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use react_core::tools::ToolArguments;
    use react_core::AbortReason;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn tool_start_shows_call_syntax() {
        plain();
        let event = AgentEvent::ToolStart {
            tool_name: "get_attraction".to_string(),
            arguments: ToolArguments::from([
                ("city".to_string(), "Beijing".to_string()),
                ("weather".to_string(), "Sunny".to_string()),
            ]),
        };
        assert_eq!(
            render_event(&event).unwrap(),
            "🔧 get_attraction(city=\"Beijing\", weather=\"Sunny\")"
        );
    }

    #[test]
    fn truncated_turn_is_flagged() {
        plain();
        let event = AgentEvent::ModelTurn {
            content: "Thought: x\nAction: finish(answer=\"y\")".to_string(),
            truncated: true,
        };
        let text = render_event(&event).unwrap();
        assert!(text.starts_with("Dropped extra Thought-Action pairs\nModel output:\n"));
    }

    #[test]
    fn complete_event_is_not_rendered() {
        let event = AgentEvent::Complete {
            outcome: RunOutcome::Exhausted,
        };
        assert!(render_event(&event).is_none());
    }

    #[test]
    fn aborted_outcome_includes_detail() {
        plain();
        let outcome = RunOutcome::Aborted {
            reason: AbortReason::provider_failure("HTTP 502: bad gateway"),
        };
        assert_eq!(
            render_outcome(&outcome),
            "❌ Aborted: provider failure\nHTTP 502: bad gateway"
        );
    }

    #[test]
    fn exit_codes_follow_terminal_state() {
        assert_eq!(
            exit_code(&RunOutcome::Finished {
                answer: "ok".to_string()
            }),
            0
        );
        assert_eq!(
            exit_code(&RunOutcome::Aborted {
                reason: AbortReason::Cancelled
            }),
            1
        );
        assert_eq!(exit_code(&RunOutcome::Exhausted), 2);
    }
}
