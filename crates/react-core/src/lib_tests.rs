use super::*;
use crate::parser::ParseFailure;

#[test]
fn test_history_starts_with_user_request() {
    let history = ConversationHistory::new("plan my trip");
    assert_eq!(history.len(), 1);
    assert_eq!(
        history.entries()[0],
        HistoryEntry::UserRequest("plan my trip".to_string())
    );
    assert_eq!(history.render(), "User request: plan my trip");
}

#[test]
fn test_history_render_keeps_order() {
    let mut history = ConversationHistory::new("weather?");
    history.push_model_turn("Thought: look\nAction: get_weather(city=\"Beijing\")");
    history.push_observation("Beijing current weather: Sunny, 20C");

    assert_eq!(
        history.render(),
        "User request: weather?\n\
         Thought: look\nAction: get_weather(city=\"Beijing\")\n\
         Observation: Beijing current weather: Sunny, 20C"
    );
    assert_eq!(history.model_turns().count(), 1);
    assert_eq!(
        history.observations().collect::<Vec<_>>(),
        vec!["Beijing current weather: Sunny, 20C"]
    );
}

#[test]
fn test_history_entry_text_has_no_prefix() {
    let entry = HistoryEntry::Observation("Sunny".to_string());
    assert_eq!(entry.text(), "Sunny");
    assert_eq!(entry.render(), "Observation: Sunny");
}

#[test]
fn test_run_outcome_accessors() {
    let finished = RunOutcome::Finished {
        answer: "Summer Palace".to_string(),
    };
    assert!(finished.is_finished());
    assert_eq!(finished.answer(), Some("Summer Palace"));
    assert_eq!(finished.to_string(), "FINISHED(Summer Palace)");

    let aborted = RunOutcome::Aborted {
        reason: AbortReason::Cancelled,
    };
    assert!(aborted.is_aborted());
    assert_eq!(aborted.answer(), None);
    assert_eq!(aborted.to_string(), "ABORTED(cancelled)");

    assert!(RunOutcome::Exhausted.is_exhausted());
    assert_eq!(RunOutcome::Exhausted.to_string(), "EXHAUSTED");
}

#[test]
fn test_abort_reason_messages() {
    let provider = AbortReason::provider_failure("HTTP 500");
    assert_eq!(provider.to_string(), "provider failure");
    assert_eq!(provider.detail(), Some("HTTP 500"));

    let parse = AbortReason::parse_failure(ParseFailure::NoAction, "Thought: hmm");
    assert_eq!(parse.to_string(), "no action found");
    assert_eq!(parse.detail(), Some("Thought: hmm"));

    assert_eq!(AbortReason::Cancelled.detail(), None);
}

#[test]
fn test_event_serialization() {
    let event = AgentEvent::ToolComplete {
        tool_name: "get_weather".to_string(),
        observation: "Sunny".to_string(),
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "tool_complete");
    assert_eq!(json["tool_name"], "get_weather");

    let complete = AgentEvent::Complete {
        outcome: RunOutcome::Finished {
            answer: "ok".to_string(),
        },
    };
    let json = serde_json::to_value(&complete).unwrap();
    assert_eq!(json["outcome"]["state"], "finished");
    assert_eq!(json["outcome"]["answer"], "ok");
}
