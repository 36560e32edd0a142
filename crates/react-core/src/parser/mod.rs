//! Turns free-form model output into exactly one [`ParsedAction`].
//!
//! The grammar is a fixed sequence of rules, each producing a tagged result:
//!
//! 1. keep only the first `Thought: ... Action: ...` block of the output;
//! 2. the text after `Action:` is the action string;
//! 3. `finish(answer="...")` carries the final answer;
//! 4. anything else must be `tool_name(key="value", ...)`.
//!
//! Every way the output can fail to match is a [`ParseFailure`] variant, so
//! the loop never has to deal with a panic or an opaque error here.

mod arguments;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tools::ToolArguments;

pub use arguments::parse_arguments;
use arguments::{is_identifier, is_identifier_char, Scanner};

const THOUGHT_MARKER: &str = "Thought:";
const ACTION_MARKER: &str = "Action:";
const FINISH_CALL: &str = "finish";
const ANSWER_KEYWORD: &str = "answer";

/// Start of a new turn: a marker at the beginning of a line.
static TURN_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*(?:Thought:|Action:|Observation:)").expect("turn boundary pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailure {
    #[error("no action found")]
    NoAction,

    #[error("malformed finish call")]
    MalformedFinish,

    #[error("no tool name")]
    NoToolName,

    #[error("malformed arguments: {0}")]
    MalformedArguments(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParsedAction {
    ToolCall {
        name: String,
        arguments: ToolArguments,
    },
    Finish {
        answer: String,
    },
    ParseFailure {
        reason: ParseFailure,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTurn {
    /// The text that belongs in history: the first block when the output was
    /// truncated, the untouched output otherwise.
    pub retained: String,
    pub truncated: bool,
    pub action: ParsedAction,
}

pub fn parse_turn(output: &str) -> ParsedTurn {
    let (retained, truncated) = truncate_to_first_turn(output);
    ParsedTurn {
        action: parse_action(retained),
        retained: retained.to_string(),
        truncated,
    }
}

/// Drops any Thought/Action/Observation turns the model emitted after its
/// first `Thought: ... Action: ...` block.
///
/// Returns the retained text and whether anything was cut. Markers only end
/// the block when they open a line, so an inline `Observation:` inside the
/// action is kept.
pub fn truncate_to_first_turn(output: &str) -> (&str, bool) {
    let Some(thought_start) = output.find(THOUGHT_MARKER) else {
        return (output, false);
    };
    let after_thought = thought_start + THOUGHT_MARKER.len();
    let Some(action_offset) = output[after_thought..].find(ACTION_MARKER) else {
        return (output, false);
    };
    let action_end = after_thought + action_offset + ACTION_MARKER.len();

    let block_end = TURN_BOUNDARY
        .find_at(output, action_end)
        .map(|boundary| boundary.start())
        .unwrap_or(output.len());
    let block = output[thought_start..block_end].trim_end();

    if block == output.trim() {
        (output, false)
    } else {
        (block, true)
    }
}

/// Applies rules 2-4 to an already truncated block.
pub fn parse_action(text: &str) -> ParsedAction {
    match classify(text) {
        Ok(action) => action,
        Err(reason) => ParsedAction::ParseFailure { reason },
    }
}

fn classify(text: &str) -> Result<ParsedAction, ParseFailure> {
    let action = action_string(text).ok_or(ParseFailure::NoAction)?;

    if is_finish_call(action) {
        let answer = parse_finish(action)?;
        return Ok(ParsedAction::Finish { answer });
    }

    let (name, arguments) = parse_tool_call(action)?;
    Ok(ParsedAction::ToolCall { name, arguments })
}

fn action_string(text: &str) -> Option<&str> {
    let start = text.find(ACTION_MARKER)? + ACTION_MARKER.len();
    Some(text[start..].trim().trim_matches('`').trim())
}

fn is_finish_call(action: &str) -> bool {
    action
        .strip_prefix(FINISH_CALL)
        .is_some_and(|rest| !rest.starts_with(is_identifier_char))
}

/// `finish(answer="...")`. The answer runs to the last quote that is
/// followed by the closing parenthesis, so it may itself contain quotes.
fn parse_finish(action: &str) -> Result<String, ParseFailure> {
    let mut scanner = Scanner::new(&action[FINISH_CALL.len()..]);

    scanner.skip_whitespace();
    if !scanner.eat('(') {
        return Err(ParseFailure::MalformedFinish);
    }
    scanner.skip_whitespace();
    if scanner.identifier() != Some(ANSWER_KEYWORD) {
        return Err(ParseFailure::MalformedFinish);
    }
    scanner.skip_whitespace();
    if !scanner.eat('=') {
        return Err(ParseFailure::MalformedFinish);
    }
    scanner.skip_whitespace();
    if !scanner.eat('"') {
        return Err(ParseFailure::MalformedFinish);
    }

    let body = scanner.rest();
    body.match_indices('"')
        .rev()
        .find(|(index, _)| body[index + 1..].trim_start().starts_with(')'))
        .map(|(index, _)| body[..index].to_string())
        .ok_or(ParseFailure::MalformedFinish)
}

fn parse_tool_call(action: &str) -> Result<(String, ToolArguments), ParseFailure> {
    let open = action.find('(').ok_or(ParseFailure::NoToolName)?;
    let name = action[..open].trim();
    if !is_identifier(name) {
        return Err(ParseFailure::NoToolName);
    }

    let close = closing_paren(action, open).ok_or_else(|| {
        ParseFailure::MalformedArguments("missing closing parenthesis".to_string())
    })?;

    let arguments =
        parse_arguments(&action[open + 1..close]).map_err(ParseFailure::MalformedArguments)?;

    Ok((name.to_string(), arguments))
}

/// Byte offset of the `)` that closes the `(` at `open`, ignoring
/// parentheses inside double-quoted values. Text after it is not part of
/// the call.
fn closing_paren(action: &str, open: usize) -> Option<usize> {
    let mut in_quote = false;
    action[open + 1..]
        .char_indices()
        .find(|(_, c)| match *c {
            '"' => {
                in_quote = !in_quote;
                false
            }
            ')' => !in_quote,
            _ => false,
        })
        .map(|(index, _)| open + 1 + index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_call(name: &str, pairs: &[(&str, &str)]) -> ParsedAction {
        ParsedAction::ToolCall {
            name: name.to_string(),
            arguments: pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    fn failure(reason: ParseFailure) -> ParsedAction {
        ParsedAction::ParseFailure { reason }
    }

    #[test]
    fn parses_tool_call() {
        let turn = parse_turn(
            "Thought: I need the weather first.\nAction: get_weather(city=\"Beijing\")",
        );
        assert!(!turn.truncated);
        assert_eq!(turn.action, tool_call("get_weather", &[("city", "Beijing")]));
    }

    #[test]
    fn parses_tool_call_with_two_arguments() {
        let action = parse_action(
            "Thought: now recommend\nAction: get_attraction(city=\"Beijing\", weather=\"Sunny (20C)\")",
        );
        assert_eq!(
            action,
            tool_call(
                "get_attraction",
                &[("city", "Beijing"), ("weather", "Sunny (20C)")]
            )
        );
    }

    #[test]
    fn parses_tool_call_without_arguments() {
        let action = parse_action("Thought: t\nAction: list_cities()");
        assert_eq!(action, tool_call("list_cities", &[]));
    }

    #[test]
    fn parses_finish() {
        let action = parse_action("Thought: done\nAction: finish(answer=\"Visit the Summer Palace\")");
        assert_eq!(
            action,
            ParsedAction::Finish {
                answer: "Visit the Summer Palace".to_string()
            }
        );
    }

    #[test]
    fn finish_answer_may_contain_quotes_and_newlines() {
        let action = parse_action(
            "Thought: done\nAction: finish(answer=\"Go to \"798\" today.\nEnjoy!\")",
        );
        assert_eq!(
            action,
            ParsedAction::Finish {
                answer: "Go to \"798\" today.\nEnjoy!".to_string()
            }
        );
    }

    #[test]
    fn finish_with_spacing_is_accepted() {
        let action = parse_action("Action: finish( answer = \"ok\" )");
        assert_eq!(
            action,
            ParsedAction::Finish {
                answer: "ok".to_string()
            }
        );
    }

    #[test]
    fn malformed_finish_calls() {
        for text in [
            "Action: finish(\"no keyword\")",
            "Action: finish(result=\"x\")",
            "Action: finish(answer=x)",
            "Action: finish(answer=\"unterminated",
            "Action: finish",
        ] {
            assert_eq!(
                parse_action(text),
                failure(ParseFailure::MalformedFinish),
                "input: {text:?}"
            );
        }
    }

    #[test]
    fn finish_prefix_of_longer_name_is_a_tool() {
        let action = parse_action("Action: finish_report(id=\"7\")");
        assert_eq!(action, tool_call("finish_report", &[("id", "7")]));
    }

    #[test]
    fn missing_action_marker() {
        let action = parse_action("Thought: I am not sure what to do.");
        assert_eq!(action, failure(ParseFailure::NoAction));
        assert_eq!(ParseFailure::NoAction.to_string(), "no action found");
    }

    #[test]
    fn missing_tool_name() {
        assert_eq!(
            parse_action("Thought: t\nAction: (city=\"Beijing\")"),
            failure(ParseFailure::NoToolName)
        );
        assert_eq!(
            parse_action("Thought: t\nAction: I will look it up"),
            failure(ParseFailure::NoToolName)
        );
        assert_eq!(
            parse_action("Thought: t\nAction:"),
            failure(ParseFailure::NoToolName)
        );
    }

    #[test]
    fn rejects_non_string_arguments() {
        let action = parse_action("Thought: t\nAction: get_forecast(city=\"Beijing\", days=3)");
        assert_eq!(
            action,
            failure(ParseFailure::MalformedArguments(
                "value for 'days' must be a double-quoted string".to_string()
            ))
        );
    }

    #[test]
    fn rejects_missing_closing_parenthesis() {
        let action = parse_action("Thought: t\nAction: get_weather(city=\"Beijing\"");
        assert!(matches!(
            action,
            ParsedAction::ParseFailure {
                reason: ParseFailure::MalformedArguments(_)
            }
        ));
    }

    #[test]
    fn prose_after_the_call_is_ignored() {
        let action = parse_action(
            "Thought: t\nAction: get_weather(city=\"Beijing\")\nI will wait for the result (should be quick).",
        );
        assert_eq!(action, tool_call("get_weather", &[("city", "Beijing")]));
    }

    #[test]
    fn closing_paren_skips_quoted_values() {
        let action = r#"get_attraction(city="Beijing", weather="Sunny (20C)") then (maybe) more"#;
        let close = closing_paren(action, action.find('(').unwrap()).unwrap();
        assert_eq!(&action[..=close], r#"get_attraction(city="Beijing", weather="Sunny (20C)")"#);
        assert_eq!(closing_paren(r#"t(city="a)"#, 1), None);
    }

    #[test]
    fn preamble_before_thought_is_dropped() {
        let raw = "Sure!\nThought: a\nAction: get_weather(city=\"Paris\")\nThought: b\nAction: get_weather(city=\"Rome\")";
        let turn = parse_turn(raw);

        assert!(turn.truncated);
        assert_eq!(turn.retained, "Thought: a\nAction: get_weather(city=\"Paris\")");
        assert!(!raw.starts_with(&turn.retained));
        assert!(raw.contains(&turn.retained));
        assert_eq!(turn.action, tool_call("get_weather", &[("city", "Paris")]));
    }

    #[test]
    fn strips_backticks_around_action() {
        let action = parse_action("Thought: t\nAction: `get_weather(city=\"Shanghai\")`");
        assert_eq!(action, tool_call("get_weather", &[("city", "Shanghai")]));
    }

    #[test]
    fn truncates_hallucinated_turns() {
        let raw = "Thought: check weather\nAction: get_weather(city=\"Beijing\")\nObservation: Sunny\nThought: pick a spot\nAction: finish(answer=\"Summer Palace\")";
        let turn = parse_turn(raw);

        assert!(turn.truncated);
        assert_eq!(
            turn.retained,
            "Thought: check weather\nAction: get_weather(city=\"Beijing\")"
        );
        assert!(raw.starts_with(&turn.retained));
        assert!(turn.retained.len() < raw.len());
        assert_eq!(turn.action, tool_call("get_weather", &[("city", "Beijing")]));
    }

    #[test]
    fn truncates_second_thought_action_pair() {
        let raw = "Thought: a\nAction: get_weather(city=\"Paris\")\n\n  Thought: b\nAction: get_weather(city=\"Rome\")";
        let (retained, truncated) = truncate_to_first_turn(raw);
        assert!(truncated);
        assert_eq!(retained, "Thought: a\nAction: get_weather(city=\"Paris\")");
    }

    #[test]
    fn inline_marker_does_not_truncate() {
        let raw = "Thought: t\nAction: finish(answer=\"The Observation: deck is open\")";
        let turn = parse_turn(raw);
        assert!(!turn.truncated);
        assert_eq!(turn.retained, raw);
        assert_eq!(
            turn.action,
            ParsedAction::Finish {
                answer: "The Observation: deck is open".to_string()
            }
        );
    }

    #[test]
    fn trailing_whitespace_is_not_truncation() {
        let raw = "Thought: t\nAction: get_weather(city=\"Beijing\")\n\n";
        let turn = parse_turn(raw);
        assert!(!turn.truncated);
        assert_eq!(turn.retained, raw);
    }

    #[test]
    fn output_without_thought_is_kept_whole() {
        let raw = "Action: get_weather(city=\"Beijing\")\nAction: get_weather(city=\"Rome\")";
        let turn = parse_turn(raw);
        assert!(!turn.truncated);
        assert_eq!(turn.retained, raw);
    }

    #[test]
    fn multiline_action_string() {
        let action = parse_action(
            "Thought: t\nAction: get_attraction(\n    city=\"Beijing\",\n    weather=\"Sunny\"\n)",
        );
        assert_eq!(
            action,
            tool_call("get_attraction", &[("city", "Beijing"), ("weather", "Sunny")])
        );
    }
}
