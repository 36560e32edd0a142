use react_core::tools::{ToolDescriptor, ToolRegistry};

const PROMPT_INTRO: &str = "You are an intelligent travel assistant. Your task is to analyze the user's request and solve it step by step with the available tools.";

const PROMPT_FORMAT: &str = "# Action format:
Your reply must strictly follow the format below. First your reasoning, then the concrete action to take. Output exactly one Thought-Action pair per reply:
Thought: [your reasoning and plan for the next step]
Action: [the tool to call, written as function_name(arg_name=\"arg_value\")]

# Finishing:
When you have gathered enough information to answer the user's final question, you must use `finish(answer=\"...\")` after `Action:` to output the final answer.

Begin!";

/// Built-in system prompt listing every registered tool.
pub fn default_system_prompt(registry: &ToolRegistry) -> String {
    build_system_prompt(&registry.descriptors())
}

pub fn build_system_prompt(descriptors: &[ToolDescriptor]) -> String {
    let tools = if descriptors.is_empty() {
        "- (no tools registered)".to_string()
    } else {
        descriptors
            .iter()
            .map(|descriptor| format!("- `{}`: {}", descriptor.signature(), descriptor.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("{PROMPT_INTRO}\n\n# Available tools:\n{tools}\n\n{PROMPT_FORMAT}")
}
