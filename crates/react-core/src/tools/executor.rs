use thiserror::Error;

use crate::tools::{Tool, ToolArguments, ToolRegistry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("undefined tool '{0}'")]
    NotFound(String),

    #[error("{0}")]
    Execution(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

pub type Result<T> = std::result::Result<T, ToolError>;

pub const ERROR_OBSERVATION_PREFIX: &str = "error: ";

/// Every declared parameter must be present, and nothing else may be.
pub fn check_arguments(tool: &dyn Tool, args: &ToolArguments) -> Result<()> {
    let parameters = tool.parameters();

    if let Some(missing) = parameters
        .iter()
        .find(|parameter| !args.contains_key(**parameter))
    {
        return Err(ToolError::InvalidArguments(format!(
            "missing argument '{}' for '{}'",
            missing,
            tool.name()
        )));
    }

    if let Some(unexpected) = args
        .keys()
        .find(|key| !parameters.contains(&key.as_str()))
    {
        return Err(ToolError::InvalidArguments(format!(
            "unexpected argument '{}' for '{}'",
            unexpected,
            tool.name()
        )));
    }

    Ok(())
}

pub async fn invoke_tool(tool: &dyn Tool, args: &ToolArguments) -> Result<String> {
    check_arguments(tool, args)?;
    tool.execute(args).await
}

/// Runs a parsed tool call and always produces observation text.
///
/// Unknown names and tool failures become `error: ...` observations so the
/// model can react to them on its next turn.
pub async fn dispatch_tool_call(registry: &ToolRegistry, name: &str, args: &ToolArguments) -> String {
    let result = match registry.get(name) {
        Some(tool) => invoke_tool(tool.as_ref(), args).await,
        None => Err(ToolError::NotFound(name.to_string())),
    };

    match result {
        Ok(observation) => observation,
        Err(error) => {
            log::warn!("Tool '{}' failed: {}", name, error);
            format!("{ERROR_OBSERVATION_PREFIX}{error}")
        }
    }
}
