pub mod executor;
pub mod registry;
pub mod types;

pub use executor::{check_arguments, dispatch_tool_call, invoke_tool, ToolError};
pub use registry::{RegistryError, SharedTool, Tool, ToolRegistry};
pub use types::{ToolArguments, ToolDescriptor};
