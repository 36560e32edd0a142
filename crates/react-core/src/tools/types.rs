use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Keyword arguments of a tool call. Values are the raw strings the model
/// wrote; ordering by key keeps runs reproducible.
pub type ToolArguments = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// Keyword parameter names, in declaration order. All are strings.
    pub parameters: Vec<String>,
}

impl ToolDescriptor {
    /// `get_attraction(city: str, weather: str)`
    pub fn signature(&self) -> String {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| format!("{parameter}: str"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, parameters)
    }
}
