use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::parser::ParseFailure;

/// Why a run stopped before producing an answer.
///
/// The `Display` text is the abort reason reported to callers; the extra
/// fields are kept for diagnostics only.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    #[error("provider failure")]
    ProviderFailure { detail: String },

    #[error("{reason}")]
    ParseFailure {
        reason: ParseFailure,
        raw_output: String,
    },

    #[error("cancelled")]
    Cancelled,
}

impl AbortReason {
    pub fn provider_failure(detail: impl Into<String>) -> Self {
        Self::ProviderFailure {
            detail: detail.into(),
        }
    }

    pub fn parse_failure(reason: ParseFailure, raw_output: impl Into<String>) -> Self {
        Self::ParseFailure {
            reason,
            raw_output: raw_output.into(),
        }
    }

    /// Extra context for logs: provider error text or the offending model output.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::ProviderFailure { detail } => Some(detail),
            Self::ParseFailure { raw_output, .. } => Some(raw_output),
            Self::Cancelled => None,
        }
    }
}
