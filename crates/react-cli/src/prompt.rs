use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use react_core::tools::ToolRegistry;
use react_loop::default_system_prompt;

pub const PROMPT_FILE_NAME: &str = "system_prompt.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    File(PathBuf),
    BuiltIn,
}

impl fmt::Display for PromptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::BuiltIn => write!(f, "built-in prompt"),
        }
    }
}

/// Directory of the running executable, then the working directory.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(PROMPT_FILE_NAME));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(PROMPT_FILE_NAME));
    }
    candidates
}

/// First candidate that can be read and is not blank.
pub fn find_prompt_file(candidates: &[PathBuf]) -> Option<(PathBuf, String)> {
    candidates.iter().find_map(|path| match std::fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => Some((path.clone(), content.trim().to_string())),
        Ok(_) => {
            log::warn!("Ignoring empty prompt file {}", path.display());
            None
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => None,
        Err(error) => {
            log::warn!("Failed to read prompt file {}: {}", path.display(), error);
            None
        }
    })
}

/// An explicit file must be readable; otherwise fall back through the
/// candidates to the prompt generated from `registry`.
pub fn load_system_prompt(
    explicit: Option<&Path>,
    candidates: &[PathBuf],
    registry: &ToolRegistry,
) -> anyhow::Result<(String, PromptSource)> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read system prompt {}", path.display()))?;
        return Ok((content.trim().to_string(), PromptSource::File(path.to_path_buf())));
    }

    Ok(match find_prompt_file(candidates) {
        Some((path, content)) => (content, PromptSource::File(path)),
        None => (default_system_prompt(registry), PromptSource::BuiltIn),
    })
}
