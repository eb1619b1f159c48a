pub mod file_tools;
pub mod system_tools;
pub mod web;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to launch app: {0}")]
    Launch(String),
}

/// Tool functions return a small JSON payload describing what happened.
pub type ToolOutput = serde_json::Value;
