use crate::{ToolError, ToolOutput};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

pub fn is_url_like(target: &str) -> bool {
    let lowered = target.to_lowercase();
    lowered.contains("://") || lowered.starts_with("www.")
}

/// Resolve a launch target to an executable path: literal paths first,
/// then an `.exe` suffix retry, then a PATH lookup.
fn resolve_target(target: &str) -> Option<PathBuf> {
    let trimmed = target.trim().trim_matches('"');
    let candidate = Path::new(trimmed);
    if candidate.exists() {
        return Some(candidate.to_path_buf());
    }

    if candidate.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
        if !trimmed.to_lowercase().ends_with(".exe") {
            let with_exe = PathBuf::from(format!("{trimmed}.exe"));
            if with_exe.exists() {
                return Some(with_exe);
            }
        }
        return None;
    }

    if let Ok(found) = which::which(trimmed) {
        return Some(found);
    }
    if !trimmed.to_lowercase().ends_with(".exe") {
        if let Ok(found) = which::which(format!("{trimmed}.exe")) {
            return Some(found);
        }
    }
    None
}

pub fn launch_app(target: &str, args: &[String]) -> Result<ToolOutput, ToolError> {
    if target.trim().is_empty() {
        return Err(ToolError::Validation("Missing target argument.".to_string()));
    }

    if let Some(resolved) = resolve_target(target) {
        Command::new(&resolved).args(args).spawn()?;
        info!(target = %resolved.display(), "application launched");
        return Ok(json!({ "launched": resolved }));
    }

    if is_url_like(target) {
        open::that(target)?;
        return Ok(json!({ "launched": target }));
    }

    Err(ToolError::Launch(target.to_string()))
}

pub fn open_path(path: &Path) -> Result<ToolOutput, ToolError> {
    open::that(path)?;
    Ok(json!({ "opened": path }))
}
