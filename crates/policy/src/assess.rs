use crate::action::ActionKind;
use crate::paths::{home_dir, normalize_path_with_home};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Outcome of the safety gate for a single action request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub allowed: bool,
    pub risky: bool,
    pub reason: String,
}

impl Assessment {
    fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            risky: false,
            reason: reason.into(),
        }
    }

    fn allowed(risky: bool) -> Self {
        let reason = if risky {
            "Confirmation required for risky action."
        } else {
            "OK"
        };
        Self {
            allowed: true,
            risky,
            reason: reason.to_string(),
        }
    }
}

/// The single authorization boundary. Every action goes through
/// `assess` before the executor is allowed to dispatch it.
pub struct SafetyPolicy {
    protected: Vec<PathBuf>,
    home: PathBuf,
}

impl SafetyPolicy {
    pub fn new() -> Self {
        Self {
            protected: default_protected(),
            home: home_dir(),
        }
    }

    /// Construct with explicit protected prefixes and home directory.
    pub fn with_rules(protected: Vec<PathBuf>, home: PathBuf) -> Self {
        Self { protected, home }
    }

    pub fn normalize(&self, path: &str) -> PathBuf {
        normalize_path_with_home(path, &self.home)
    }

    /// True path-prefix containment, not substring matching: the
    /// normalized path must start with the protected prefix component
    /// by component, so `C:\Windows2\f` does not match `C:\Windows`.
    fn is_protected(&self, path: &str) -> bool {
        let normalized = self.normalize(path);
        self.protected.iter().any(|p| normalized.starts_with(p))
    }

    pub fn assess(&self, action: &str, args: &Map<String, Value>) -> Assessment {
        let Some(kind) = ActionKind::from_name(action) else {
            return Assessment::denied(format!("Unknown action: {action}"));
        };

        match kind {
            ActionKind::FileOpen
            | ActionKind::FileDelete
            | ActionKind::SystemOpenPath
            | ActionKind::FileCreateFolder => {
                let Some(path) = arg_str(args, "path") else {
                    return Assessment::denied("Missing path argument.");
                };
                if self.is_protected(path) {
                    return Assessment::denied("Target is in a protected directory.");
                }
                if !self.normalize(path).exists() {
                    // Creating a folder that does not exist yet is the point.
                    if kind == ActionKind::FileCreateFolder {
                        return Assessment::allowed(false);
                    }
                    return Assessment::denied("Target path does not exist.");
                }
                Assessment::allowed(kind == ActionKind::FileDelete)
            }
            ActionKind::FileRename | ActionKind::FileMove => {
                let (Some(src), Some(dst)) = (arg_str(args, "src"), arg_str(args, "dst")) else {
                    return Assessment::denied("Missing src or dst argument.");
                };
                if self.is_protected(src) || self.is_protected(dst) {
                    return Assessment::denied(
                        "Source or destination is in a protected directory.",
                    );
                }
                if !self.normalize(src).exists() {
                    return Assessment::denied("Source path does not exist.");
                }
                Assessment::allowed(true)
            }
            ActionKind::SystemLaunch => {
                let Some(target) = arg_str(args, "target") else {
                    return Assessment::denied("Missing target argument.");
                };
                // Bare application names are resolved by the launcher;
                // only gate targets that point at real protected files.
                if Path::new(target).exists() && self.is_protected(target) {
                    return Assessment::denied("Target is in a protected directory.");
                }
                Assessment::allowed(false)
            }
            ActionKind::SystemOpenUrl => {
                if arg_str(args, "url").is_none() && arg_str(args, "query").is_none() {
                    return Assessment::denied("Missing url or query argument.");
                }
                Assessment::allowed(false)
            }
        }
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn arg_str<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(windows)]
fn default_protected() -> Vec<PathBuf> {
    vec![
        PathBuf::from("C:\\Windows"),
        PathBuf::from("C:\\Program Files"),
        PathBuf::from("C:\\Program Files (x86)"),
    ]
}

#[cfg(not(windows))]
fn default_protected() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr"),
        PathBuf::from("/etc"),
        PathBuf::from("/bin"),
        PathBuf::from("/sbin"),
        PathBuf::from("/boot"),
    ]
}
