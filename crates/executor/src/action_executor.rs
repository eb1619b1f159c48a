//! The sole authorized caller of OS-affecting tool functions. Gates
//! every request through the safety policy, runs the confirmation
//! protocol for risky actions, and appends every dispatch attempt to
//! the audit log.

use crate::audit_log::AuditLog;
use hana_policy::{ActionKind, SafetyPolicy};
use hana_tools::{file_tools, system_tools, web, ToolError};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Result of one execution attempt, shaped for the wire as
/// `{status, message, ...}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success { message: String, result: Value },
    Denied { message: String },
    NeedsConfirmation { token: Uuid, message: String },
    Error { message: String },
}

struct PendingAction {
    action: String,
    args: Map<String, Value>,
}

#[derive(Debug, Error)]
enum DispatchError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Missing {0} argument.")]
    MissingArg(&'static str),
    #[error(transparent)]
    Tool(#[from] ToolError),
}

pub struct Executor {
    policy: SafetyPolicy,
    log: AuditLog,
    trash_dir: PathBuf,
    pending: Mutex<HashMap<Uuid, PendingAction>>,
}

impl Executor {
    pub fn new(policy: SafetyPolicy, log: AuditLog, trash_dir: PathBuf) -> Self {
        Self {
            policy,
            log,
            trash_dir,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Assess and, if permitted, run an action. A risky action is not
    /// run on the first call: the caller gets a confirmation token and
    /// must come back through [`Executor::confirm`]. That probe writes
    /// no audit row.
    pub async fn execute(&self, action: &str, args: &Map<String, Value>) -> Outcome {
        let assessment = self.policy.assess(action, args);
        if !assessment.allowed {
            self.append_log(action, args, "denied", &assessment.reason);
            return Outcome::Denied {
                message: assessment.reason,
            };
        }

        if assessment.risky {
            let token = Uuid::new_v4();
            self.pending.lock().insert(
                token,
                PendingAction {
                    action: action.to_string(),
                    args: args.clone(),
                },
            );
            info!(%token, action, "risky action awaiting confirmation");
            return Outcome::NeedsConfirmation {
                token,
                message: assessment.reason,
            };
        }

        self.dispatch(action, args).await
    }

    /// Run a previously probed risky action. The token correlates the
    /// confirming call with the exact request that was assessed, so an
    /// interleaved second request cannot be confirmed by mistake.
    pub async fn confirm(&self, token: Uuid) -> Outcome {
        let Some(pending) = self.pending.lock().remove(&token) else {
            return Outcome::Denied {
                message: "Unknown or expired confirmation token.".to_string(),
            };
        };
        self.dispatch(&pending.action, &pending.args).await
    }

    /// Drop a pending confirmation. No audit row is written.
    pub fn cancel(&self, token: Uuid) -> bool {
        self.pending.lock().remove(&token).is_some()
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.log
    }

    async fn dispatch(&self, action: &str, args: &Map<String, Value>) -> Outcome {
        match self.run_tool(action, args).await {
            Ok(result) => {
                self.append_log(action, args, "success", "OK");
                Outcome::Success {
                    message: "Action executed.".to_string(),
                    result,
                }
            }
            Err(e) => {
                self.append_log(action, args, "error", &e.to_string());
                Outcome::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn run_tool(
        &self,
        action: &str,
        args: &Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        let kind = ActionKind::from_name(action)
            .ok_or_else(|| DispatchError::UnknownAction(action.to_string()))?;

        // Tool functions only ever see normalized paths, never the raw
        // model-supplied strings the policy assessed.
        let path_arg = |key: &'static str| -> Result<PathBuf, DispatchError> {
            args.get(key)
                .and_then(Value::as_str)
                .map(|raw| self.policy.normalize(raw))
                .ok_or(DispatchError::MissingArg(key))
        };

        let result = match kind {
            ActionKind::FileOpen => file_tools::open_file(&path_arg("path")?)?,
            ActionKind::FileRename => {
                file_tools::rename_file(&path_arg("src")?, &path_arg("dst")?).await?
            }
            ActionKind::FileMove => {
                file_tools::move_file(&path_arg("src")?, &path_arg("dst")?).await?
            }
            ActionKind::FileDelete => {
                file_tools::delete_file(&path_arg("path")?, &self.trash_dir).await?
            }
            ActionKind::FileCreateFolder => file_tools::create_folder(&path_arg("path")?).await?,
            ActionKind::SystemLaunch => {
                let target = args
                    .get("target")
                    .and_then(Value::as_str)
                    .ok_or(DispatchError::MissingArg("target"))?;
                let extra: Vec<String> = args
                    .get("args")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                system_tools::launch_app(target, &extra)?
            }
            ActionKind::SystemOpenPath => system_tools::open_path(&path_arg("path")?)?,
            ActionKind::SystemOpenUrl => web::open_url(args).await?,
        };
        Ok(result)
    }

    fn append_log(&self, action: &str, args: &Map<String, Value>, status: &str, message: &str) {
        if let Err(e) = self.log.append(action, args, status, message) {
            error!(error = %e, action, status, "audit log write failed");
        }
    }
}
