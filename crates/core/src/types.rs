use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What the assistant wants to happen next: either plain conversation
/// or a structured action request for the executor. This is the only
/// shape the interpreter ever produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AgentEvent {
    Reply {
        #[serde(default)]
        message: String,
    },
    Action {
        #[serde(rename = "action")]
        name: String,
        #[serde(default)]
        args: Map<String, Value>,
        #[serde(default)]
        message: String,
    },
}

impl AgentEvent {
    pub fn reply(message: impl Into<String>) -> Self {
        Self::Reply {
            message: message.into(),
        }
    }

    pub fn action(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self::Action {
            name: name.into(),
            args,
            message: String::new(),
        }
    }

    pub fn with_message(self, message: impl Into<String>) -> Self {
        match self {
            Self::Reply { .. } => Self::Reply {
                message: message.into(),
            },
            Self::Action { name, args, .. } => Self::Action {
                name,
                args,
                message: message.into(),
            },
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action { .. })
    }
}
