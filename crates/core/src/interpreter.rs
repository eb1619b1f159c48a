//! Turns a free-form LLM completion into a well-formed [`AgentEvent`],
//! tolerating model non-compliance. Never errors.

use crate::types::AgentEvent;
use hana_policy::canonical_name;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub const INVALID_JSON_MESSAGE: &str = "LLM returned invalid JSON.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "(empty response)";

pub fn interpret_completion(content: &str) -> AgentEvent {
    match extract_json(content) {
        Some(value) => normalize(value, content),
        None => AgentEvent::reply(INVALID_JSON_MESSAGE),
    }
}

/// Three-tier extraction: the whole string, then a fenced code block,
/// then the substring between the first `{` and the last `}`.
fn extract_json(content: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(content.trim()) {
        return Some(value);
    }

    if let Some(inner) = fenced_block(content) {
        if let Ok(value) = serde_json::from_str(inner) {
            return Some(value);
        }
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&content[start..=end]).ok()
}

fn fenced_block(content: &str) -> Option<&str> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence =
        FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());
    fence
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn normalize(value: Value, raw: &str) -> AgentEvent {
    let Value::Object(obj) = value else {
        return raw_reply(raw);
    };

    let type_tag = obj
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);
    match type_tag.as_deref() {
        Some("reply") => AgentEvent::reply(message_of(&obj)),
        Some("action") => build_action(obj),
        _ if obj.contains_key("action") => build_action(obj),
        _ if obj.contains_key("message") => AgentEvent::reply(message_of(&obj)),
        _ => raw_reply(raw),
    }
}

/// An action-typed object without a usable action name is demoted to a
/// plain reply; a non-object `args` is corrected to an empty map.
fn build_action(mut obj: Map<String, Value>) -> AgentEvent {
    let message = message_of(&obj);
    let name = obj
        .get("action")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if name.is_empty() {
        return AgentEvent::reply(message);
    }
    let name = canonical_name(name);

    let args = match obj.remove("args") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    AgentEvent::Action {
        name,
        args,
        message,
    }
}

fn message_of(obj: &Map<String, Value>) -> String {
    obj.get("message")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn raw_reply(raw: &str) -> AgentEvent {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        AgentEvent::reply(EMPTY_RESPONSE_MESSAGE)
    } else {
        AgentEvent::reply(trimmed)
    }
}
