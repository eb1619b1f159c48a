//! Local, network-free intent detection. Runs before the LLM call and
//! again as a fallback, so obvious open/play/search requests never
//! depend on provider availability.

use crate::types::AgentEvent;
use serde_json::{json, Map, Value};

const OPEN_VERBS: &[&str] = &[
    "open", "launch", "start", "run", "открой", "открыть", "запусти", "запустить",
];
const PLAY_VERBS: &[&str] = &[
    "play", "watch", "listen", "включи", "поставь", "сыграй", "посмотри", "послушай",
];
const SEARCH_VERBS: &[&str] = &[
    "search", "find", "google", "найди", "найти", "поищи", "загугли",
];
const YOUTUBE_TOKENS: &[&str] = &["youtube", "ютуб", "ютубе"];
const STOPWORDS: &[&str] = &[
    "a", "the", "on", "in", "and", "me", "please", "video", "song", "music", "на", "в",
    "и", "мне", "пожалуйста", "видео", "песню", "музыку",
];

/// Bare names the user can launch without a path.
const KNOWN_APPS: &[(&str, &str)] = &[
    ("telegram", "telegram"),
    ("tg", "telegram"),
    ("телеграм", "telegram"),
    ("explorer", "explorer"),
    ("notepad", "notepad"),
    ("calculator", "calculator"),
    ("калькулятор", "calculator"),
    ("terminal", "terminal"),
];

pub fn fast_path(text: &str) -> Option<AgentEvent> {
    if let Some(url) = find_url(text) {
        return Some(open_url_action(
            json!({ "url": url }),
            format!("Opening {url}"),
        ));
    }

    let tokens: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let has = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));
    let wants_open = has(OPEN_VERBS);
    let wants_play = has(PLAY_VERBS);
    let wants_search = has(SEARCH_VERBS);
    if !wants_open && !wants_play && !wants_search {
        return None;
    }

    if has(YOUTUBE_TOKENS) {
        let query = residual_query(&tokens);
        if query.is_empty() {
            return Some(open_url_action(
                json!({ "url": "https://www.youtube.com" }),
                "Opening YouTube".to_string(),
            ));
        }
        return Some(open_url_action(
            json!({ "provider": "youtube", "query": query, "play": wants_play }),
            format!("Looking up \"{query}\" on YouTube"),
        ));
    }

    for token in &tokens {
        if let Some((_, target)) = KNOWN_APPS.iter().find(|(alias, _)| *alias == token.as_str()) {
            let mut args = Map::new();
            args.insert("target".to_string(), json!(target));
            return Some(
                AgentEvent::action("system.launch", args)
                    .with_message(format!("Launching {target}")),
            );
        }
    }

    None
}

fn open_url_action(args: Value, message: String) -> AgentEvent {
    let args = args.as_object().cloned().unwrap_or_default();
    AgentEvent::action("system.open_url", args).with_message(message)
}

/// Whatever is left after verbs, platform words and stopwords is the
/// search query.
fn residual_query(tokens: &[String]) -> String {
    tokens
        .iter()
        .filter(|t| {
            let t = t.as_str();
            !OPEN_VERBS.contains(&t)
                && !PLAY_VERBS.contains(&t)
                && !SEARCH_VERBS.contains(&t)
                && !YOUTUBE_TOKENS.contains(&t)
                && !STOPWORDS.contains(&t)
        })
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn find_url(text: &str) -> Option<String> {
    for token in text.split_whitespace() {
        let lowered = token.to_lowercase();
        if lowered.contains("://") || lowered.starts_with("www.") {
            let trimmed = token.trim_end_matches(['.', ',', '!', '?', ';', ':', ')']);
            if lowered.starts_with("www.") {
                return Some(format!("https://{trimmed}"));
            }
            return Some(trimmed.to_string());
        }
    }
    None
}
