use crate::{ToolError, ToolOutput};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, warn};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub fn youtube_search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

pub fn google_search_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query)
    )
}

fn video_id_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r#""videoId":"([a-zA-Z0-9_-]{11})""#).unwrap(),
            Regex::new(r"watch\?v=([a-zA-Z0-9_-]{11})").unwrap(),
        ]
    })
}

pub fn extract_video_id(html: &str) -> Option<&str> {
    video_id_patterns()
        .iter()
        .find_map(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Scrape the first video id off the results page. Best effort: any
/// network or parse failure degrades to the plain search URL.
async fn youtube_first_url(query: &str) -> Option<String> {
    let search_url = youtube_search_url(query);
    let client = reqwest::Client::new();
    let html = client
        .get(&search_url)
        .header("User-Agent", USER_AGENT)
        .timeout(LOOKUP_TIMEOUT)
        .send()
        .await
        .ok()?
        .text()
        .await
        .ok()?;

    let id = extract_video_id(&html)?;
    Some(format!("https://www.youtube.com/watch?v={id}&autoplay=1"))
}

/// Open a URL in the default browser. Accepts a bare `url`, a `query`
/// that falls back to web search, or a YouTube provider mode that can
/// resolve first-result playback.
pub async fn open_url(args: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
    let arg = |key: &str| args.get(key).and_then(Value::as_str).map(str::to_string);
    let mut url = arg("url");
    let query = arg("query");
    let provider = arg("provider").unwrap_or_default().to_lowercase();
    let play = args
        .get("play")
        .or_else(|| args.get("play_first"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if provider == "youtube" {
        if let Some(q) = &query {
            url = if play {
                match youtube_first_url(q).await {
                    Some(watch) => Some(watch),
                    None => {
                        warn!(query = %q, "first-result lookup failed, opening search page");
                        Some(youtube_search_url(q))
                    }
                }
            } else {
                Some(youtube_search_url(q))
            };
        } else if url.is_none() {
            url = Some("https://www.youtube.com".to_string());
        }
    }

    if url.is_none() {
        if let Some(q) = &query {
            url = Some(google_search_url(q));
        }
    }

    let Some(url) = url else {
        return Err(ToolError::Validation("Missing url or query.".to_string()));
    };

    debug!(%url, "opening in browser");
    open::that(&url)?;
    Ok(json!({ "opened": url }))
}
