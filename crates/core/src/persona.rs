//! Mood and idle-chatter layer. Post-processes replies and produces
//! proactive lines after long silences; no side effects beyond its own
//! state.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use std::time::Duration;

const MOOD_DWELL: Duration = Duration::from_secs(600);
const PROACTIVE_SILENCE: Duration = Duration::from_secs(600);
const PROACTIVE_COOLDOWN: Duration = Duration::from_secs(8 * 60);
const MAX_REPLY_CHARS: usize = 140;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Sleepy,
    Playful,
    Focused,
    Annoyed,
    Proud,
    Caring,
}

#[derive(Debug, Clone, Copy)]
pub enum PersonaEvent {
    UserInput,
    LongFocus,
    LateGaming,
    Alarm,
}

pub struct MoodEngine {
    mood: Mood,
    last_change: Option<DateTime<Utc>>,
}

impl MoodEngine {
    pub fn new() -> Self {
        Self {
            mood: Mood::Focused,
            last_change: None,
        }
    }

    pub fn current(&self) -> Mood {
        self.mood
    }

    /// Time-of-day drift. Hour bands follow the timezone of `now`, so
    /// callers pass the user's wall clock, not UTC.
    pub fn tick<Tz: TimeZone>(&mut self, now: DateTime<Tz>, silence: Option<Duration>) {
        let hour = now.hour();
        let now = now.with_timezone(&Utc);
        match hour {
            0..=3 => self.set(Mood::Sleepy, now),
            22..=23 => self.set(Mood::Playful, now),
            5..=6 => self.set(Mood::Caring, now),
            7..=17 => {
                if silence.is_some_and(|s| s > Duration::from_secs(1800)) {
                    self.set(Mood::Focused, now);
                }
            }
            _ => {}
        }
    }

    pub fn apply_event<Tz: TimeZone>(&mut self, event: PersonaEvent, now: DateTime<Tz>) {
        let mood = match event {
            PersonaEvent::UserInput => Mood::Focused,
            PersonaEvent::LongFocus => Mood::Proud,
            PersonaEvent::LateGaming => Mood::Playful,
            PersonaEvent::Alarm => Mood::Caring,
        };
        self.set(mood, now.with_timezone(&Utc));
    }

    fn set(&mut self, mood: Mood, now: DateTime<Utc>) {
        // Re-stamping the same mood within the dwell window would let
        // frequent ticks pin the mood forever.
        if mood == self.mood {
            if let Some(last) = self.last_change {
                if now.signed_duration_since(last).num_seconds() < MOOD_DWELL.as_secs() as i64 {
                    return;
                }
            }
        }
        self.mood = mood;
        self.last_change = Some(now);
    }
}

impl Default for MoodEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Injects idle chatter after long silences, rate-limited by a cooldown.
pub struct ProactiveEngine {
    last: Option<DateTime<Utc>>,
}

impl ProactiveEngine {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn maybe<Tz: TimeZone>(
        &mut self,
        now: DateTime<Tz>,
        silence: Duration,
        mood: Mood,
    ) -> Option<String> {
        let hour = now.hour();
        let now = now.with_timezone(&Utc);
        if silence < PROACTIVE_SILENCE {
            return None;
        }
        if let Some(last) = self.last {
            if now.signed_duration_since(last).num_seconds() < PROACTIVE_COOLDOWN.as_secs() as i64 {
                return None;
            }
        }
        self.last = Some(now);

        let line = if hour >= 23 || hour < 3 {
            "You still awake? Come curl up and rest~"
        } else if (5..7).contains(&hour) {
            "Morning already... want me to nudge you up?"
        } else if (19..=22).contains(&hour) && mood == Mood::Playful {
            "Game time? I'll cheer quietly, promise."
        } else if silence > Duration::from_secs(3600) {
            "You're deep in focus, huh? I'm here when you need me."
        } else {
            "It's quiet... need a hand or just vibes?"
        };
        Some(line.to_string())
    }
}

impl Default for ProactiveEngine {
    fn default() -> Self {
        Self::new()
    }
}

const SOFTENERS: &[(&str, &str)] = &[
    ("enabled", "on"),
    ("completed", "done"),
    ("executed", "done"),
    ("processing", "on it"),
    ("initialized", "ready"),
    ("request", "ask"),
    ("response", "reply"),
];

fn soften(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in SOFTENERS {
        out = out.replace(from, to);
        out = out.replace(&capitalize(from), &capitalize(to));
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Apply mood styling to a reply: soften stiff words, clamp length,
/// add the mood's prefix and suffix.
pub fn style_reply(text: &str, mood: Mood) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut base: String = soften(text).trim().to_string();
    if base.chars().count() > MAX_REPLY_CHARS {
        base = base.chars().take(MAX_REPLY_CHARS - 4).collect::<String>();
        base = base.trim_end().to_string() + "...";
    }
    let (prefix, suffix) = match mood {
        Mood::Sleepy => ("mmh? ", " zzz"),
        Mood::Playful => ("", "~"),
        Mood::Annoyed => ("hey, ", ""),
        Mood::Proud => ("told you I got this. ", ""),
        Mood::Caring => ("hey love, ", ""),
        Mood::Focused => ("", ""),
    };
    format!("{prefix}{base}{suffix}")
}
