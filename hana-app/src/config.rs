use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "hana.env";
const DEFAULT_MODEL: &str = "openrouter/auto";
const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_LANGUAGE: &str = "english";

/// Runtime configuration, persisted as simple `KEY=VALUE` lines.
/// Process environment variables take precedence over the file.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub language: String,
    pub db_path: PathBuf,
    pub trash_dir: PathBuf,
    settings_path: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let base_dir = dirs::data_local_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("hana");
        let mut config = Self::load_from(&base_dir)?;

        // Environment wins over the settings file.
        let from_env = |key: &str, current: &mut String| {
            if let Ok(value) = std::env::var(key) {
                *current = value;
            }
        };
        from_env("OPENROUTER_API_KEY", &mut config.api_key);
        from_env("OPENROUTER_MODEL", &mut config.model);
        from_env("OPENROUTER_API_URL", &mut config.api_url);
        from_env("HANA_LANGUAGE", &mut config.language);
        Ok(config)
    }

    /// Load from an explicit base directory, file values only.
    pub fn load_from(base_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(base_dir)
            .with_context(|| format!("cannot create {}", base_dir.display()))?;
        let settings_path = base_dir.join(SETTINGS_FILE);
        let values = read_settings(&settings_path)?;
        let get = |key: &str, default: &str| {
            values
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            api_key: get("OPENROUTER_API_KEY", ""),
            model: get("OPENROUTER_MODEL", DEFAULT_MODEL),
            api_url: get("OPENROUTER_API_URL", DEFAULT_API_URL),
            language: get("HANA_LANGUAGE", DEFAULT_LANGUAGE),
            db_path: base_dir.join("hana.db"),
            trash_dir: base_dir.join(".hana_trash"),
            settings_path,
        })
    }

    /// Persist-then-apply: the settings file is rewritten first, the
    /// in-memory value only changes once that succeeds.
    pub fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        upsert_line(&self.settings_path, "OPENROUTER_API_KEY", api_key)?;
        self.api_key = api_key.to_string();
        Ok(())
    }

    pub fn set_model(&mut self, model: &str) -> Result<()> {
        upsert_line(&self.settings_path, "OPENROUTER_MODEL", model)?;
        self.model = model.to_string();
        Ok(())
    }

    pub fn set_language(&mut self, language: &str) -> Result<()> {
        upsert_line(&self.settings_path, "HANA_LANGUAGE", language)?;
        self.language = language.to_string();
        Ok(())
    }
}

fn read_settings(path: &Path) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    if !path.exists() {
        return Ok(values);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Ok(values)
}

/// Replace the one `KEY=` line, preserving every other line as-is.
fn upsert_line(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut lines: Vec<String> = if path.exists() {
        std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let prefix = format!("{key}=");
    let replacement = format!("{key}={value}");
    match lines.iter_mut().find(|l| l.starts_with(&prefix)) {
        Some(line) => *line = replacement,
        None => lines.push(replacement),
    }

    std::fs::write(path, lines.join("\n") + "\n")
        .with_context(|| format!("cannot write {}", path.display()))
}
