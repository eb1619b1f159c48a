use hana_app::config::Config;
use tempfile::TempDir;

#[test]
fn defaults_apply_when_no_settings_file() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_from(temp.path()).unwrap();

    assert_eq!(config.api_key, "");
    assert_eq!(config.model, "openrouter/auto");
    assert!(config.api_url.contains("openrouter.ai"));
    assert_eq!(config.language, "english");
    assert!(config.db_path.ends_with("hana.db"));
}

#[test]
fn settings_file_values_override_defaults() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("hana.env"),
        "# comment\nOPENROUTER_MODEL=vendor/model:free\nHANA_LANGUAGE=russian\n",
    )
    .unwrap();

    let config = Config::load_from(temp.path()).unwrap();
    assert_eq!(config.model, "vendor/model:free");
    assert_eq!(config.language, "russian");
}

#[test]
fn set_api_key_rewrites_only_its_line() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("hana.env"),
        "OPENROUTER_MODEL=vendor/model\nOPENROUTER_API_KEY=old\n# keep me\n",
    )
    .unwrap();

    let mut config = Config::load_from(temp.path()).unwrap();
    config.set_api_key("sk-new").unwrap();
    assert_eq!(config.api_key, "sk-new");

    let content = std::fs::read_to_string(temp.path().join("hana.env")).unwrap();
    assert!(content.contains("OPENROUTER_API_KEY=sk-new"));
    assert!(content.contains("OPENROUTER_MODEL=vendor/model"));
    assert!(content.contains("# keep me"));
    assert!(!content.contains("old"));
}

#[test]
fn set_model_creates_file_when_absent() {
    let temp = TempDir::new().unwrap();
    let mut config = Config::load_from(temp.path()).unwrap();
    config.set_model("vendor/other").unwrap();

    let reloaded = Config::load_from(temp.path()).unwrap();
    assert_eq!(reloaded.model, "vendor/other");
}
