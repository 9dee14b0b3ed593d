use super::data::{path_display, Config, ConfigKey, SettingError};
use super::io::ConfigError;
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_TEXT_MODEL};
use crate::core::page::Mode;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.text_model(), DEFAULT_TEXT_MODEL);
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.default_mode(), Mode::Generate);
    assert!(config.markdown_enabled());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set_value(ConfigKey::TextModel, "gemini-pro")
        .expect("set text model");
    config
        .set_value(ConfigKey::DefaultPage, "chat")
        .expect("set page");
    config
        .set_value(ConfigKey::Markdown, "off")
        .expect("set markdown");
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded.text_model(), "gemini-pro");
    assert_eq!(loaded.default_mode(), Mode::Chat);
    assert!(!loaded.markdown_enabled());

    let mut loaded = loaded;
    loaded.unset_value(ConfigKey::TextModel);
    loaded
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(reloaded.text_model, None);
    assert_eq!(reloaded.default_page.as_deref(), Some("chat"));
}

#[test]
fn test_parse_error_names_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "text_model = [unterminated").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("invalid toml");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_reads_snake_case_file_written_by_hand() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "vision_model = \"gemini-pro-vision\"\ntheme = \"light\"\ndefault_page = \"vision\"\n",
    )
    .expect("write");

    let config = Config::load_from_path(&config_path).expect("load");
    assert_eq!(config.vision_model(), "gemini-pro-vision");
    assert_eq!(config.theme.as_deref(), Some("light"));
    assert_eq!(config.default_mode(), Mode::VisionGenerate);
}

#[test]
fn test_config_key_parsing() {
    assert_eq!(ConfigKey::parse("text-model"), Ok(ConfigKey::TextModel));
    assert_eq!(ConfigKey::parse("BASE_URL"), Ok(ConfigKey::BaseUrl));
    assert_eq!(
        ConfigKey::parse("default-provider"),
        Err(SettingError::UnknownKey("default-provider".to_string()))
    );
}

#[test]
fn test_set_value_validation() {
    let mut config = Config::default();
    assert!(config.set_value(ConfigKey::Theme, "solarized").is_err());
    assert!(config.set_value(ConfigKey::BaseUrl, "ftp://x").is_err());
    assert!(config.set_value(ConfigKey::DefaultPage, "translate").is_err());
    assert!(config.set_value(ConfigKey::Markdown, "maybe").is_err());
    assert!(config.set_value(ConfigKey::TextModel, "   ").is_err());
    assert_eq!(config, Config::default());

    assert_eq!(
        config.set_value(ConfigKey::Theme, "Light"),
        Ok("light".to_string())
    );
    assert_eq!(
        config.set_value(ConfigKey::DefaultPage, "VISION"),
        Ok("vision".to_string())
    );
}

#[test]
fn test_unknown_default_page_falls_back() {
    let config = Config {
        default_page: Some("sidebar".to_string()),
        ..Default::default()
    };
    assert_eq!(config.default_mode(), Mode::Generate);
}

#[test]
fn test_render_all_marks_defaults() {
    let config = Config {
        text_model: Some("gemini-pro".to_string()),
        ..Default::default()
    };
    let lines = config.render_all();
    assert_eq!(lines[0], "  text-model: gemini-pro");
    assert!(lines[1].ends_with("(default)"));
    assert_eq!(lines[5], "  markdown: on");
}

#[cfg(unix)]
#[test]
fn test_path_display_uses_tilde_under_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config").join("era");
        assert_eq!(path_display(&path), "~/.config/era");
    }
    assert_eq!(path_display("/etc/era"), "/etc/era");
}
