use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};
use crate::core::page::Mode;

pub const THEMES: [&str; 2] = ["dark", "light"];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model for the content and chat pages (e.g., "gemini-1.5-flash")
    pub text_model: Option<String>,
    /// Model for the image page
    pub vision_model: Option<String>,
    /// API root, up to and including the version segment
    pub base_url: Option<String>,
    /// Page shown at startup: "generate", "chat" or "vision"
    pub default_page: Option<String>,
    /// UI theme name ("dark" or "light")
    pub theme: Option<String>,
    /// Render generated quotes as markdown instead of raw text
    pub markdown: Option<bool>,
}

/// Keys accepted by `era set` / `era unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    TextModel,
    VisionModel,
    BaseUrl,
    DefaultPage,
    Theme,
    Markdown,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::TextModel,
        ConfigKey::VisionModel,
        ConfigKey::BaseUrl,
        ConfigKey::DefaultPage,
        ConfigKey::Theme,
        ConfigKey::Markdown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::TextModel => "text-model",
            ConfigKey::VisionModel => "vision-model",
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::DefaultPage => "default-page",
            ConfigKey::Theme => "theme",
            ConfigKey::Markdown => "markdown",
        }
    }

    pub fn parse(name: &str) -> Result<Self, SettingError> {
        let normalized = name.trim().replace('_', "-").to_ascii_lowercase();
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| SettingError::UnknownKey(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue {
        key: &'static str,
        value: String,
        expected: String,
    },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.name()).collect();
                write!(f, "Unknown config key: {key} (known keys: {})", known.join(", "))
            }
            SettingError::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "Invalid value '{value}' for {key}: expected {expected}"),
        }
    }
}

impl StdError for SettingError {}

/// Get a user-friendly display string for a path
/// Converts absolute paths under the home directory to `~` notation on Unix-like systems
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

fn parse_bool(key: ConfigKey, value: &str) -> Result<bool, SettingError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(SettingError::InvalidValue {
            key: key.name(),
            value: value.to_string(),
            expected: "on or off".to_string(),
        }),
    }
}

fn non_empty(key: ConfigKey, value: &str) -> Result<String, SettingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SettingError::InvalidValue {
            key: key.name(),
            value: value.to_string(),
            expected: "a non-empty value".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

impl Config {
    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn vision_model(&self) -> &str {
        self.vision_model.as_deref().unwrap_or(DEFAULT_VISION_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Startup page; unknown names fall back to the content page.
    pub fn default_mode(&self) -> Mode {
        self.default_page
            .as_deref()
            .and_then(Mode::from_config_key)
            .unwrap_or(Mode::Generate)
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown.unwrap_or(true)
    }

    /// Validate and store `value` under `key`. Returns the stored display value.
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<String, SettingError> {
        match key {
            ConfigKey::TextModel => {
                let model = non_empty(key, value)?;
                self.text_model = Some(model.clone());
                Ok(model)
            }
            ConfigKey::VisionModel => {
                let model = non_empty(key, value)?;
                self.vision_model = Some(model.clone());
                Ok(model)
            }
            ConfigKey::BaseUrl => {
                let url = non_empty(key, value)?;
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(SettingError::InvalidValue {
                        key: key.name(),
                        value: value.to_string(),
                        expected: "an http(s) URL".to_string(),
                    });
                }
                self.base_url = Some(url.clone());
                Ok(url)
            }
            ConfigKey::DefaultPage => match Mode::from_config_key(value) {
                Some(mode) => {
                    self.default_page = Some(mode.config_key().to_string());
                    Ok(mode.config_key().to_string())
                }
                None => Err(SettingError::InvalidValue {
                    key: key.name(),
                    value: value.to_string(),
                    expected: "generate, chat or vision".to_string(),
                }),
            },
            ConfigKey::Theme => {
                let theme = value.trim().to_ascii_lowercase();
                if !THEMES.contains(&theme.as_str()) {
                    return Err(SettingError::InvalidValue {
                        key: key.name(),
                        value: value.to_string(),
                        expected: THEMES.join(" or "),
                    });
                }
                self.theme = Some(theme.clone());
                Ok(theme)
            }
            ConfigKey::Markdown => {
                let enabled = parse_bool(key, value)?;
                self.markdown = Some(enabled);
                Ok(if enabled { "on" } else { "off" }.to_string())
            }
        }
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::TextModel => self.text_model = None,
            ConfigKey::VisionModel => self.vision_model = None,
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::DefaultPage => self.default_page = None,
            ConfigKey::Theme => self.theme = None,
            ConfigKey::Markdown => self.markdown = None,
        }
    }
}
