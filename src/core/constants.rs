//! Shared constants used across the application

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model for plain text generation and chat.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";

/// Model for prompts that carry an image.
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";

pub const APP_TITLE: &str = "Welcome to LLM Deepmind Era!";
