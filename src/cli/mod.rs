//! Command-line interface parsing and handling
//!
//! Resolves startup settings from the config file and flags, then either runs
//! a one-shot command or starts the studio.

pub mod model_list;
pub mod say;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::cli::model_list::list_models;
use crate::cli::say::{run_describe, run_say};
use crate::core::app::AppInitConfig;
use crate::core::client::{ClientConfig, GeminiClient};
use crate::core::config::{Config, ConfigKey};
use crate::core::credentials::Credentials;
use crate::core::page::Mode;
use crate::ui::chat_loop::run_studio;
use crate::ui::theme::Theme;
use crate::utils::logging::{init_stderr_tracing, init_tui_tracing};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    " with rustc ",
    env!("VERGEN_RUSTC_SEMVER"),
    ")"
);

#[derive(Parser)]
#[command(name = "era", version, long_version = LONG_VERSION)]
#[command(about = "A terminal studio for the Gemini API")]
#[command(
    long_about = "Era is a full-screen terminal studio for generating content, chatting, and \
describing images with Google's Gemini models.\n\n\
Environment Variables:\n\
  GOOGLE_API_KEY    Your Gemini API key (required; may also live in a .env file)\n\
  RUST_LOG          Diagnostic filter for --trace output (defaults to info)\n\n\
Controls:\n\
  F1 / F2 / F3      Content Creator / Chat Assistant / Content Creation with Image\n\
  Ctrl+Left/Right   Previous / next page\n\
  Enter             Run the page action (Ctrl+G in the image prompt field)\n\
  Tab / Shift+Tab   Move between fields on the image page\n\
  Ctrl+O            Load the image at the entered path\n\
  PageUp/PageDown   Scroll the output\n\
  Ctrl+L            Pause or resume the transcript log\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Text model for the Content Creator and Chat Assistant pages
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model for the image page
    #[arg(long, global = true, value_name = "MODEL")]
    pub vision_model: Option<String>,

    /// Append prompts and responses to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub trace: Option<String>,

    /// Page to open on start (generate, chat, vision)
    #[arg(long, global = true, value_name = "PAGE")]
    pub page: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the studio (default)
    Studio,
    /// Generate content for a prompt and print it
    Say {
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// Generate content about an image and print it
    Describe {
        /// Path to a .jpg, .jpeg or .png file
        image: PathBuf,
        /// Additional input sent between the prompt and the image
        #[arg(long, value_name = "TEXT")]
        extra: Option<String>,
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// List models that support content generation
    Models,
    /// Set a configuration value, or show the configuration when no value is given
    Set {
        /// One of text-model, vision-model, base-url, default-page, theme, markdown
        key: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Remove a configuration value
    Unset { key: String },
}

/// Settings shared by every command that talks to the API.
struct Resolved {
    config: Config,
    text_model: String,
    vision_model: String,
}

impl Resolved {
    fn new(config: Config, args: &Args) -> Self {
        let text_model = args
            .model
            .clone()
            .unwrap_or_else(|| config.text_model().to_string());
        let vision_model = args
            .vision_model
            .clone()
            .unwrap_or_else(|| config.vision_model().to_string());
        Self {
            config,
            text_model,
            vision_model,
        }
    }

    fn client(&self) -> Result<GeminiClient, Box<dyn Error>> {
        let credentials = Credentials::from_env()?;
        let mut client_config = ClientConfig::new(credentials);
        client_config.base_url = self.config.base_url().to_string();
        client_config.text_model = self.text_model.clone();
        client_config.vision_model = self.vision_model.clone();
        Ok(GeminiClient::new(client_config))
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        None | Some(Commands::Studio) => run_studio_command(&args).await,
        Some(Commands::Say { ref prompt }) => {
            init_stderr_tracing();
            let resolved = Resolved::new(Config::load()?, &args);
            let client = resolved.client()?;
            run_say(&client, &prompt.join(" "), resolved.config.markdown_enabled()).await
        }
        Some(Commands::Describe {
            ref image,
            ref extra,
            ref prompt,
        }) => {
            init_stderr_tracing();
            let resolved = Resolved::new(Config::load()?, &args);
            let client = resolved.client()?;
            run_describe(
                &client,
                image,
                &prompt.join(" "),
                extra.as_deref(),
                resolved.config.markdown_enabled(),
            )
            .await
        }
        Some(Commands::Models) => {
            init_stderr_tracing();
            let config = Config::load()?;
            let credentials = Credentials::from_env()?;
            list_models(config.base_url(), credentials.api_key()).await
        }
        Some(Commands::Set { ref key, ref value }) => {
            let key = ConfigKey::parse(key)?;
            let mut config = Config::load()?;
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let stored = config.set_value(key, &value.join(" "))?;
            config.save()?;
            println!("✅ Set {} to: {stored}", key.name());
            Ok(())
        }
        Some(Commands::Unset { ref key }) => {
            let key = ConfigKey::parse(key)?;
            let mut config = Config::load()?;
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.name());
            Ok(())
        }
    }
}

async fn run_studio_command(args: &Args) -> Result<(), Box<dyn Error>> {
    init_tui_tracing(args.trace.as_deref())?;

    let resolved = Resolved::new(Config::load()?, args);
    let mode = match args.page.as_deref() {
        Some(page) => Mode::from_config_key(page).ok_or_else(|| {
            format!("Unknown page '{page}'. Expected one of: generate, chat, vision")
        })?,
        None => resolved.config.default_mode(),
    };
    let client = resolved.client()?;

    info!(
        text_model = %resolved.text_model,
        vision_model = %resolved.vision_model,
        page = mode.config_key(),
        "starting studio"
    );

    let init = AppInitConfig {
        mode,
        theme: Theme::from_name(resolved.config.theme.as_deref().unwrap_or("dark")),
        markdown_enabled: resolved.config.markdown_enabled(),
        log_file: args.log.clone(),
        text_model: resolved.text_model,
        vision_model: resolved.vision_model,
    };
    run_studio(init, Arc::new(client)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_studio() {
        let args = Args::try_parse_from(["era", "--page", "chat", "-m", "gemini-pro"])
            .expect("args");
        assert!(args.command.is_none());
        assert_eq!(args.page.as_deref(), Some("chat"));
        assert_eq!(args.model.as_deref(), Some("gemini-pro"));
    }

    #[test]
    fn say_joins_prompt_words() {
        let args = Args::try_parse_from(["era", "say", "tell", "me", "a", "joke"]).expect("args");
        match args.command {
            Some(Commands::Say { prompt }) => assert_eq!(prompt.join(" "), "tell me a joke"),
            _ => panic!("expected say"),
        }
    }

    #[test]
    fn describe_takes_image_extra_and_prompt() {
        let args = Args::try_parse_from([
            "era",
            "describe",
            "--extra",
            "Focus on colors",
            "kite.png",
            "What",
            "is",
            "this?",
        ])
        .expect("args");
        match args.command {
            Some(Commands::Describe {
                image,
                extra,
                prompt,
            }) => {
                assert_eq!(image, PathBuf::from("kite.png"));
                assert_eq!(extra.as_deref(), Some("Focus on colors"));
                assert_eq!(prompt.join(" "), "What is this?");
            }
            _ => panic!("expected describe"),
        }
    }

    #[test]
    fn set_value_may_span_words_and_be_absent() {
        let args = Args::try_parse_from(["era", "set", "theme"]).expect("args");
        assert!(matches!(args.command, Some(Commands::Set { value, .. }) if value.is_empty()));

        let args = Args::try_parse_from(["era", "set", "text-model", "gemini-1.5-pro"])
            .expect("args");
        assert!(
            matches!(args.command, Some(Commands::Set { value, .. }) if value == ["gemini-1.5-pro"])
        );
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let args = Args::try_parse_from(["era", "models", "--trace", "era.trace"]).expect("args");
        assert_eq!(args.trace.as_deref(), Some("era.trace"));
    }
}
