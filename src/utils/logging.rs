//! Transcript logging to a user-chosen file, plus diagnostic `tracing` setup.

use chrono::Local;
use std::error::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// A path given on the command line starts logging immediately.
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn Error>> {
        self.test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(&mut self) -> Result<String, Box<dyn Error>> {
        match self.file_path.clone() {
            Some(path) => {
                if self.is_active {
                    // Record the pause before going quiet
                    self.log_header("Logging paused")?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    self.log_header("Logging resumed")?;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => Err("No log file specified. Start with --log <file> to enable logging.".into()),
        }
    }

    /// `## {title} ({timestamp})`
    pub fn log_header(&self, title: &str) -> Result<(), Box<dyn Error>> {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        self.log_message(&format!("## {title} ({stamp})"))
    }

    pub fn log_user(&self, text: &str) -> Result<(), Box<dyn Error>> {
        self.log_message(&format!("You: {text}"))
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn Error>> {
        match (&self.file_path, self.is_active) {
            (Some(path), true) => write_to_log(path, content),
            _ => Ok(()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn get_status_string(&self) -> String {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned()
        };
        match (&self.file_path, self.is_active) {
            (None, _) => "disabled".to_string(),
            (Some(path), true) => format!("active ({})", file_name(path)),
            (Some(path), false) => format!("paused ({})", file_name(path)),
        }
    }

    fn test_file_access(&self, path: &str) -> Result<(), Box<dyn Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.flush()?;
        Ok(())
    }
}

fn write_to_log(file_path: &str, content: &str) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;
    let mut writer = BufWriter::new(file);

    for line in content.lines() {
        writeln!(writer, "{line}")?;
    }
    // Blank line between entries
    writeln!(writer)?;

    writer.flush()?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send diagnostics to `trace_file`, or nowhere when absent.
///
/// The terminal UI owns stdout and stderr, so the TUI never logs to them.
pub fn init_tui_tracing(trace_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let Some(path) = trace_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;
    Ok(())
}

/// Diagnostics on stderr for the one-shot subcommands.
pub fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
