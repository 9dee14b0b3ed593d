//! Era is a full-screen terminal studio for the Gemini API.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns page state, the generation client, chat sessions, image
//!   uploads, and configuration.
//! - [`ui`] renders the studio and runs the interactive event loop that feeds
//!   keystrokes to the active page and folds page events back into the view.
//! - [`api`] defines the request and response payloads of the Gemini REST API.
//! - [`utils`] carries transcript logging and URL helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which either runs a one-shot command or
//! starts [`ui::chat_loop::run_studio`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
