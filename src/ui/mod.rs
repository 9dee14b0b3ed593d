//! Terminal UI layer for the studio.
//!
//! - [`chat_loop`]: the event loop that maps keys to page actions and applies
//!   [`crate::core::page::PageEvent`]s as they arrive.
//! - [`renderer`] and [`shell`]: frame layout, navigation sidebar, and fields.
//! - [`markdown`] and [`theme`]: output rendering and color policy.

pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod shell;
pub mod theme;
