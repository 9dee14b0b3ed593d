//! Application state for the studio TUI.
//!
//! [`App`] owns the active [`Page`], the rendered output blocks, and the
//! bookkeeping that ties asynchronous [`PageEvent`]s back to the render that
//! asked for them.

use std::time::Instant;

use tracing::{debug, warn};

use crate::core::page::{Mode, OutputBlock, Page, PageEvent, UserRequest};
use crate::core::session::ChatSession;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;

/// Startup values resolved from the command line and the config file.
pub struct AppInitConfig {
    pub mode: Mode,
    pub text_model: String,
    pub vision_model: String,
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub log_file: Option<String>,
}

/// A request ready to hand to the page controller.
pub struct PendingRequest {
    pub request: UserRequest,
    pub session: ChatSession,
    pub render_id: u64,
}

pub struct App {
    pub page: Page,
    pub output: Vec<OutputBlock>,
    /// Bumped on every page switch and submit; events tagged with an older id are dropped.
    pub render_id: u64,
    pub busy: bool,
    pub status: Option<String>,
    pub theme: Theme,
    pub markdown_enabled: bool,
    pub logging: LoggingState,
    pub exit_requested: bool,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// Size of the output area at the last draw.
    pub output_viewport: (u16, u16),
    pub pulse_start: Instant,
    pub text_model: String,
    pub vision_model: String,
}

impl App {
    pub fn new(init: AppInitConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let logging = LoggingState::new(init.log_file)?;
        let app = App {
            page: Page::new(init.mode),
            output: Vec::new(),
            render_id: 0,
            busy: false,
            status: None,
            theme: init.theme,
            markdown_enabled: init.markdown_enabled,
            logging,
            exit_requested: false,
            scroll_offset: 0,
            auto_scroll: true,
            output_viewport: (0, 0),
            pulse_start: Instant::now(),
            text_model: init.text_model,
            vision_model: init.vision_model,
        };
        app.log_header(app.page.mode().label());
        Ok(app)
    }

    pub fn mode(&self) -> Mode {
        self.page.mode()
    }

    /// Model serving the current page.
    pub fn active_model(&self) -> &str {
        match self.mode() {
            Mode::VisionGenerate => &self.vision_model,
            Mode::Generate | Mode::Chat => &self.text_model,
        }
    }

    /// Replace the page with a fresh one. Re-selecting the current page is a no-op.
    pub fn select_mode(&mut self, mode: Mode) {
        if self.mode() == mode {
            return;
        }
        debug!(from = ?self.mode(), to = ?mode, "switching page");
        self.page = Page::new(mode);
        self.output.clear();
        self.render_id += 1;
        self.busy = false;
        self.status = None;
        self.scroll_offset = 0;
        self.auto_scroll = true;
        self.log_header(mode.label());
    }

    /// Validate the page and, if it is ready, start a new render for its request.
    ///
    /// Returns `None` when a request is still running or the page reported a
    /// validation notice.
    pub fn prepare_submit(&mut self) -> Option<PendingRequest> {
        if self.busy {
            self.status = Some("Still working on the previous request...".to_string());
            return None;
        }

        match self.page.submit() {
            Ok(request) => {
                let session = self.page.chat_session().cloned().unwrap_or_default();
                self.render_id += 1;
                self.output.clear();
                self.busy = true;
                self.status = None;
                self.scroll_offset = 0;
                self.auto_scroll = true;
                self.pulse_start = Instant::now();
                self.log_user(&request.summary());
                Some(PendingRequest {
                    request,
                    session,
                    render_id: self.render_id,
                })
            }
            Err(notice) => {
                self.output = vec![OutputBlock::Notice(notice)];
                None
            }
        }
    }

    /// Load the image named in the vision page's path field.
    pub fn attach_image(&mut self) {
        let Page::VisionGenerate(form) = &mut self.page else {
            return;
        };
        match form.attach_image() {
            Ok(image) => {
                self.status = Some(format!("Attached {}", image.file_name()));
                self.output.clear();
            }
            Err(err) => {
                self.output = vec![OutputBlock::Notice(err.to_string())];
            }
        }
    }

    /// Fold one controller event into the visible output.
    pub fn apply_event(&mut self, event: PageEvent, render_id: u64) {
        if render_id != self.render_id {
            debug!(render_id, current = self.render_id, "dropping stale page event");
            return;
        }

        match event {
            PageEvent::Output(block) => {
                self.log_block(&block);
                self.output.push(block);
            }
            PageEvent::Chunk(chunk) => match self.output.last_mut() {
                Some(OutputBlock::Streamed(text)) => text.push_str(&chunk),
                _ => self.output.push(OutputBlock::Streamed(chunk)),
            },
            PageEvent::ChatRecorded { user, reply } => {
                self.log_reply(&reply);
                if let Page::Chat(form) = &mut self.page {
                    form.session.record_exchange(user, reply);
                }
            }
            PageEvent::Finished => {
                self.busy = false;
            }
        }
    }

    pub fn toggle_logging(&mut self) {
        self.status = Some(match self.logging.toggle_logging() {
            Ok(message) => message,
            Err(err) => err.to_string(),
        });
    }

    /// Leaving auto-scroll starts from the bottom, where the view already is.
    pub fn scroll_up(&mut self, lines: u16, max_offset: u16) {
        if self.auto_scroll {
            self.scroll_offset = max_offset;
        }
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.min(max_offset).saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16, max_offset: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max_offset);
        if self.scroll_offset >= max_offset {
            self.auto_scroll = true;
        }
    }

    fn log_header(&self, title: &str) {
        if let Err(err) = self.logging.log_header(title) {
            warn!(%err, "failed to write transcript");
        }
    }

    fn log_user(&self, text: &str) {
        if let Err(err) = self.logging.log_user(text) {
            warn!(%err, "failed to write transcript");
        }
    }

    fn log_reply(&self, text: &str) {
        if let Err(err) = self.logging.log_message(text) {
            warn!(%err, "failed to write transcript");
        }
    }

    fn log_block(&self, block: &OutputBlock) {
        let text = match block {
            OutputBlock::Quote(text) | OutputBlock::Error(text) => text,
            _ => return,
        };
        self.log_reply(text);
    }
}
