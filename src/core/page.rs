//! Page selection, form state, and request dispatch.
//!
//! Exactly one [`Page`] is active at a time. A page turns its form into a
//! [`UserRequest`] on submit; [`PageController::handle`] performs the one
//! external call for that request and reports what to display as
//! [`PageEvent`]s.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::TextArea;

use crate::core::client::{GenerationError, GenerationService};
use crate::core::formatter::to_markdown;
use crate::core::session::ChatSession;
use crate::core::upload::{ImageError, ImageUpload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Generate,
    Chat,
    VisionGenerate,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Generate, Mode::Chat, Mode::VisionGenerate];

    /// Label shown in the navigation list.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Generate => "Content Creator",
            Mode::Chat => "Chat Assistant",
            Mode::VisionGenerate => "Content Creation with Image",
        }
    }

    pub fn page_title(self) -> &'static str {
        match self {
            Mode::Generate => "✨ Content Creator AI",
            Mode::Chat => "🤖 Chat Assistant",
            Mode::VisionGenerate => "Content Creation with Image 🖼️",
        }
    }

    pub fn action_label(self) -> &'static str {
        match self {
            Mode::Generate => "Generate Content",
            Mode::Chat => "Send",
            Mode::VisionGenerate => "Tell me about the image",
        }
    }

    pub fn config_key(self) -> &'static str {
        match self {
            Mode::Generate => "generate",
            Mode::Chat => "chat",
            Mode::VisionGenerate => "vision",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Mode> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.config_key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn index(self) -> usize {
        match self {
            Mode::Generate => 0,
            Mode::Chat => 1,
            Mode::VisionGenerate => 2,
        }
    }

    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }

    pub fn previous(self) -> Mode {
        Mode::ALL[(self.index() + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }
}

/// One submit's worth of input, carrying only what its mode needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRequest {
    Generate {
        prompt: String,
    },
    Chat {
        message: String,
    },
    VisionGenerate {
        prompt: String,
        secondary: Option<String>,
        image: ImageUpload,
    },
}

impl UserRequest {
    pub fn mode(&self) -> Mode {
        match self {
            UserRequest::Generate { .. } => Mode::Generate,
            UserRequest::Chat { .. } => Mode::Chat,
            UserRequest::VisionGenerate { .. } => Mode::VisionGenerate,
        }
    }

    /// The user's own text, for the transcript.
    pub fn summary(&self) -> String {
        match self {
            UserRequest::Generate { prompt } => prompt.clone(),
            UserRequest::Chat { message } => message.clone(),
            UserRequest::VisionGenerate {
                prompt,
                secondary,
                image,
            } => match secondary {
                Some(extra) => format!("{prompt}\n{extra}\n[image: {}]", image.file_name()),
                None => format!("{prompt}\n[image: {}]", image.file_name()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBlock {
    Heading(String),
    /// Markdown block quote produced by the formatter.
    Quote(String),
    Line(String),
    /// Streamed reply text; consecutive chunks extend the same block.
    Streamed(String),
    /// Validation feedback; no call was made.
    Notice(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Output(OutputBlock),
    Chunk(String),
    ChatRecorded { user: String, reply: String },
    Finished,
}

/// Channel end tagged with the render that issued the request.
#[derive(Clone)]
pub struct PageSink {
    tx: mpsc::UnboundedSender<(PageEvent, u64)>,
    render_id: u64,
}

impl PageSink {
    pub fn new(tx: mpsc::UnboundedSender<(PageEvent, u64)>, render_id: u64) -> Self {
        Self { tx, render_id }
    }

    fn emit(&self, event: PageEvent) {
        let _ = self.tx.send((event, self.render_id));
    }

    fn output(&self, block: OutputBlock) {
        self.emit(PageEvent::Output(block));
    }

    fn error(&self, err: &GenerationError) {
        self.output(OutputBlock::Error(format!("An error occurred: {err}")));
    }
}

pub struct GenerateForm {
    pub topic: TextArea<'static>,
}

pub struct ChatForm {
    pub input: TextArea<'static>,
    pub session: ChatSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionField {
    Prompt,
    ImagePath,
    Extra,
}

pub struct VisionForm {
    pub prompt: TextArea<'static>,
    pub image_path: TextArea<'static>,
    pub extra: TextArea<'static>,
    pub image: Option<ImageUpload>,
    attached_from: Option<String>,
    pub focus: VisionField,
}

impl VisionForm {
    fn new() -> Self {
        Self {
            prompt: TextArea::default(),
            image_path: TextArea::default(),
            extra: TextArea::default(),
            image: None,
            attached_from: None,
            focus: VisionField::Prompt,
        }
    }

    /// Load the image named by the path field. Clears any previous image on failure.
    pub fn attach_image(&mut self) -> Result<&ImageUpload, ImageError> {
        let raw = single_line(&self.image_path);
        let path = expand_path(&raw);
        match ImageUpload::from_path(&path) {
            Ok(upload) => {
                debug!(file = upload.file_name(), bytes = upload.byte_len(), "image attached");
                self.attached_from = Some(raw);
                Ok(self.image.insert(upload))
            }
            Err(err) => {
                self.image = None;
                self.attached_from = None;
                Err(err)
            }
        }
    }

    fn path_changed(&self) -> bool {
        let current = single_line(&self.image_path);
        !current.is_empty() && self.attached_from.as_deref() != Some(current.as_str())
    }

    fn path_is_blank(&self) -> bool {
        single_line(&self.image_path).trim().is_empty()
    }

    /// The loaded image, unless the path field has since been emptied.
    pub fn attached_image(&self) -> Option<&ImageUpload> {
        if self.path_is_blank() {
            return None;
        }
        self.image.as_ref()
    }

    pub fn focused_textarea(&mut self) -> &mut TextArea<'static> {
        match self.focus {
            VisionField::Prompt => &mut self.prompt,
            VisionField::ImagePath => &mut self.image_path,
            VisionField::Extra => &mut self.extra,
        }
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus = match (self.focus, forward) {
            (VisionField::Prompt, true) => VisionField::ImagePath,
            (VisionField::ImagePath, true) => VisionField::Extra,
            (VisionField::Extra, true) => VisionField::Prompt,
            (VisionField::Prompt, false) => VisionField::Extra,
            (VisionField::ImagePath, false) => VisionField::Prompt,
            (VisionField::Extra, false) => VisionField::ImagePath,
        };
    }
}

pub enum Page {
    Generate(GenerateForm),
    Chat(ChatForm),
    VisionGenerate(VisionForm),
}

impl Page {
    /// A fresh page with empty fields.
    pub fn new(mode: Mode) -> Self {
        match mode {
            Mode::Generate => Page::Generate(GenerateForm {
                topic: TextArea::default(),
            }),
            Mode::Chat => Page::Chat(ChatForm {
                input: TextArea::default(),
                session: ChatSession::new(),
            }),
            Mode::VisionGenerate => Page::VisionGenerate(VisionForm::new()),
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Page::Generate(_) => Mode::Generate,
            Page::Chat(_) => Mode::Chat,
            Page::VisionGenerate(_) => Mode::VisionGenerate,
        }
    }

    /// The field that receives typed keys.
    pub fn active_textarea(&mut self) -> &mut TextArea<'static> {
        match self {
            Page::Generate(form) => &mut form.topic,
            Page::Chat(form) => &mut form.input,
            Page::VisionGenerate(form) => form.focused_textarea(),
        }
    }

    /// Whether Enter inserts a newline instead of submitting.
    pub fn active_field_is_multiline(&self) -> bool {
        matches!(
            self,
            Page::VisionGenerate(VisionForm {
                focus: VisionField::Prompt,
                ..
            })
        )
    }

    pub fn chat_session(&self) -> Option<&ChatSession> {
        match self {
            Page::Chat(form) => Some(&form.session),
            _ => None,
        }
    }

    /// Read every field now and build the request, or explain what is missing.
    pub fn submit(&mut self) -> Result<UserRequest, String> {
        match self {
            Page::Generate(form) => {
                let prompt = single_line(&form.topic);
                if prompt.trim().is_empty() {
                    return Err("Enter a question or topic first.".to_string());
                }
                Ok(UserRequest::Generate { prompt })
            }
            Page::Chat(form) => {
                let message = single_line(&form.input);
                if message.trim().is_empty() {
                    return Err("Type a message first.".to_string());
                }
                Ok(UserRequest::Chat { message })
            }
            Page::VisionGenerate(form) => {
                if form.path_is_blank() {
                    form.image = None;
                    form.attached_from = None;
                } else if form.path_changed() {
                    form.attach_image().map_err(|err| err.to_string())?;
                }
                let Some(image) = form.image.clone() else {
                    return Err("Upload an image before generating.".to_string());
                };
                let prompt = form.prompt.lines().join("\n");
                if prompt.trim().is_empty() {
                    return Err("Enter a prompt for the image first.".to_string());
                }
                let extra = single_line(&form.extra);
                let secondary = (!extra.is_empty()).then_some(extra);
                Ok(UserRequest::VisionGenerate {
                    prompt,
                    secondary,
                    image,
                })
            }
        }
    }
}

fn single_line(textarea: &TextArea<'_>) -> String {
    textarea.lines().join(" ")
}

/// Accept paths pasted with surrounding quotes and a leading `~/`.
fn expand_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(trimmed)
}

/// Runs one request against the generation service.
#[derive(Clone)]
pub struct PageController {
    service: Arc<dyn GenerationService>,
}

impl PageController {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Perform the call for `request` and report output through `sink`.
    ///
    /// Always ends with [`PageEvent::Finished`]; failures become an error
    /// block and never escape.
    pub async fn handle(&self, request: UserRequest, session: ChatSession, sink: &PageSink) {
        info!(mode = ?request.mode(), "handling request");
        match request {
            UserRequest::Generate { prompt } => {
                match self.service.generate_content(&prompt).await {
                    Ok(result) => {
                        sink.output(OutputBlock::Heading("Generated Content:".to_string()));
                        sink.output(OutputBlock::Quote(to_markdown(&result.text)));
                    }
                    Err(err) => sink.error(&err),
                }
            }
            UserRequest::Chat { message } => self.chat(message, session, sink).await,
            UserRequest::VisionGenerate {
                prompt,
                secondary,
                image,
            } => {
                match self
                    .service
                    .generate_content_multimodal(&prompt, secondary.as_deref(), &image)
                    .await
                {
                    Ok(result) => {
                        sink.output(OutputBlock::Heading("Generated Content:".to_string()));
                        sink.output(OutputBlock::Quote(to_markdown(&result.text)));
                    }
                    Err(err) => sink.error(&err),
                }
            }
        }
        sink.emit(PageEvent::Finished);
    }

    async fn chat(&self, message: String, session: ChatSession, sink: &PageSink) {
        let mut stream = match self.service.send_message(&session, &message).await {
            Ok(stream) => stream,
            Err(err) => {
                sink.error(&err);
                return;
            }
        };

        sink.output(OutputBlock::Heading("Chat History:".to_string()));
        for turn in session.history() {
            sink.output(OutputBlock::Line(format!("{}: {}", turn.role, turn.text)));
        }
        sink.output(OutputBlock::Heading("The Response is:".to_string()));

        let mut reply = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => {
                    reply.push_str(&chunk);
                    sink.emit(PageEvent::Chunk(chunk));
                }
                Err(err) => {
                    sink.error(&err);
                    return;
                }
            }
        }

        // An empty model turn would be replayed on every later send
        if reply.is_empty() {
            sink.error(&GenerationError::EmptyResponse { reason: None });
            return;
        }

        sink.emit(PageEvent::ChatRecorded {
            user: message,
            reply,
        });
    }
}
