//! Adapter over the hosted generative-language API.
//!
//! [`GenerationService`] is the seam the page controller talks to;
//! [`GeminiClient`] is the production implementation. Every call is a single
//! request with no retry, and every failure comes back as a [`GenerationError`].

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::core::chat_stream::{chunk_stream, format_api_error, ChunkStream};
use crate::core::constants::{DEFAULT_BASE_URL, DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL};
use crate::core::credentials::Credentials;
use crate::core::session::ChatSession;
use crate::core::upload::ImageUpload;
use crate::utils::url::model_action_url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
}

/// Any failure of an external call. Callers render it; nothing retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The request never produced a response, or the body broke off.
    Transport(String),
    /// The service answered with an error status or an error event.
    Api {
        status: Option<u16>,
        message: String,
    },
    /// The body could not be parsed.
    Decode(String),
    /// The response parsed but carried no text (blocked prompt, empty candidate).
    EmptyResponse { reason: Option<String> },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Transport(msg) => write!(f, "Request failed: {msg}"),
            GenerationError::Api {
                status: Some(status),
                message,
            } => write!(f, "{message} [HTTP {status}]"),
            GenerationError::Api {
                status: None,
                message,
            } => f.write_str(message),
            GenerationError::Decode(msg) => write!(f, "Could not read the response: {msg}"),
            GenerationError::EmptyResponse { reason: Some(reason) } => {
                write!(f, "The model returned no text (reason: {reason})")
            }
            GenerationError::EmptyResponse { reason: None } => {
                f.write_str("The model returned no text")
            }
        }
    }
}

impl StdError for GenerationError {}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GenerationError::Decode(err.to_string())
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Everything the client needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub credentials: Credentials,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            credentials,
        }
    }
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Single request/response text generation.
    async fn generate_content(&self, prompt: &str) -> Result<GenerationResult, GenerationError>;

    /// Send `text` on top of `session`'s history in streaming mode.
    ///
    /// The session is not modified; the caller records the exchange once the
    /// stream has been drained.
    async fn send_message(
        &self,
        session: &ChatSession,
        text: &str,
    ) -> Result<ChunkStream, GenerationError>;

    /// Text + image generation. See [`multimodal_parts`] for the part layout.
    async fn generate_content_multimodal(
        &self,
        prompt: &str,
        secondary: Option<&str>,
        image: &ImageUpload,
    ) -> Result<GenerationResult, GenerationError>;
}

/// `[prompt, secondary, image]` when `secondary` has text, else `[prompt, image]`.
pub fn multimodal_parts(prompt: &str, secondary: Option<&str>, image: &ImageUpload) -> Vec<Part> {
    let mut parts = vec![Part::text(prompt)];
    if let Some(extra) = secondary.filter(|extra| !extra.is_empty()) {
        parts.push(Part::text(extra));
    }
    parts.push(image.to_part());
    parts
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config }
    }

    async fn post(
        &self,
        model: &str,
        action: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, GenerationError> {
        let mut url = model_action_url(&self.config.base_url, model, action);
        if action == "streamGenerateContent" {
            url.push_str("?alt=sse");
        }
        debug!(model, action, contents = request.contents.len(), "sending request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.config.credentials.api_key())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(model, action, %status, "request rejected");
            return Err(GenerationError::Api {
                status: Some(status.as_u16()),
                message: format_api_error(&error_text),
            });
        }

        Ok(response)
    }

    async fn generate(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let response = self.post(model, "generateContent", &request).await?;
        let body: GenerateContentResponse = response.json().await?;

        match body.text() {
            Some(text) => Ok(GenerationResult { text }),
            None => {
                let reason = body
                    .block_reason()
                    .or_else(|| body.finish_reason())
                    .map(str::to_owned);
                Err(GenerationError::EmptyResponse { reason })
            }
        }
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
        };
        self.generate(&self.config.text_model, request).await
    }

    async fn send_message(
        &self,
        session: &ChatSession,
        text: &str,
    ) -> Result<ChunkStream, GenerationError> {
        let request = session.request_for(text);
        let response = self
            .post(&self.config.text_model, "streamGenerateContent", &request)
            .await?;
        Ok(chunk_stream(response.bytes_stream()))
    }

    async fn generate_content_multimodal(
        &self,
        prompt: &str,
        secondary: Option<&str>,
        image: &ImageUpload,
    ) -> Result<GenerationResult, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(multimodal_parts(prompt, secondary, image))],
        };
        self.generate(&self.config.vision_model, request).await
    }
}
