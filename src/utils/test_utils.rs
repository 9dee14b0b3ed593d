use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::chat_stream::ChunkStream;
use crate::core::client::{GenerationError, GenerationResult, GenerationService};
use crate::core::session::ChatSession;
use crate::core::upload::ImageUpload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Generate(String),
    Chat {
        history_len: usize,
        text: String,
    },
    Multimodal {
        prompt: String,
        secondary: Option<String>,
        image: String,
    },
}

enum Script {
    Reply(String),
    Stream(Vec<String>, Option<GenerationError>),
    Fail(GenerationError),
}

/// Scripted [`GenerationService`] that records every call it receives.
pub struct FakeService {
    script: Script,
    calls: Mutex<Vec<FakeCall>>,
}

impl FakeService {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with_script(Script::Reply(text.to_string()))
    }

    pub fn streaming(chunks: &[&str]) -> Self {
        Self::with_script(Script::Stream(
            chunks.iter().map(|c| c.to_string()).collect(),
            None,
        ))
    }

    /// Streams `chunks`, then fails with a transport error carrying `message`.
    pub fn streaming_then_error(chunks: &[&str], message: &str) -> Self {
        let reason = message
            .strip_prefix("Request failed: ")
            .unwrap_or(message)
            .to_string();
        Self::with_script(Script::Stream(
            chunks.iter().map(|c| c.to_string()).collect(),
            Some(GenerationError::Transport(reason)),
        ))
    }

    /// Every call fails with an API error displaying exactly `message`.
    pub fn failing(message: &str) -> Self {
        Self::with_script(Script::Fail(GenerationError::Api {
            status: None,
            message: message.to_string(),
        }))
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: FakeCall) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn result(&self) -> Result<GenerationResult, GenerationError> {
        match &self.script {
            Script::Reply(text) => Ok(GenerationResult { text: text.clone() }),
            Script::Stream(chunks, _) => Ok(GenerationResult {
                text: chunks.concat(),
            }),
            Script::Fail(err) => Err(err.clone()),
        }
    }
}

#[async_trait]
impl GenerationService for FakeService {
    async fn generate_content(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        self.record(FakeCall::Generate(prompt.to_string()));
        self.result()
    }

    async fn send_message(
        &self,
        session: &ChatSession,
        text: &str,
    ) -> Result<ChunkStream, GenerationError> {
        self.record(FakeCall::Chat {
            history_len: session.history().len(),
            text: text.to_string(),
        });
        let items: Vec<Result<String, GenerationError>> = match &self.script {
            Script::Reply(text) => vec![Ok(text.clone())],
            Script::Stream(chunks, trailing) => chunks
                .iter()
                .cloned()
                .map(Ok)
                .chain(trailing.clone().map(Err))
                .collect(),
            Script::Fail(err) => return Err(err.clone()),
        };
        Ok(Box::pin(futures_util::stream::iter(items)))
    }

    async fn generate_content_multimodal(
        &self,
        prompt: &str,
        secondary: Option<&str>,
        image: &ImageUpload,
    ) -> Result<GenerationResult, GenerationError> {
        self.record(FakeCall::Multimodal {
            prompt: prompt.to_string(),
            secondary: secondary.map(str::to_owned),
            image: image.file_name().to_string(),
        });
        self.result()
    }
}
