//! Server-sent event decoding for streamed generation.
//!
//! `streamGenerateContent?alt=sse` answers with `data: {json}` lines, one
//! `GenerateContentResponse` per event. [`chunk_stream`] turns the raw byte
//! stream into a lazy [`ChunkStream`] of text chunks.

use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use memchr::memchr;
use tracing::debug;

use crate::api::GenerateContentResponse;
use crate::core::client::GenerationError;

/// Finite, forward-only sequence of text chunks. Polling drives the request.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, GenerationError>> + Send>>;

const MAX_ERROR_CHARS: usize = 500;

/// Splits a byte stream into complete SSE `data:` payloads.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes; returns the payloads of every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut payloads = Vec::new();

        while let Some(newline_pos) = memchr(b'\n', &self.buffer) {
            match std::str::from_utf8(&self.buffer[..newline_pos]) {
                Ok(line) => {
                    if let Some(payload) = extract_data_payload(line.trim()) {
                        payloads.push(payload.to_string());
                    }
                }
                Err(e) => debug!("skipping invalid UTF-8 in stream: {e}"),
            }
            self.buffer.drain(..=newline_pos);
        }

        payloads
    }

    /// Flush a final line that arrived without a trailing newline.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        let line = String::from_utf8(rest).ok()?;
        extract_data_payload(line.trim()).map(str::to_owned)
    }
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

/// Interpret one event payload. `Ok(None)` means the event carried no text
/// (for example a trailing usage-only event).
///
/// A candidate that finishes for any reason other than `STOP` without text
/// (a safety stop, a recitation stop) is an error.
pub fn decode_payload(payload: &str) -> Result<Option<String>, GenerationError> {
    let payload = payload.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| GenerationError::Decode(format!("{e}: {}", truncate(payload))))?;

    if value.get("error").is_some() {
        return Err(GenerationError::Api {
            status: None,
            message: format_api_error(payload),
        });
    }

    let response: GenerateContentResponse = serde_json::from_value(value)
        .map_err(|e| GenerationError::Decode(format!("{e}: {}", truncate(payload))))?;

    if let Some(text) = response.text() {
        return Ok(Some(text));
    }
    if let Some(reason) = response.block_reason() {
        return Err(GenerationError::EmptyResponse {
            reason: Some(reason.to_string()),
        });
    }
    match response.finish_reason() {
        Some(reason) if reason != "STOP" => Err(GenerationError::EmptyResponse {
            reason: Some(reason.to_string()),
        }),
        _ => Ok(None),
    }
}

struct StreamState<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, GenerationError>>,
    done: bool,
    chunks: usize,
}

impl<S> StreamState<S> {
    fn queue(&mut self, payloads: Vec<String>) {
        for payload in payloads {
            match decode_payload(&payload) {
                Ok(Some(text)) => {
                    self.chunks += 1;
                    self.pending.push_back(Ok(text));
                }
                Ok(None) => {}
                Err(err) => {
                    self.pending.push_back(Err(err));
                    self.done = true;
                    return;
                }
            }
        }
    }
}

/// Wrap an HTTP body stream into a lazy chunk stream.
///
/// The stream ends after the body ends or after the first error item.
pub fn chunk_stream<S, B, E>(body: S) -> ChunkStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = StreamState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
        chunks: 0,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.done {
                return None;
            }
            match state.body.next().await {
                Some(Ok(bytes)) => {
                    let payloads = state.decoder.push(bytes.as_ref());
                    state.queue(payloads);
                }
                Some(Err(err)) => {
                    state.done = true;
                    state
                        .pending
                        .push_back(Err(GenerationError::Transport(err.to_string())));
                }
                None => {
                    state.done = true;
                    if let Some(payload) = state.decoder.finish() {
                        state.queue(vec![payload]);
                    }
                    debug!(chunks = state.chunks, "stream finished");
                }
            }
        }
    })
    .boxed()
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let message = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })?;

    let collapsed = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }

    match value.pointer("/error/status").and_then(|v| v.as_str()) {
        Some(status) => Some(format!("{collapsed} ({status})")),
        None => Some(collapsed),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_ERROR_CHARS).collect();
    cut.push('…');
    cut
}

/// Reduce an error body to a single readable line.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "API Error: <empty response body>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            return format!("API Error: {summary}");
        }
        return format!("API Error: {}", truncate(&json_value.to_string()));
    }

    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("API Error: {}", truncate(&collapsed))
}
