use std::fmt;

use futures_util::StreamExt;
use memchr::memchr;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{endpoint_url, ChatRequest, ChatResponse, CHAT_COMPLETIONS_ENDPOINT};

/// One item of a streamed completion. `End` and `Error` are terminal: nothing
/// follows either of them.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Chunk(String),
    Error(StreamError),
    End,
}

impl StreamMessage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamMessage::Error(_) | StreamMessage::End)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamErrorKind {
    Network,
    Authentication,
    RateLimited,
    Api,
    MalformedResponse,
}

impl StreamErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            StreamErrorKind::Network => "Network error",
            StreamErrorKind::Authentication => "Authentication error",
            StreamErrorKind::RateLimited => "Rate limit exceeded",
            StreamErrorKind::Api => "API error",
            StreamErrorKind::MalformedResponse => "Malformed response",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamError {
    pub kind: StreamErrorKind,
    pub message: String,
}

impl StreamError {
    pub fn new(kind: StreamErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let kind = match status.as_u16() {
            401 | 403 => StreamErrorKind::Authentication,
            429 => StreamErrorKind::RateLimited,
            _ => StreamErrorKind::Api,
        };
        Self::new(kind, format!("HTTP {status}: {}", summarize_error_body(body)))
    }

    pub fn from_transport(err: &reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(StreamErrorKind::Network, message)
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.kind.label(), self.message)
    }
}

impl std::error::Error for StreamError {}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty response body>".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&value) {
            return summary;
        }
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_data_payload(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

fn handle_data_payload(payload: &str, tx: &mpsc::UnboundedSender<StreamMessage>) -> bool {
    if payload == "[DONE]" {
        let _ = tx.send(StreamMessage::End);
        return true;
    }

    if payload.trim().is_empty() {
        return false;
    }

    match serde_json::from_str::<ChatResponse>(payload) {
        Ok(response) => {
            if let Some(content) = response
                .choices
                .first()
                .and_then(|choice| choice.delta.content.as_deref())
            {
                if !content.is_empty() {
                    let _ = tx.send(StreamMessage::Chunk(content.to_string()));
                }
            }
            false
        }
        Err(parse_error) => {
            let error = match serde_json::from_str::<serde_json::Value>(payload) {
                Ok(value) if value.get("error").is_some() => StreamError::new(
                    StreamErrorKind::Api,
                    extract_error_summary(&value).unwrap_or_else(|| payload.trim().to_string()),
                ),
                _ => StreamError::new(
                    StreamErrorKind::MalformedResponse,
                    format!("could not decode stream event ({parse_error})"),
                ),
            };
            warn!(kind = ?error.kind, "completion stream failed: {}", error.message);
            let _ = tx.send(StreamMessage::Error(error));
            true
        }
    }
}

/// Handle one server-sent-events line. Returns `true` once a terminal message
/// has been sent.
fn process_sse_line(line: &str, tx: &mpsc::UnboundedSender<StreamMessage>) -> bool {
    extract_data_payload(line)
        .map(|payload| handle_data_payload(payload, tx))
        .unwrap_or(false)
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub api_key: String,
    pub request: ChatRequest,
}

/// Receiving end of one completion call.
///
/// Yields fragments in arrival order and finishes with exactly one terminal
/// item. After the terminal item every read returns `None`.
pub struct CompletionStream {
    rx: mpsc::UnboundedReceiver<StreamMessage>,
    finished: bool,
}

impl CompletionStream {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<StreamMessage>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                rx,
                finished: false,
            },
        )
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub async fn next(&mut self) -> Option<StreamMessage> {
        if self.finished {
            return None;
        }
        let message = self.rx.recv().await.unwrap_or_else(closed_early);
        self.finished = message.is_terminal();
        Some(message)
    }

    /// Non-blocking variant of [`next`](Self::next) for the UI loop.
    pub fn try_next(&mut self) -> Option<StreamMessage> {
        if self.finished {
            return None;
        }
        let message = match self.rx.try_recv() {
            Ok(message) => message,
            Err(mpsc::error::TryRecvError::Empty) => return None,
            Err(mpsc::error::TryRecvError::Disconnected) => closed_early(),
        };
        self.finished = message.is_terminal();
        Some(message)
    }
}

fn closed_early() -> StreamMessage {
    StreamMessage::Error(StreamError::new(
        StreamErrorKind::Network,
        "the response stream closed before it finished",
    ))
}

#[derive(Clone, Default)]
pub struct ChatStreamService;

impl ChatStreamService {
    pub fn new() -> Self {
        Self
    }

    /// Start a completion request on a background task.
    pub fn spawn_stream(&self, params: StreamParams) -> CompletionStream {
        let (tx, stream) = CompletionStream::channel();
        tokio::spawn(run_stream(params, tx));
        stream
    }
}

async fn run_stream(params: StreamParams, tx: mpsc::UnboundedSender<StreamMessage>) {
    let StreamParams {
        client,
        base_url,
        api_key,
        request,
    } = params;

    let chat_url = endpoint_url(&base_url, CHAT_COMPLETIONS_ENDPOINT);
    debug!(
        url = %chat_url,
        model = %request.model,
        messages = request.messages.len(),
        temperature = request.temperature,
        max_tokens = request.max_tokens,
        "starting completion request"
    );

    let response = match client
        .post(chat_url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&request)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            let error = StreamError::from_transport(&e);
            warn!(kind = ?error.kind, "completion request failed: {}", error.message);
            let _ = tx.send(StreamMessage::Error(error));
            return;
        }
    };

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let error = StreamError::from_status(status, &error_text);
        warn!(%status, kind = ?error.kind, "completion request rejected");
        let _ = tx.send(StreamMessage::Error(error));
        return;
    }

    let mut stream = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk_bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = StreamError::from_transport(&e);
                warn!("completion stream interrupted: {}", error.message);
                let _ = tx.send(StreamMessage::Error(error));
                return;
            }
        };
        buffer.extend_from_slice(&chunk_bytes);

        while let Some(newline_pos) = memchr(b'\n', &buffer) {
            let should_end = match std::str::from_utf8(&buffer[..newline_pos]) {
                Ok(line) => process_sse_line(line.trim(), &tx),
                Err(e) => {
                    send_invalid_utf8(&tx, e);
                    return;
                }
            };
            buffer.drain(..=newline_pos);
            if should_end {
                debug!("completion stream finished");
                return;
            }
        }
    }

    // The connection closed; a final line may lack its newline.
    match std::str::from_utf8(&buffer) {
        Ok(line) => {
            if process_sse_line(line.trim(), &tx) {
                return;
            }
        }
        Err(e) => {
            send_invalid_utf8(&tx, e);
            return;
        }
    }
    debug!("completion stream closed without [DONE]");
    let _ = tx.send(StreamMessage::End);
}

fn send_invalid_utf8(tx: &mpsc::UnboundedSender<StreamMessage>, e: std::str::Utf8Error) {
    warn!("invalid UTF-8 in completion stream: {e}");
    let _ = tx.send(StreamMessage::Error(StreamError::new(
        StreamErrorKind::MalformedResponse,
        format!("stream event is not valid UTF-8 ({e})"),
    )));
}
