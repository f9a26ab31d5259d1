//! GeminiStreamChannel - streaming REST implementation for Gemini.
//!
//! Calls `streamGenerateContent` with `alt=sse` and yields the text of every
//! event as one fragment.

use crate::sse::SseDecoder;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use quill_core::config::GenerationConfig;
use quill_core::error::{QuillError, Result};
use quill_core::generation::{FragmentStream, GenerationChannel};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generation channel that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiStreamChannel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiStreamChannel {
    /// Creates a channel with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: &GenerationConfig, api_key: impl Into<String>) -> Self {
        Self::new(api_key, config.model.clone())
    }

    /// Points the channel at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[async_trait]
impl GenerationChannel for GeminiStreamChannel {
    async fn generate(&self, prompt: &str) -> Result<FragmentStream> {
        if prompt.trim().is_empty() {
            return Err(QuillError::generation("Gemini prompt must not be empty"));
        }

        let url = format!(
            "{}/{model}:streamGenerateContent?alt=sse&key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        tracing::debug!(model = %self.model, "[GeminiStreamChannel] Opening stream");
        let response = self
            .client
            .post(url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|err| QuillError::generation(format!("Gemini API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();

        Ok(fragments(body))
    }
}

struct StreamState {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String>>,
    finished: bool,
}

impl StreamState {
    fn enqueue(&mut self, payload: &str) {
        if self.finished {
            return;
        }
        match parse_event(payload) {
            Ok(Some(text)) => self.pending.push_back(Ok(text)),
            Ok(None) => {}
            Err(err) => {
                self.pending.push_back(Err(err));
                self.finished = true;
            }
        }
    }
}

/// Turns the raw SSE body into fragments. The stream ends after the first
/// error item.
fn fragments(body: BoxStream<'static, reqwest::Result<Vec<u8>>>) -> FragmentStream {
    let state = StreamState {
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    for payload in state.decoder.push(&chunk) {
                        state.enqueue(&payload);
                        if state.finished {
                            break;
                        }
                    }
                }
                Some(Err(err)) => {
                    state.pending.push_back(Err(QuillError::generation(format!(
                        "Gemini stream interrupted: {err}"
                    ))));
                    state.finished = true;
                }
                None => {
                    if let Some(payload) = state.decoder.finish() {
                        state.enqueue(&payload);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamEvent {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[allow(dead_code)]
    code: Option<i32>,
    message: Option<String>,
    status: Option<String>,
}

impl ErrorBody {
    fn describe(self, fallback: &str) -> String {
        let status_text = self.status.unwrap_or_default();
        let msg = self.message.unwrap_or_else(|| fallback.to_string());
        if status_text.is_empty() {
            msg
        } else {
            format!("{status_text}: {msg}")
        }
    }
}

/// Extracts the text carried by one event. `Ok(None)` for events without
/// text (e.g. the trailing usage metadata event).
fn parse_event(payload: &str) -> Result<Option<String>> {
    let event: StreamEvent = serde_json::from_str(payload)
        .map_err(|err| QuillError::generation(format!("Failed to parse Gemini event: {err}")))?;

    if let Some(error) = event.error {
        return Err(QuillError::generation(error.describe(payload)));
    }
    if let Some(reason) = event.prompt_feedback.and_then(|feedback| feedback.block_reason) {
        return Err(QuillError::generation(format!(
            "Gemini blocked the prompt: {reason}"
        )));
    }

    let text: String = event
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.swap_remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    Ok(if text.is_empty() { None } else { Some(text) })
}

fn map_http_error(status: StatusCode, body: &str) -> QuillError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| wrapper.error.describe(body))
        .unwrap_or_else(|_| body.to_string());

    QuillError::generation(format!("Gemini API returned {}: {message}", status.as_u16()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(chunks: Vec<&'static str>) -> BoxStream<'static, reqwest::Result<Vec<u8>>> {
        stream::iter(chunks.into_iter().map(|chunk| Ok(chunk.as_bytes().to_vec()))).boxed()
    }

    fn event(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"parts\":[{{\"text\":{}}}],\"role\":\"model\"}}}}]}}\r\n\r\n",
            serde_json::to_string(text).unwrap()
        )
    }

    #[test]
    fn test_parse_event_concatenates_parts() {
        let payload = r#"{"candidates":[{"content":{"parts":[{"text":"He"},{"text":"llo"}]}}]}"#;
        assert_eq!(parse_event(payload).unwrap().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_parse_event_without_text_is_skipped() {
        let payload = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}],"usageMetadata":{}}"#;
        assert_eq!(parse_event(payload).unwrap(), None);
        assert_eq!(parse_event(r#"{"usageMetadata":{}}"#).unwrap(), None);
    }

    #[test]
    fn test_parse_event_error_and_block() {
        let err = parse_event(r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#)
            .unwrap_err();
        assert_eq!(err, QuillError::generation("RESOURCE_EXHAUSTED: quota"));

        let err = parse_event(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert_eq!(err.reason(), "Gemini blocked the prompt: SAFETY");
    }

    #[test]
    fn test_map_http_error_reads_api_message() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(
            err.reason(),
            "Gemini API returned 400: INVALID_ARGUMENT: API key not valid"
        );
    }

    #[tokio::test]
    async fn test_fragments_follow_event_order() {
        let first = event("He");
        let second = event("llo");
        let joined: &'static str = Box::leak(format!("{first}{second}").into_boxed_str());
        // split the second event mid-way to exercise buffering
        let (a, b) = joined.split_at(first.len() + 10);

        let items: Vec<Result<String>> = fragments(body_of(vec![a, b])).collect().await;
        let texts: Vec<String> = items.into_iter().map(|item| item.unwrap()).collect();
        assert_eq!(texts, vec!["He".to_string(), "llo".to_string()]);
    }

    #[tokio::test]
    async fn test_fragments_stop_after_error_event() {
        let ok = Box::leak(event("Par").into_boxed_str());
        let items: Vec<Result<String>> = fragments(body_of(vec![
            ok,
            "data: {\"error\":{\"message\":\"overloaded\"}}\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"late\"}]}}]}\n",
        ]))
        .collect()
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "Par");
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_error_event_ends_stream_within_one_chunk() {
        let joined: &'static str = Box::leak(
            format!(
                "{}data: {{\"error\":{{\"message\":\"overloaded\"}}}}\n\n{}",
                event("Par"),
                event("late")
            )
            .into_boxed_str(),
        );

        let items: Vec<Result<String>> = fragments(body_of(vec![joined])).collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "Par");
        assert_eq!(items[1], Err(QuillError::generation("overloaded")));
    }

    #[test]
    fn test_request_body_shape() {
        let channel = GeminiStreamChannel::new("key", "gemini-2.0-flash");
        let json = serde_json::to_value(channel.build_request("hi")).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json.get("system_instruction").is_none());
    }
}
