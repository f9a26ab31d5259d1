//! HttpEntryStore - `EntryStore` over the serverless entry functions.
//!
//! Each store operation is one request to a function under `base_url`:
//!
//! | operation | request |
//! |---|---|
//! | create | `POST   {base}/create-entry` |
//! | update | `PUT    {base}/update-entry` |
//! | list   | `GET    {base}/list-entries?limit&offset&promptType` |
//! | remove | `DELETE {base}/delete-entry?id` |
//! | get    | `GET    {base}/get-entry?id` |

use crate::dto::{
    CreateEntryRequest, DeleteEntryResponse, EntryDto, ErrorResponse, ListEntriesResponse,
    PromptTypeDto, UpdateEntryRequest,
};
use async_trait::async_trait;
use quill_core::config::StoreConfig;
use quill_core::entry::{EntryId, EntryRecord, EntryStore, EntryUpdate, ListQuery};
use quill_core::error::{QuillError, Result};
use quill_core::session::TransformKind;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Entry store backed by the HTTP functions.
#[derive(Clone)]
pub struct HttpEntryStore {
    client: Client,
    base_url: String,
}

impl HttpEntryStore {
    /// Creates a store with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Creates a store with the configured base URL and request timeout.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| QuillError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function)
    }

    /// Sends a request and maps transport and status failures.
    ///
    /// `id` is only used to build a `NotFound` error for 404 responses.
    async fn send(&self, request: RequestBuilder, id: Option<EntryId>) -> Result<Response> {
        let response = request.send().await.map_err(|err| {
            QuillError::http(None, format!("Entry store request failed: {err}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read entry store error body".to_string());
        Err(map_http_error(status, &body, id))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(|err| {
            QuillError::http(None, format!("Failed to read entry store response: {err}"))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl EntryStore for HttpEntryStore {
    async fn create(&self, input_text: &str, kind: TransformKind) -> Result<EntryRecord> {
        let body = CreateEntryRequest {
            input_text,
            prompt_type: kind.into(),
        };

        tracing::debug!(kind = %kind, "[HttpEntryStore] POST create-entry");
        let request = self.client.post(self.endpoint("create-entry")).json(&body);
        let response = self.send(request, None).await?;
        let dto: EntryDto = Self::parse(response).await?;
        dto.try_into()
    }

    async fn update(&self, id: EntryId, update: EntryUpdate) -> Result<EntryRecord> {
        let body = UpdateEntryRequest::new(id, update);

        tracing::debug!(entry_id = %id, "[HttpEntryStore] PUT update-entry");
        let request = self.client.put(self.endpoint("update-entry")).json(&body);
        let response = self.send(request, Some(id)).await?;
        let dto: EntryDto = Self::parse(response).await?;
        dto.try_into()
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<EntryRecord>> {
        query.validate()?;

        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if let Some(kind) = query.kind {
            params.push((
                "promptType",
                PromptTypeDto::from(kind).as_query_value().to_string(),
            ));
        }

        tracing::debug!(
            limit = query.limit,
            offset = query.offset,
            "[HttpEntryStore] GET list-entries"
        );
        let request = self.client.get(self.endpoint("list-entries")).query(&params);
        let response = self.send(request, None).await?;
        let body: ListEntriesResponse = Self::parse(response).await?;

        body.entries.into_iter().map(EntryRecord::try_from).collect()
    }

    async fn remove(&self, id: EntryId) -> Result<EntryId> {
        tracing::debug!(entry_id = %id, "[HttpEntryStore] DELETE delete-entry");
        let request = self
            .client
            .delete(self.endpoint("delete-entry"))
            .query(&[("id", id.get())]);
        let response = self.send(request, Some(id)).await?;
        let body: DeleteEntryResponse = Self::parse(response).await?;

        if !body.success {
            return Err(QuillError::http(
                None,
                format!("Entry store did not confirm deletion of {id}"),
            ));
        }
        EntryId::new(body.id)
    }

    async fn get(&self, id: EntryId) -> Result<EntryRecord> {
        tracing::debug!(entry_id = %id, "[HttpEntryStore] GET get-entry");
        let request = self
            .client
            .get(self.endpoint("get-entry"))
            .query(&[("id", id.get())]);
        let response = self.send(request, Some(id)).await?;
        let dto: EntryDto = Self::parse(response).await?;
        dto.try_into()
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn map_http_error(status: StatusCode, body: &str, id: Option<EntryId>) -> QuillError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|wrapper| wrapper.describe())
        .unwrap_or_else(|| body.to_string());

    match (status, id) {
        (StatusCode::NOT_FOUND, Some(id)) => QuillError::not_found("Entry", id),
        (StatusCode::BAD_REQUEST, _) => QuillError::validation(message),
        _ => QuillError::http(Some(status.as_u16()), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let store = HttpEntryStore::new("http://localhost:8888/.netlify/functions/");
        assert_eq!(
            store.endpoint("create-entry"),
            "http://localhost:8888/.netlify/functions/create-entry"
        );
    }

    #[test]
    fn test_map_http_error_not_found() {
        let id = EntryId::new(4).unwrap();
        let err = map_http_error(StatusCode::NOT_FOUND, r#"{"error":"Entry not found"}"#, Some(id));
        assert_eq!(err, QuillError::not_found("Entry", 4));
    }

    #[test]
    fn test_map_http_error_validation_includes_details() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Validation error","details":[{"message":"Input text is required"}]}"#,
            None,
        );
        match err {
            QuillError::Validation(message) => {
                assert!(message.starts_with("Validation error"));
                assert!(message.contains("Input text is required"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream timed out", None);
        assert_eq!(err, QuillError::http(Some(502), "upstream timed out"));
    }

    #[test]
    fn test_not_found_without_id_is_http_error() {
        let err = map_http_error(StatusCode::NOT_FOUND, "{}", None);
        assert_eq!(err, QuillError::http(Some(404), "{}"));
    }
}
