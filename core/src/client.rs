//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` (the API root, e.g.
//! `http://localhost:5000/api`) and carries no mutable state between calls.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Responses are unwrapped from the server's envelope; on failure the
//! envelope's `error` string is surfaced, falling back to a fixed message
//! per operation when the body carries none.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, Health, TextPayload, Todo, TodoId};

const FETCH_ALL_FAILED: &str = "Failed to fetch todos";
const FETCH_ONE_FAILED: &str = "Failed to fetch todo";
const CREATE_FAILED: &str = "Failed to create todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const TOGGLE_FAILED: &str = "Failed to toggle todo";
const DELETE_FAILED: &str = "Failed to delete todo";
const HEALTH_FAILED: &str = "Health check failed";

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request(
        &self,
        method: HttpMethod,
        path: &str,
        text: &str,
    ) -> Result<HttpRequest, ApiError> {
        let payload = TextPayload {
            text: text.to_string(),
        };
        let body = serde_json::to_string(&payload)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            ..self.request(method, path)
        })
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos")
    }

    pub fn build_get_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/todos/{id}"))
    }

    pub fn build_create_todo(&self, text: &str) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos", text)
    }

    pub fn build_update_todo(&self, id: TodoId, text: &str) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/todos/{id}"), text)
    }

    pub fn build_toggle_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Patch, &format!("/todos/{id}/toggle"))
    }

    pub fn build_delete_todo(&self, id: TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/todos/{id}"))
    }

    pub fn build_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/health")
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_data(response, 200, FETCH_ALL_FAILED)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 200, FETCH_ONE_FAILED)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 201, CREATE_FAILED)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 200, UPDATE_FAILED)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(response, 200, TOGGLE_FAILED)
    }

    /// Returns the server's confirmation message.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        let envelope: Envelope<serde_json::Value> = parse_envelope(response, 200, DELETE_FAILED)?;
        Ok(envelope.message.unwrap_or_default())
    }

    /// The health payload is not wrapped in an envelope.
    pub fn parse_health(&self, response: HttpResponse) -> Result<Health, ApiError> {
        check_status(&response, 200, HEALTH_FAILED)?;
        deserialize(&response.body)
    }
}

fn deserialize<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn parse_envelope<T: DeserializeOwned>(
    response: HttpResponse,
    expected: u16,
    fallback: &str,
) -> Result<Envelope<T>, ApiError> {
    check_status(&response, expected, fallback)?;
    deserialize(&response.body)
}

fn parse_data<T: DeserializeOwned>(
    response: HttpResponse,
    expected: u16,
    fallback: &str,
) -> Result<T, ApiError> {
    parse_envelope::<T>(response, expected, fallback)?
        .data
        .ok_or_else(|| ApiError::DeserializationError("envelope has no data".to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16, fallback: &str) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let message = serde_json::from_str::<Envelope<serde_json::Value>>(&response.body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| fallback.to_string());
    Err(ApiError::HttpError {
        status: response.status,
        message,
    })
}
