//! Request handlers for `/api/todos` and `/api/health`.
//!
//! Handlers validate input, make exactly one store call and wrap the outcome
//! in an `Envelope`. Text is validated before the path id, so a request that
//! is wrong on both counts reports the text problem.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{RunMode, Settings};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::model::{Todo, TodoId, TodoText};
use crate::store::{StoreError, TodoStore};

const TEXT_REQUIRED: &str = "Todo text is required";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub settings: Settings,
}

impl AppState {
    fn server_error(&self, context: &'static str, event: &str, err: StoreError) -> ApiError {
        error!("event={event} status=error error={err}");
        let detail = (self.settings.mode == RunMode::Development).then(|| err.to_string());
        ApiError::Server { context, detail }
    }
}

/// Body of create and update requests. A body that is missing, not JSON,
/// or has a non-string `text` is treated the same as an absent `text`.
#[derive(Debug, Default, Deserialize)]
pub struct TextBody {
    pub text: Option<String>,
}

fn body_text(body: Result<Json<TextBody>, JsonRejection>) -> Option<String> {
    match body {
        Ok(Json(body)) => body.text,
        Err(rejection) => {
            debug!("event=body_rejected status=error reason={rejection}");
            None
        }
    }
}

fn parse_id(raw: &str) -> Result<TodoId, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        warn!("event=parse_id status=error id={raw}");
        ApiError::InvalidId
    })
}

pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let todos = state
        .store
        .list()
        .map_err(|err| state.server_error("Server error while fetching todos", "todo_list", err))?;
    let count = todos.len();
    debug!("event=todo_list status=ok count={count}");
    Ok(Json(Envelope::data(todos).with_count(count)))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Todo>>), ApiError> {
    let text = body_text(body);
    if !state.settings.create_rule.admits(text.as_deref()) {
        warn!(
            "event=todo_create status=rejected rule={:?}",
            state.settings.create_rule
        );
        return Err(ApiError::Validation(TEXT_REQUIRED.to_string()));
    }
    let text = TodoText::parse(text.as_deref().unwrap_or_default())
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let todo = state
        .store
        .create(text)
        .map_err(|err| state.server_error("Server error while creating todo", "todo_create", err))?;
    info!("event=todo_create status=ok id={}", todo.id);
    Ok((StatusCode::CREATED, Json(Envelope::data(todo))))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state
        .store
        .get(id)
        .map_err(|err| state.server_error("Server error while fetching todo", "todo_get", err))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(Envelope::data(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let text = body_text(body).unwrap_or_default();
    let text = TodoText::parse(&text).map_err(|err| ApiError::Validation(err.to_string()))?;
    let id = parse_id(&id)?;

    let todo = state
        .store
        .update_text(id, text)
        .map_err(|err| state.server_error("Server error while updating todo", "todo_update", err))?
        .ok_or(ApiError::NotFound)?;
    info!("event=todo_update status=ok id={id}");
    Ok(Json(Envelope::data(todo)))
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Todo>>, ApiError> {
    let id = parse_id(&id)?;
    let todo = state
        .store
        .toggle(id)
        .map_err(|err| state.server_error("Server error while toggling todo", "todo_toggle", err))?
        .ok_or(ApiError::NotFound)?;
    info!(
        "event=todo_toggle status=ok id={id} completed={}",
        todo.completed
    );
    Ok(Json(Envelope::data(todo)))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state
        .store
        .delete(id)
        .map_err(|err| state.server_error("Server error while deleting todo", "todo_delete", err))?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    info!("event=todo_delete status=ok id={id}");
    Ok(Json(Envelope::message("Todo deleted successfully")))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "OK".to_string(),
        message: "Todo API is running".to_string(),
        timestamp: Utc::now(),
    })
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_body_tolerates_missing_text() {
        let body: TextBody = serde_json::from_str("{}").unwrap();
        assert!(body.text.is_none());
    }

    #[test]
    fn text_body_ignores_unknown_fields() {
        let body: TextBody = serde_json::from_str(r#"{"text":"x","completed":true}"#).unwrap();
        assert_eq!(body.text.as_deref(), Some("x"));
    }

    #[test]
    fn malformed_ids_are_invalid() {
        assert!(matches!(parse_id("not-a-uuid"), Err(ApiError::InvalidId)));
        assert!(matches!(parse_id(""), Err(ApiError::InvalidId)));
        assert!(parse_id("00000000-0000-0000-0000-000000000000").is_ok());
    }
}
