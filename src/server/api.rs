use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, Level};

use super::about::{self, AboutContent};
use super::body::{BodyRejection, MessageBody};
use crate::error::{ApiError, Operation, StoreError};
use crate::models::{Message, MessageInput};
use crate::storage::MessageStore;

const ALL_GOOD: &str = "all good";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageStore>,
    pub redact_errors: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            redact_errors: false,
        }
    }

    pub fn with_redacted_errors(mut self, redact: bool) -> Self {
        self.redact_errors = redact;
        self
    }

    fn fail(&self, operation: Operation, err: StoreError) -> ApiError {
        error!(error = %err, "{}", operation.status());
        ApiError::new(operation, err, self.redact_errors)
    }
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub message: Message,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
}

pub fn router(state: AppState, log_requests: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/messages", get(list_messages))
        .route("/messages/save", get(get_save_as_id).post(save_message))
        .route("/messages/{message_id}", get(get_message))
        .route("/about", get(get_about))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state);

    if log_requests {
        app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
    } else {
        app
    }
}

async fn list_messages(
    State(state): State<AppState>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state
        .store
        .list()
        .await
        .map_err(|e| state.fail(Operation::Retrieve, e))?;

    Ok(Json(MessagesResponse {
        messages,
        status: ALL_GOOD,
    }))
}

async fn get_message(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let Path(message_id) = path
        .map_err(|e| state.fail(Operation::Retrieve, StoreError::InvalidId(e.body_text())))?;

    find_messages(&state, &message_id).await
}

// The static save route shadows the id route for GET, so "save" is looked up as an id.
async fn get_save_as_id(
    State(state): State<AppState>,
) -> Result<Json<MessagesResponse>, ApiError> {
    find_messages(&state, "save").await
}

async fn find_messages(
    state: &AppState,
    message_id: &str,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state
        .store
        .find_by_id(message_id)
        .await
        .map_err(|e| state.fail(Operation::Retrieve, e))?;

    Ok(Json(MessagesResponse {
        messages,
        status: ALL_GOOD,
    }))
}

async fn get_about() -> Json<AboutContent> {
    Json(about::content())
}

async fn save_message(
    State(state): State<AppState>,
    body: Result<MessageBody<MessageInput>, BodyRejection>,
) -> Result<Json<SavedResponse>, ApiError> {
    let MessageBody(input) = body
        .map_err(|e| state.fail(Operation::Save, StoreError::Validation(e.to_string())))?;

    let new = input
        .validate()
        .map_err(|e| state.fail(Operation::Save, e))?;

    let message = state
        .store
        .create(new)
        .await
        .map_err(|e| state.fail(Operation::Save, e))?;

    Ok(Json(SavedResponse {
        message,
        status: ALL_GOOD,
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "connected",
            }),
        ),
        Err(err) => {
            error!(error = %err, "database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    database: "disconnected",
                }),
            )
        }
    }
}
