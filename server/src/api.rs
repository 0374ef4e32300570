//! HTTP routes for the todo service.
//!
//! | Method | Path             | Success              | Failure |
//! |--------|------------------|----------------------|---------|
//! | GET    | `/api/todos`      | 200, array of todos  |         |
//! | POST   | `/api/todos`      | 201, created todo    | 400     |
//! | PUT    | `/api/todos/{id}` | 200, toggled todo    | 404     |
//! | DELETE | `/api/todos/{id}` | 204, empty           | 404     |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::error::ApiError;
use crate::store::{Todo, TodoStore};

/// Shared handler state. Mutations hold the write lock across the update and
/// the file rewrite.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<TodoStore>>,
}

impl AppState {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

/// Validated create input.
#[derive(Debug, PartialEq, Eq)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
}

impl CreateTodo {
    /// Read `title` and an optional `description` out of a JSON body.
    ///
    /// Anything without a non-blank string `title` is rejected, including an
    /// empty or non-JSON body. A non-string `description` counts as absent.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::TitleRequired)?;
        let title = value
            .get("title")
            .and_then(Value::as_str)
            .filter(|title| !title.trim().is_empty())
            .ok_or(ApiError::TitleRequired)?;
        let description = value
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
        })
    }
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(toggle_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    let store = state.store.read().await;
    Json(store.list().to_vec())
}

async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input = CreateTodo::from_body(&body)?;
    let todo = state
        .store
        .write()
        .await
        .add(input.title, input.description)?;
    info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

// Ids that fail to parse as u64 can never match a record.
async fn toggle_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let todo = state
        .store
        .write()
        .await
        .toggle(id)?
        .ok_or(ApiError::NotFound)?;
    info!(id, completed = todo.completed, "todo toggled");
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    if !state.store.write().await.delete(id)? {
        return Err(ApiError::NotFound);
    }
    info!(id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
