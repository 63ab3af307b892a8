use crate::todo::{Todo, TodoGateway, TodoPatch, TodoServiceError};
use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct TodoState {
    pub gateway: Arc<dyn TodoGateway>,
}

/// JSON representation of a todo for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoJson {
    pub id: i32,
    pub task: String,
    pub completed: bool,
}

impl From<Todo> for TodoJson {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id(),
            task: todo.task().to_string(),
            completed: todo.completed(),
        }
    }
}

/// Body of `POST /todos`. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    task: Option<String>,
}

/// Body of `PUT /todos/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    task: Option<String>,
    completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(request: UpdateTodoRequest) -> Self {
        TodoPatch {
            task: request.task,
            completed: request.completed,
        }
    }
}

/// JSON response for API errors
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error type for todo handlers.
#[derive(Debug, thiserror::Error)]
pub enum TodoApiError {
    #[error("Task is required")]
    MissingTask,
    /// The body could not be read as the expected JSON shape.
    #[error("{0}")]
    InvalidBody(String),
    /// The path does not name a todo, e.g. a non-numeric ID.
    #[error("Not found")]
    UnknownPath,
    #[error(transparent)]
    Service(#[from] TodoServiceError),
}

impl From<JsonRejection> for TodoApiError {
    fn from(rejection: JsonRejection) -> Self {
        TodoApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for TodoApiError {
    fn from(_: PathRejection) -> Self {
        TodoApiError::UnknownPath
    }
}

impl IntoResponse for TodoApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            TodoApiError::MissingTask | TodoApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            TodoApiError::UnknownPath | TodoApiError::Service(TodoServiceError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            TodoApiError::Service(TodoServiceError::Database(err)) => {
                tracing::error!("Storage operation failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status_code, Json(ErrorResponse { error })).into_response()
    }
}

/// Handler for GET /todos - Returns all todos in insertion order.
#[tracing::instrument(skip(state))]
pub async fn list_todos_handler(
    State(state): State<TodoState>,
) -> Result<Json<Vec<TodoJson>>, TodoApiError> {
    let todos = state.gateway.list_all().await?;
    Ok(Json(todos.into_iter().map(TodoJson::from).collect()))
}

/// Handler for GET /todos/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<TodoJson>, TodoApiError> {
    let Path(id) = id?;
    let todo = state.gateway.get(id).await?;
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for POST /todos - Creates an uncompleted todo.
#[tracing::instrument(skip(state, payload))]
pub async fn create_todo_handler(
    State(state): State<TodoState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoJson>), TodoApiError> {
    let Json(request) = payload?;
    let task = request.task.ok_or(TodoApiError::MissingTask)?;
    let todo = state.gateway.create(task).await?;
    Ok((StatusCode::CREATED, Json(TodoJson::from(todo))))
}

/// Handler for PUT /todos/{id} - Applies a partial update.
#[tracing::instrument(skip(state, payload))]
pub async fn update_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoJson>, TodoApiError> {
    let Path(id) = id?;
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            // An unknown todo is reported before a bad body.
            state.gateway.get(id).await?;
            return Err(TodoApiError::from(rejection));
        }
    };
    let todo = state.gateway.update(id, TodoPatch::from(request)).await?;
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for DELETE /todos/{id}.
#[tracing::instrument(skip(state))]
pub async fn delete_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, TodoApiError> {
    let Path(id) = id?;
    state.gateway.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the todo router with all todo-related routes.
pub fn create_todo_router(state: TodoState) -> Router {
    Router::new()
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler),
        )
        .with_state(state)
}
