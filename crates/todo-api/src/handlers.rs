use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{Todo, TodoChanges, TodoId};

use crate::error::ApiError;
use crate::models::{
    CreateTodoRequest, HealthBody, TodoListResponse, TodoResponse, UpdateTodoRequest,
};
use crate::state::AppState;

/// ヘルスチェック用ハンドラ
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

/// POST /todos
/// 作成した Todo をそのまま返す（ラップしない）
pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(req) = payload?;
    let text = req
        .text
        .ok_or_else(|| ApiError::BadRequest("text is required".to_string()))?;

    let todo = Todo::new(TodoId::generate(), &text)?;
    let created = state.store().insert(todo).await?;

    tracing::info!(todo_id = %created.id, "todo created");
    Ok(Json(created))
}

/// GET /todos
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<TodoListResponse>, ApiError> {
    let todos = state.store().find_all().await?;
    Ok(Json(TodoListResponse { todos }))
}

/// GET /todos/{id}
pub async fn get_todo(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = TodoId::parse(&id)?;
    let todo = state.store().find_by_id(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(TodoResponse { todo }))
}

/// DELETE /todos/{id}
/// 削除直前のドキュメントを返す
pub async fn delete_todo(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = TodoId::parse(&id)?;
    let todo = state
        .store()
        .find_by_id_and_delete(&id)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(todo_id = %todo.id, "todo deleted");
    Ok(Json(TodoResponse { todo }))
}

/// PATCH /todos/{id}
/// ID と本文をすべて検証してから 1 回だけ書き込む
pub async fn patch_todo(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = TodoId::parse(&id)?;
    let Json(req) = payload?;
    let changes = TodoChanges::new(req.text.as_deref(), req.completed, state.clock())?;

    let todo = state
        .store()
        .find_by_id_and_update(&id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(todo_id = %todo.id, completed = todo.completed, "todo updated");
    Ok(Json(TodoResponse { todo }))
}
