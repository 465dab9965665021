use domain::Todo;
use serde::{Deserialize, Serialize};

/// POST /todos リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    /// 必須。欠落時はハンドラで 400 を返す
    pub text: Option<String>,
}

/// PATCH /todos/{id} リクエスト
///
/// 指定されたフィールドのみ更新対象。`null` は未指定と同じ扱い
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// 単一 Todo を包むレスポンス（GET/DELETE/PATCH /todos/{id}）
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// GET /todos レスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// サービスの簡易ステータス
    pub status: &'static str,
}
