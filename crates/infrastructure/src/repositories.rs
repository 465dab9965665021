use async_trait::async_trait;
use domain::{Todo, TodoChanges, TodoId};
use thiserror::Error;

/// ストア層のエラー
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Corrupt todo document: {0}")]
    Corrupt(String),
}

/// todos コレクションに対するドキュメントストアの操作
///
/// 変更系の操作はいずれも 1 回の書き込みで完結し、
/// 対象が存在しない場合は `Ok(None)` を返します。
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// ドキュメントを 1 件追加
    async fn insert(&self, todo: Todo) -> Result<Todo, StoreError>;

    /// 複数ドキュメントを順に追加（テストのシード用）
    async fn insert_many(&self, todos: Vec<Todo>) -> Result<(), StoreError>;

    /// 全件を追加順に取得
    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// 変更を適用し、更新後のドキュメントを返す
    async fn find_by_id_and_update(
        &self,
        id: &TodoId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError>;

    /// 削除し、削除前のドキュメントを返す
    async fn find_by_id_and_delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// 全件削除（テストのセットアップ専用）
    async fn remove_all(&self) -> Result<(), StoreError>;
}
