use thiserror::Error;

/// ドメインの入力検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid TodoId: {0}")]
    InvalidTodoId(String),

    #[error("Todo text must not be empty")]
    EmptyText,
}
