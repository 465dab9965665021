//! todos コレクションを操作する HTTP API（axum）
//!
//! `/todos` に対する作成・一覧・取得・削除・部分更新を提供します。
//! 永続化は `infrastructure::TodoStore` 越しに行い、
//! `completed` と `completedAt` の整合は `domain` 側で決定します。

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{app, app_with_state};
pub use state::AppState;
