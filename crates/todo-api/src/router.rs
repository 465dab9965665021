use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// 外部から状態を注入してルータを構築する
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .delete(handlers::delete_todo)
                .patch(handlers::patch_todo),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// InMemory ストアでルータを構築して返す
pub fn app() -> Router {
    app_with_state(AppState::default())
}
