use domain::{Clock, SystemClock};
use infrastructure::{InMemoryTodoStore, TodoStore};
use std::sync::Arc;

/// アプリケーションの共有状態
///
/// 起動時に一度だけ構築し、各ハンドラへクローンして渡す。
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store, clock: Arc::new(SystemClock) }
    }

    /// 時刻源を差し替える（テスト用）
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryTodoStore::default()))
    }
}
