use crate::repositories::{StoreError, TodoStore};
use async_trait::async_trait;
use domain::{Todo, TodoChanges, TodoId};
use tokio::sync::RwLock;

/// 簡易な InMemory 実装（開発/テスト用）
///
/// `Vec` で保持するため一覧は常に追加順です。
#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn insert(&self, todo: Todo) -> Result<Todo, StoreError> {
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn insert_many(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        self.todos.write().await.extend(todos);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.clone())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.read().await.iter().find(|t| &t.id == id).cloned())
    }

    async fn find_by_id_and_update(
        &self,
        id: &TodoId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos.iter_mut().find(|t| &t.id == id).map(|todo| {
            todo.apply(changes);
            todo.clone()
        }))
    }

    async fn find_by_id_and_delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter()
            .position(|t| &t.id == id)
            .map(|index| todos.remove(index)))
    }

    async fn remove_all(&self) -> Result<(), StoreError> {
        self.todos.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::FixedClock;

    fn todo(text: &str) -> Todo {
        Todo::new(TodoId::generate(), text).unwrap()
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = InMemoryTodoStore::new();
        let a = store.insert(todo("A")).await.unwrap();
        let b = store.insert(todo("B")).await.unwrap();
        let c = store.insert(todo("C")).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![a, b, c]);
    }

    #[tokio::test]
    async fn update_returns_post_image() {
        let store = InMemoryTodoStore::new();
        let created = store.insert(todo("first")).await.unwrap();

        let changes = TodoChanges::new(None, Some(true), &FixedClock(42)).unwrap();
        let updated = store
            .find_by_id_and_update(&created.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.completed_at, Some(42));

        let stored = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn update_and_delete_missing_return_none() {
        let store = InMemoryTodoStore::new();
        let id = TodoId::generate();
        let changes = TodoChanges::new(Some("x"), None, &FixedClock(0)).unwrap();
        assert!(store.find_by_id_and_update(&id, &changes).await.unwrap().is_none());
        assert!(store.find_by_id_and_delete(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_pre_image_and_removes() {
        let store = InMemoryTodoStore::new();
        let a = store.insert(todo("A")).await.unwrap();
        let b = store.insert(todo("B")).await.unwrap();

        let deleted = store.find_by_id_and_delete(&a.id).await.unwrap();
        assert_eq!(deleted, Some(a.clone()));
        assert!(store.find_by_id(&a.id).await.unwrap().is_none());
        assert_eq!(store.find_all().await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn remove_all_then_insert_many_reseeds() {
        let store = InMemoryTodoStore::new();
        store.insert(todo("old")).await.unwrap();

        store.remove_all().await.unwrap();
        store.insert_many(vec![todo("first"), todo("second")]).await.unwrap();

        let texts: Vec<String> = store.find_all().await.unwrap().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn concurrent_inserts_are_all_kept() {
        let store = std::sync::Arc::new(InMemoryTodoStore::new());
        let tasks = (0..20).map(|i| {
            let store = store.clone();
            async move { store.insert(todo(&format!("t{i}"))).await }
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap();
        }
        assert_eq!(store.find_all().await.unwrap().len(), 20);
    }
}
