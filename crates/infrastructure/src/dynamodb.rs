use crate::models::{
    completed_at_value, from_attribute_map, key_of, to_attribute_map, COMPLETED_AT_ATTR,
    COMPLETED_ATTR, ID_ATTR, TEXT_ATTR,
};
use crate::repositories::{StoreError, TodoStore};
use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use domain::{Todo, TodoChanges, TodoId};
use shared::Config;
use std::collections::HashMap;
use tracing::{debug, error, info};

/// テーブル名を伴った DynamoDB クライアント
#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    /// 設定から接続を初期化する。`dynamodb_endpoint` があれば DynamoDB Local 等に向ける
    pub async fn new(config: &Config) -> Self {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&aws_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
            table_name: config.dynamodb_table.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// SDK エラーをストアエラーに変換
    pub fn convert_error<E>(&self, e: E) -> StoreError
    where
        E: std::error::Error,
    {
        let message = DisplayErrorContext(e).to_string();
        error!(table = %self.table_name, error = %message, "DynamoDB error");
        StoreError::DynamoDb(message)
    }
}

/// `_id` をパーティションキーとするテーブルに Todo を保存するストア
#[derive(Clone)]
pub struct DynamoTodoStore {
    db: DynamoDbClient,
}

impl DynamoTodoStore {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }

    /// 全ページをスキャンして生のアイテムを集める
    async fn scan_items(
        &self,
        projection: Option<&str>,
    ) -> Result<Vec<HashMap<String, AttributeValue>>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let mut request = self
                .db
                .client()
                .scan()
                .table_name(self.db.table_name())
                .consistent_read(true)
                .set_exclusive_start_key(start_key.take());
            if let Some(expression) = projection {
                request = request
                    .projection_expression(expression)
                    .expression_attribute_names("#id", ID_ATTR);
            }

            let output = request.send().await.map_err(|e| self.db.convert_error(e))?;
            items.extend(output.items().iter().cloned());

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl TodoStore for DynamoTodoStore {
    async fn insert(&self, todo: Todo) -> Result<Todo, StoreError> {
        self.db
            .client()
            .put_item()
            .table_name(self.db.table_name())
            .set_item(Some(to_attribute_map(&todo)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID_ATTR)
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        debug!(todo_id = %todo.id, "Todo を保存しました");
        Ok(todo)
    }

    async fn insert_many(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        for todo in todos {
            self.insert(todo).await?;
        }
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        let mut todos = self
            .scan_items(None)
            .await?
            .iter()
            .map(from_attribute_map)
            .collect::<Result<Vec<_>, _>>()?;

        // スキャン順は不定なので、生成順に並ぶ ID でソートする。
        // 複数プロセスで作成された Todo 同士は秒単位でしか順序が保証されない
        todos.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(todos)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let output = self
            .db
            .client()
            .get_item()
            .table_name(self.db.table_name())
            .set_key(Some(key_of(id)))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        output.item().map(from_attribute_map).transpose()
    }

    async fn find_by_id_and_update(
        &self,
        id: &TodoId,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let mut update_parts = Vec::new();
        let mut builder = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .set_key(Some(key_of(id)))
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ID_ATTR)
            .return_values(ReturnValue::AllNew);

        if let Some(text) = &changes.text {
            update_parts.push("#text = :text");
            builder = builder
                .expression_attribute_names("#text", TEXT_ATTR)
                .expression_attribute_values(":text", AttributeValue::S(text.clone()));
        }

        if let Some(completion) = changes.completion {
            update_parts.push("#completed = :completed");
            update_parts.push("#completedAt = :completedAt");
            builder = builder
                .expression_attribute_names("#completed", COMPLETED_ATTR)
                .expression_attribute_names("#completedAt", COMPLETED_AT_ATTR)
                .expression_attribute_values(":completed", AttributeValue::Bool(completion.completed))
                .expression_attribute_values(
                    ":completedAt",
                    completed_at_value(completion.completed_at),
                );
        }

        let result = builder
            .update_expression(format!("SET {}", update_parts.join(", ")))
            .send()
            .await;

        match result {
            Ok(output) => output.attributes().map(from_attribute_map).transpose(),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(None)
            }
            Err(e) => Err(self.db.convert_error(e)),
        }
    }

    async fn find_by_id_and_delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let output = self
            .db
            .client()
            .delete_item()
            .table_name(self.db.table_name())
            .set_key(Some(key_of(id)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| self.db.convert_error(e))?;

        output.attributes().map(from_attribute_map).transpose()
    }

    async fn remove_all(&self) -> Result<(), StoreError> {
        let keys = self.scan_items(Some("#id")).await?;
        let count = keys.len();

        for key in keys {
            self.db
                .client()
                .delete_item()
                .table_name(self.db.table_name())
                .set_key(Some(key))
                .send()
                .await
                .map_err(|e| self.db.convert_error(e))?;
        }

        info!(table = %self.db.table_name(), count, "全件削除しました");
        Ok(())
    }
}
