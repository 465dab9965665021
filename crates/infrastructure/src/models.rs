use crate::repositories::StoreError;
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoId};
use std::collections::HashMap;

/// パーティションキー属性名
pub const ID_ATTR: &str = "_id";
pub const TEXT_ATTR: &str = "text";
pub const COMPLETED_ATTR: &str = "completed";
pub const COMPLETED_AT_ATTR: &str = "completedAt";

/// ID をキー属性に変換
pub fn key_of(id: &TodoId) -> HashMap<String, AttributeValue> {
    HashMap::from([(ID_ATTR.to_string(), AttributeValue::S(id.to_string()))])
}

/// `completedAt` の属性値（未完了なら NULL）
pub fn completed_at_value(completed_at: Option<i64>) -> AttributeValue {
    match completed_at {
        Some(ms) => AttributeValue::N(ms.to_string()),
        None => AttributeValue::Null(true),
    }
}

/// Todo を DynamoDB AttributeValue マップに変換
pub fn to_attribute_map(todo: &Todo) -> HashMap<String, AttributeValue> {
    let mut map = key_of(&todo.id);
    map.insert(TEXT_ATTR.to_string(), AttributeValue::S(todo.text.clone()));
    map.insert(COMPLETED_ATTR.to_string(), AttributeValue::Bool(todo.completed));
    map.insert(
        COMPLETED_AT_ATTR.to_string(),
        completed_at_value(todo.completed_at),
    );
    map
}

/// DynamoDB AttributeValue マップから Todo を復元
pub fn from_attribute_map(map: &HashMap<String, AttributeValue>) -> Result<Todo, StoreError> {
    let id = map
        .get(ID_ATTR)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| StoreError::Corrupt("missing _id".to_string()))?;
    let id = TodoId::parse(id).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let text = map
        .get(TEXT_ATTR)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| StoreError::Corrupt(format!("missing text for {id}")))?
        .clone();

    let completed = map
        .get(COMPLETED_ATTR)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false);

    let completed_at = match map.get(COMPLETED_AT_ATTR) {
        None | Some(AttributeValue::Null(_)) => None,
        Some(AttributeValue::N(n)) => Some(
            n.parse::<i64>()
                .map_err(|_| StoreError::Corrupt(format!("invalid completedAt for {id}: {n}")))?,
        ),
        Some(other) => {
            return Err(StoreError::Corrupt(format!(
                "unexpected completedAt for {id}: {other:?}"
            )))
        }
    };

    Ok(Todo { id, text, completed, completed_at })
}
