use crate::clock::Clock;
use crate::errors::DomainError;
use chrono::Utc;
use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

const TODO_ID_LEN: usize = 24;

/// プロセス固有の 5 バイト乱数（ID の中間部）
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let mut bytes = [0u8; 5];
    rand::thread_rng().fill(&mut bytes[..]);
    bytes
});

/// カウンタ初期値の上限。起動直後に 24 ビットで折り返さないよう上位 65536 件分を空けておく
const COUNTER_SEED_MAX: u32 = 0x00ff_0000;

/// ID 末尾 3 バイトのカウンタ（乱数で初期化）
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(counter_seed()));

fn counter_seed() -> u32 {
    rand::thread_rng().gen_range(0..COUNTER_SEED_MAX)
}

/// ドキュメントストアのオブジェクト ID 形式（24 桁の 16 進数）の Todo 識別子
///
/// レイアウト: 秒単位タイムスタンプ 4 バイト + プロセス固有値 5 バイト + カウンタ 3 バイト。
/// 同一プロセス内では生成順に辞書順ソートされます。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId(String);

impl TodoId {
    /// 新しい ID を採番
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// 文字列を検証して ID に変換（小文字の 16 進数 24 桁のみ受け付ける）
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let well_formed = id.len() == TODO_ID_LEN
            && id.chars().all(|c| c.is_ascii_digit() || matches!(c, 'a'..='f'));
        if !well_formed {
            return Err(DomainError::InvalidTodoId(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ID に埋め込まれた生成時刻（秒）
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_str_radix(&self.0[..8], 16).unwrap_or_default()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TodoId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TodoId> for String {
    fn from(id: TodoId) -> Self {
        id.0
    }
}

/// Todo テキストを検証し、前後の空白を除いた値を返します。
pub fn validate_text(candidate: &str) -> Result<String, DomainError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyText);
    }
    Ok(trimmed.to_string())
}

/// 永続化する完了状態の組
///
/// `completed_at` は `completed == true` のときに限り `Some` になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub completed: bool,
    pub completed_at: Option<i64>,
}

impl Completion {
    /// 望ましい完了フラグと時刻源から完了状態を決定します。
    pub fn apply(completed: bool, clock: &dyn Clock) -> Self {
        if completed {
            Self { completed: true, completed_at: Some(clock.now_millis()) }
        } else {
            Self { completed: false, completed_at: None }
        }
    }
}

/// 検証済みの部分更新
///
/// `None` のフィールドは変更しません。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub completion: Option<Completion>,
}

impl TodoChanges {
    /// 生の更新値を検証して変更内容に変換します。
    /// すべてのフィールドを検証してから値を返すため、一部だけ適用されることはありません。
    pub fn new(
        text: Option<&str>,
        completed: Option<bool>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let text = text.map(validate_text).transpose()?;
        let completion = completed.map(|c| Completion::apply(c, clock));
        Ok(Self { text, completion })
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completion.is_none()
    }
}

/// Todo ドキュメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

impl Todo {
    /// 未完了の Todo を作成します。
    pub fn new(id: TodoId, text: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            text: validate_text(text)?,
            completed: false,
            completed_at: None,
        })
    }

    /// 変更内容を適用します。
    pub fn apply(&mut self, changes: &TodoChanges) {
        if let Some(text) = &changes.text {
            self.text = text.clone();
        }
        if let Some(completion) = changes.completion {
            self.completed = completion.completed;
            self.completed_at = completion.completed_at;
        }
    }
}
