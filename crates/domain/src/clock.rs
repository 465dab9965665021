use chrono::Utc;

/// 現在時刻（エポックからのミリ秒）の供給源
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// 実時間を返すクロック
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// 常に同じ時刻を返すクロック（テスト用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}
