//! Time utilities

use chrono::{DateTime, Utc};

/// 현재 UTC 타임스탬프 (밀리초)
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// 밀리초 타임스탬프를 ISO 8601 문자열로 변환
pub fn iso8601(ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso8601() {
        assert_eq!(iso8601(0).as_deref(), Some("1970-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_now_ms_is_recent() {
        assert!(now_ms() > 1_600_000_000_000);
    }
}
