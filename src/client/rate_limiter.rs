//! Rate limiting for API requests

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// 레이트 리미터
///
/// CCXT의 `rateLimit` 방식: 요청 사이에 `rate_limit_ms * cost` 만큼의
/// 최소 간격을 둔다.
pub struct RateLimiter {
    rate_limit_ms: u64,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// 새로운 레이트 리미터 생성
    ///
    /// # Arguments
    /// * `rate_limit_ms` - 요청 간 최소 간격 (밀리초)
    pub fn new(rate_limit_ms: u64) -> Self {
        Self {
            rate_limit_ms,
            next_slot: Mutex::new(None),
        }
    }

    fn interval(&self, cost: f64) -> Duration {
        let millis = (self.rate_limit_ms as f64 * cost.max(0.0)).round() as u64;
        Duration::from_millis(millis)
    }

    /// 다음 슬롯까지 대기 후 슬롯 예약
    pub async fn throttle(&self, cost: f64) {
        let wait = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let start = match *next {
                Some(slot) if slot > now => slot,
                _ => now,
            };
            *next = Some(start + self.interval(cost));
            start.saturating_duration_since(now)
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }

    /// 대기 없이 슬롯 획득 시도
    pub fn try_acquire(&self, cost: f64) -> bool {
        let Ok(mut next) = self.next_slot.try_lock() else {
            return false;
        };
        let now = Instant::now();
        match *next {
            Some(slot) if slot > now => false,
            _ => {
                *next = Some(now + self.interval(cost));
                true
            },
        }
    }

    /// 요청 간 최소 간격 (밀리초)
    pub fn rate_limit_ms(&self) -> u64 {
        self.rate_limit_ms
    }
}
