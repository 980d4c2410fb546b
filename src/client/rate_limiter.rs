//! Rate limiting for API requests

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// 레이트 리미터
///
/// 요청 사이에 최소 간격을 두는 방식. Waiting callers queue on the mutex, so slots are
/// handed out in arrival order.
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
    acquired: AtomicU64,
}

impl RateLimiter {
    /// 새로운 레이트 리미터 생성
    ///
    /// # Arguments
    /// * `interval_ms` - 요청 간 최소 간격 (밀리초, 0이면 제한 없음)
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval: Duration::from_millis(interval_ms),
            next_slot: Mutex::new(None),
            acquired: AtomicU64::new(0),
        }
    }

    /// 토큰 획득 시도 (블로킹 없음)
    pub fn try_acquire(&self) -> bool {
        let Ok(mut next) = self.next_slot.try_lock() else {
            return false;
        };
        let now = Instant::now();
        match *next {
            Some(slot) if slot > now => false,
            _ => {
                *next = Some(now + self.interval);
                self.acquired.fetch_add(1, Ordering::Relaxed);
                true
            },
        }
    }

    /// 토큰 획득 (필요시 대기)
    pub async fn throttle(&self) {
        let mut next = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = match *next {
            Some(slot) if slot > now => slot,
            _ => now,
        };
        if slot > now {
            tokio::time::sleep_until(slot).await;
        }
        *next = Some(slot + self.interval);
        self.acquired.fetch_add(1, Ordering::Relaxed);
    }

    /// 요청 간 최소 간격
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 지금까지 허용된 요청 수
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }
}
