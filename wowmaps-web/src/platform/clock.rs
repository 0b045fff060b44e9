use std::time::Duration;

use gloo::timers::future::TimeoutFuture;
use wowmaps_core::GateClock;

/// Time since page load, or zero when no browser timer is available.
#[must_use]
pub fn now() -> Duration {
    crate::dom::performance_now_ms().map_or(Duration::ZERO, duration_from_ms)
}

fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1_000.0)
    } else {
        Duration::ZERO
    }
}

/// Whole milliseconds for a browser timer, saturating at `u32::MAX`.
#[must_use]
pub fn timer_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// [`GateClock`] backed by `performance.now()` and `setTimeout`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BrowserClock;

#[async_trait::async_trait(?Send)]
impl GateClock for BrowserClock {
    fn now(&self) -> Duration {
        now()
    }

    async fn sleep(&self, duration: Duration) {
        TimeoutFuture::new(timer_ms(duration)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millisecond_conversions_clamp() {
        assert_eq!(duration_from_ms(1_500.0), Duration::from_millis(1_500));
        assert_eq!(duration_from_ms(-3.0), Duration::ZERO);
        assert_eq!(duration_from_ms(f64::NAN), Duration::ZERO);
        assert_eq!(timer_ms(Duration::from_millis(800)), 800);
        assert_eq!(timer_ms(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn native_builds_read_zero_time() {
        assert_eq!(BrowserClock.now(), Duration::ZERO);
    }
}
