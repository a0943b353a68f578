//! Time abstraction for testability
//!
//! Provides a trait-based approach to time operations that allows for
//! deterministic testing without relying on actual time passage.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Trait for time operations to enable testing.
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time).
    fn now(&self) -> Instant;
}

/// Real system clock implementation. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Controllable clock for deterministic tests.
///
/// Clones share the same underlying time; advancing one advances all.
#[derive(Debug, Clone)]
pub struct MockClock {
    inner: Arc<Mutex<MockClockInner>>,
}

#[derive(Debug)]
struct MockClockInner {
    origin: Instant,
    offset: Duration,
}

impl MockClock {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(MockClockInner { origin: Instant::now(), offset: Duration::ZERO })) }
    }

    /// Advance the mock time by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.offset += duration;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        let inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.origin + inner.offset
    }
}
