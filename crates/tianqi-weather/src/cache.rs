use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::payload::ForecastPayload;

/// In-process cache of the last upstream payload.
///
/// The whole forecast horizon arrives in one response, so a single slot is
/// enough; entries older than the TTL are ignored.
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    slot: Mutex<Option<CachedPayload>>,
}

#[derive(Debug)]
struct CachedPayload {
    payload: Arc<ForecastPayload>,
    fetched_at: Instant,
}

impl ForecastCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(Duration::from_secs(u64::from(minutes) * 60))
    }

    /// Cached payload if one is present and still fresh
    pub fn get(&self) -> Option<Arc<ForecastPayload>> {
        self.get_at(Instant::now())
    }

    fn get_at(&self, now: Instant) -> Option<Arc<ForecastPayload>> {
        if self.ttl.is_zero() {
            return None;
        }
        let slot = self.slot.lock();
        let cached = slot.as_ref()?;
        if now.saturating_duration_since(cached.fetched_at) >= self.ttl {
            return None;
        }
        Some(Arc::clone(&cached.payload))
    }

    pub fn store(&self, payload: Arc<ForecastPayload>) {
        if self.ttl.is_zero() {
            return;
        }
        *self.slot.lock() = Some(CachedPayload {
            payload,
            fetched_at: Instant::now(),
        });
    }

    /// Drop the cached payload so the next read goes upstream
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}
