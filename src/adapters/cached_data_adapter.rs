//! Time-bounded bar cache in front of any [`DataPort`].

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::domain::bar::Bar;
use crate::domain::error::StratbenchError;
use crate::ports::data_port::DataPort;

/// Wall-clock source in whole seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start_secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(start_secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

type CacheKey = (String, u32);

pub struct CachedDataAdapter<D, C = SystemClock> {
    inner: D,
    clock: C,
    ttl_secs: u64,
    entries: Mutex<HashMap<CacheKey, (u64, Vec<Bar>)>>,
}

impl<D: DataPort> CachedDataAdapter<D, SystemClock> {
    pub fn new(inner: D, ttl_secs: u64) -> Self {
        Self::with_clock(inner, ttl_secs, SystemClock)
    }
}

impl<D: DataPort, C: Clock> CachedDataAdapter<D, C> {
    pub fn with_clock(inner: D, ttl_secs: u64, clock: C) -> Self {
        Self {
            inner,
            clock,
            ttl_secs,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of cached series, expired ones included until the next insert.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached series.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl<D: DataPort, C: Clock> DataPort for CachedDataAdapter<D, C> {
    fn fetch_bars(&self, ticker: &str, lookback_days: u32) -> Result<Vec<Bar>, StratbenchError> {
        if self.ttl_secs == 0 {
            return self.inner.fetch_bars(ticker, lookback_days);
        }

        let key = (ticker.to_uppercase(), lookback_days);
        let now = self.clock.now_secs();
        {
            let entries = self
                .entries
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some((stored_at, bars)) = entries.get(&key) {
                if now.saturating_sub(*stored_at) < self.ttl_secs {
                    debug!(ticker, lookback_days, "bar cache hit");
                    return Ok(bars.clone());
                }
            }
        }

        // Fetch outside the lock; errors are never cached.
        let bars = self.inner.fetch_bars(ticker, lookback_days)?;
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let ttl_secs = self.ttl_secs;
        entries.retain(|_, (stored_at, _)| now.saturating_sub(*stored_at) < ttl_secs);
        entries.insert(key, (now, bars.clone()));
        Ok(bars)
    }
}
