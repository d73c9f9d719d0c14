use crate::equity::calculator::{calculate_equities, EquityCurves};
use indexmap::IndexMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_CAPACITY: usize = 128;

//cache key built from the bit pattern of every input element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    returns: Vec<u64>,
    signals: Vec<u64>,
}

impl CacheKey {
    pub fn new(daily_returns: &[f64], signals: &[f64]) -> Self {
        CacheKey {
            returns: daily_returns.iter().map(|v| v.to_bits()).collect(),
            signals: signals.iter().map(|v| v.to_bits()).collect(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    curves: EquityCurves,
    inserted_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: IndexMap<CacheKey, CacheEntry>,
    hits: u64,
    misses: u64,
}

//memoizes equity calculations by input content with a time-based expiry
#[derive(Debug)]
pub struct EquityCache {
    ttl: Duration,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl Default for EquityCache {
    fn default() -> Self {
        EquityCache::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

impl EquityCache {
    //creates a cache, capacity is at least one entry
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        EquityCache {
            ttl,
            capacity: capacity.max(1),
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    //returns cached curves for these inputs or computes and stores them
    pub fn get_or_compute(&self, daily_returns: &[f64], signals: &[f64]) -> EquityCurves {
        self.get_or_compute_at(daily_returns, signals, Instant::now())
    }

    fn get_or_compute_at(
        &self,
        daily_returns: &[f64],
        signals: &[f64],
        now: Instant,
    ) -> EquityCurves {
        let key = CacheKey::new(daily_returns, signals);

        {
            let mut state = self.lock();
            let fresh = state
                .entries
                .get(&key)
                .filter(|entry| now.saturating_duration_since(entry.inserted_at) < self.ttl)
                .map(|entry| entry.curves.clone());

            if let Some(curves) = fresh {
                state.hits += 1;
                debug!(signals = signals.len(), "equity cache hit");
                return curves;
            }
            state.misses += 1;
        }

        //compute outside the lock, the calculator never touches shared state
        let curves = calculate_equities(daily_returns, signals);

        let mut state = self.lock();
        state.entries.shift_remove(&key);
        while state.entries.len() >= self.capacity {
            state.entries.shift_remove_index(0);
        }
        state.entries.insert(
            key,
            CacheEntry {
                curves: curves.clone(),
                inserted_at: now,
            },
        );
        debug!(
            signals = signals.len(),
            entries = state.entries.len(),
            "equity cache miss"
        );

        curves
    }

    pub fn hits(&self) -> u64 {
        self.lock().hits
    }

    pub fn misses(&self) -> u64 {
        self.lock().misses
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    //a poisoned lock only means another caller panicked mid-insert, the map is still usable
    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
