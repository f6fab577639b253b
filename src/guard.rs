//! Guard Coordinator (C8) — memory and error-rate budgets that flip the
//! pipeline into degraded mode (line strategy only) under pressure (§4.8).
//! Grounded on the teacher's `quality_log` pattern of surfacing internal
//! state for diagnosis (`ingest/code/quality_log.rs`) and on `sysinfo`'s
//! process-memory API, which `marlonsc-mcb`'s sibling repo already depends
//! on for the same resident-set-size read this module needs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{info, warn};

use crate::cache::TreeCache;
use crate::config::GuardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemoryState {
    Normal,
    Degraded,
}

struct ErrorWindow {
    /// Ring buffer of the last `error_window` outcomes (`true` = failed).
    outcomes: Vec<bool>,
    next: usize,
    filled: usize,
    /// Remaining runs of forced degraded mode after the error budget trips.
    degraded_runs_left: usize,
}

impl ErrorWindow {
    fn new(capacity: usize) -> Self {
        Self {
            outcomes: vec![false; capacity.max(1)],
            next: 0,
            filled: 0,
            degraded_runs_left: 0,
        }
    }

    fn record(&mut self, failed: bool, threshold: f64, degraded_runs: usize) -> bool {
        let cap = self.outcomes.len();
        self.outcomes[self.next] = failed;
        self.next = (self.next + 1) % cap;
        self.filled = (self.filled + 1).min(cap);

        let failures = self.outcomes[..self.filled].iter().filter(|&&f| f).count();
        let rate = failures as f64 / self.filled as f64;

        if self.filled == cap && rate > threshold {
            self.degraded_runs_left = degraded_runs;
        } else if self.degraded_runs_left > 0 {
            self.degraded_runs_left -= 1;
        }
        self.degraded_runs_left > 0
    }
}

/// A read-only snapshot of guard state for observability, mirroring the
/// teacher's habit of exposing internal counters as plain data rather than
/// folding them into the control path (§9.5).
#[derive(Debug, Clone)]
pub struct GuardSnapshot {
    pub memory_degraded: bool,
    pub error_degraded: bool,
    pub resident_bytes: u64,
}

/// Estimates process resident memory. Reading `/proc/self/statm` avoids
/// pulling in a full system-info scan (`sysinfo::System::refresh_all`) on
/// every guard check, which the Guard calls once per file (§4.8, §4.9 step
/// 1) — cheap enough to not dominate per-file overhead.
fn resident_bytes_default() -> u64 {
    std::fs::read_to_string("/proc/self/statm")
        .ok()
        .and_then(|s| s.split_whitespace().nth(1).map(str::to_string))
        .and_then(|pages| pages.parse::<u64>().ok())
        .map(|pages| pages * 4096)
        .unwrap_or(0)
}

pub struct GuardCoordinator {
    config: GuardConfig,
    memory_state: AtomicBool, // true = degraded
    errors: Mutex<ErrorWindow>,
    last_resident_bytes: AtomicU64,
    estimator: Box<dyn Fn() -> u64 + Send + Sync>,
}

impl GuardCoordinator {
    #[must_use]
    pub fn new(config: GuardConfig) -> Self {
        Self::with_estimator(config, resident_bytes_default)
    }

    /// Accepts a custom resident-memory estimator, mainly for tests that
    /// need deterministic values instead of the real process RSS.
    #[must_use]
    pub fn with_estimator(config: GuardConfig, estimator: impl Fn() -> u64 + Send + Sync + 'static) -> Self {
        let error_window = config.error_window;
        Self {
            config,
            memory_state: AtomicBool::new(false),
            errors: Mutex::new(ErrorWindow::new(error_window)),
            last_resident_bytes: AtomicU64::new(0),
            estimator: Box::new(estimator),
        }
    }

    /// Runs the memory check: reads resident bytes, triggers cleanup at or
    /// above `memory_high_water` regardless of how far past it resident is,
    /// then re-checks `memory_hard_limit` *after* cleanup to decide degraded
    /// mode, and recovers once below `memory_low_water` (§4.8). Cleanup must
    /// run before the hard-limit check, not instead of it — otherwise worse
    /// pressure (straight past high-water to hard-limit) would skip eviction
    /// entirely.
    pub fn check_memory(&self, cache: &TreeCache) {
        let resident = (self.estimator)();
        self.last_resident_bytes.store(resident, Ordering::Relaxed);

        if resident >= self.config.memory_high_water as u64 {
            self.cleanup(cache);
            let after = (self.estimator)();
            self.last_resident_bytes.store(after, Ordering::Relaxed);
            if after >= self.config.memory_hard_limit as u64 {
                self.set_memory_degraded(true, after);
            }
        } else if resident < self.config.memory_low_water as u64 {
            self.set_memory_degraded(false, resident);
        }
    }

    /// §4.8's cleanup step: evict half of the AST cache LRU, drop per-query
    /// caches, request a GC hint. This crate only caches parsed trees (no
    /// per-query-match or chunk-set cache exists — see DESIGN.md), so "drop
    /// per-query caches" has nothing to act on yet; the tree half-eviction is
    /// real.
    fn cleanup(&self, cache: &TreeCache) {
        info!(
            resident_bytes = self.last_resident_bytes.load(Ordering::Relaxed),
            cache_len = cache.len(),
            "guard: memory high water reached, evicting half of AST cache"
        );
        cache.evict_to(cache.len() / 2);
    }

    fn set_memory_degraded(&self, degraded: bool, resident: u64) {
        let was = self.memory_state.swap(degraded, Ordering::SeqCst);
        if was != degraded {
            if degraded {
                warn!(resident_bytes = resident, "guard: entering memory-degraded mode");
            } else {
                info!(resident_bytes = resident, "guard: recovered from memory-degraded mode");
            }
        }
    }

    /// Records the outcome of one pipeline run against the error-rate
    /// budget (§4.8's sliding window of the last N=100 runs).
    pub fn record_outcome(&self, failed: bool) {
        let degraded = self.errors.lock().unwrap().record(
            failed,
            self.config.error_rate_threshold,
            self.config.error_degraded_runs,
        );
        let _ = degraded;
    }

    #[must_use]
    pub fn error_degraded(&self) -> bool {
        self.errors.lock().unwrap().degraded_runs_left > 0
    }

    /// The single predicate C9 consults before each file (§4.8).
    #[must_use]
    pub fn should_use_fallback(&self) -> bool {
        self.memory_state.load(Ordering::SeqCst) || self.error_degraded()
    }

    #[must_use]
    pub fn snapshot(&self) -> GuardSnapshot {
        GuardSnapshot {
            memory_degraded: self.memory_state.load(Ordering::SeqCst),
            error_degraded: self.error_degraded(),
            resident_bytes: self.last_resident_bytes.load(Ordering::Relaxed),
        }
    }
}
