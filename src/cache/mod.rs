//! AST/Tree Cache (C4) — a content-addressed, single-flight, byte-budgeted
//! cache of parsed trees, generalizing the `ParseCache`/`hash_content`/
//! `parse_with_cache` pattern (keyed there on `(Language, u64)` content
//! hash with a fixed entry-count `LruCache`) into the spec's content digest
//! (`Digest`, §4.4) and a byte-budget eviction instead of a flat entry cap,
//! plus single-flight so two workers racing to parse the same bytes don't
//! both pay tree-sitter cost (§4.4, §5 "no duplicated work under
//! concurrency").

use dashmap::DashMap;
use lru::LruCache;
use once_cell::sync::OnceCell;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, RwLock};
use tree_sitter::Tree;

use crate::digest::Digest;
use crate::error::Result;
use crate::language::Language;

type Key = (Language, Digest);

/// A slot that exactly one caller fills; concurrent lookups for the same
/// key block on the same `OnceCell` instead of each re-parsing (single
/// flight). Cloned out of `in_flight` and dropped once the entry lands in
/// `lru`, so `in_flight` only ever holds slots for parses genuinely in
/// progress.
type InFlightSlot = Arc<OnceCell<Arc<Tree>>>;

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub single_flight_joins: u64,
    pub evictions: u64,
    pub bytes_held: usize,
}

impl CacheStats {
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Entry {
    tree: Arc<Tree>,
    byte_len: usize,
}

/// Thread-safe, content-addressed cache of parsed trees bounded by a total
/// byte budget rather than an entry count, since a handful of huge files
/// can dominate memory far more than entry count captures (§4.4, ties into
/// C8's memory guard).
pub struct TreeCache {
    lru: Mutex<LruCache<Key, Entry>>,
    in_flight: DashMap<Key, InFlightSlot>,
    stats: RwLock<CacheStats>,
    byte_budget: usize,
}

impl TreeCache {
    #[must_use]
    pub fn new(byte_budget: usize) -> Self {
        Self {
            // Entry count inside `LruCache` is nominal; eviction is driven
            // by `byte_budget`, so the count cap just needs to be large
            // enough to never bind first.
            lru: Mutex::new(LruCache::new(NonZeroUsize::new(1 << 20).unwrap())),
            in_flight: DashMap::new(),
            stats: RwLock::new(CacheStats::default()),
            byte_budget,
        }
    }

    /// Returns the cached tree for `(language, digest)`, parsing with
    /// `parse` on a miss. Concurrent callers with the same key share the
    /// in-progress parse (single flight) rather than each invoking `parse`.
    pub fn get_or_parse(
        &self,
        language: Language,
        digest: Digest,
        source_len: usize,
        parse: impl FnOnce() -> Result<Tree>,
    ) -> Result<Arc<Tree>> {
        let key = (language, digest);

        if let Some(entry) = self.lru.lock().unwrap().get(&key) {
            self.stats.write().unwrap().hits += 1;
            return Ok(Arc::clone(&entry.tree));
        }

        let slot = self
            .in_flight
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = slot.get_or_try_init(|| parse().map(Arc::new));
        let tree = match result {
            Ok(tree) => {
                let tree = Arc::clone(tree);
                self.stats.write().unwrap().misses += 1;
                self.insert(key, Arc::clone(&tree), source_len);
                self.in_flight.remove(&key);
                tree
            }
            Err(e) => {
                self.in_flight.remove(&key);
                return Err(e);
            }
        };
        Ok(tree)
    }

    fn insert(&self, key: Key, tree: Arc<Tree>, byte_len: usize) {
        if byte_len > self.byte_budget {
            // Larger than the whole budget: serve it once without caching
            // rather than evicting everything else to make room.
            return;
        }
        let mut lru = self.lru.lock().unwrap();
        let mut held: usize = lru.iter().map(|(_, e)| e.byte_len).sum();
        let mut evictions = 0u64;
        while held + byte_len > self.byte_budget {
            match lru.pop_lru() {
                Some((_, evicted)) => {
                    held -= evicted.byte_len;
                    evictions += 1;
                }
                None => break,
            }
        }
        lru.put(key, Entry { tree, byte_len });
        if evictions > 0 {
            self.stats.write().unwrap().evictions += evictions;
        }
        self.stats.write().unwrap().bytes_held = held + byte_len;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.read().unwrap().clone()
    }

    /// Evicts the single least-recently-used entry. Returns `false` if the
    /// cache was already empty.
    pub fn evict_one(&self) -> bool {
        let mut lru = self.lru.lock().unwrap();
        match lru.pop_lru() {
            Some((_, evicted)) => {
                let mut stats = self.stats.write().unwrap();
                stats.evictions += 1;
                stats.bytes_held = stats.bytes_held.saturating_sub(evicted.byte_len);
                true
            }
            None => false,
        }
    }

    /// Evicts least-recently-used entries until at most `target_len` remain
    /// (§4.8's "evict half of the AST cache LRU" — the Guard passes
    /// `len() / 2`).
    pub fn evict_to(&self, target_len: usize) {
        while self.len() > target_len {
            if !self.evict_one() {
                break;
            }
        }
    }

    pub fn clear(&self) {
        self.lru.lock().unwrap().clear();
        self.in_flight.clear();
        *self.stats.write().unwrap() = CacheStats::default();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lru.lock().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn tiny_tree() -> Tree {
        let registry = crate::parser::ParserRegistry::new();
        registry.parse(b"fn f() {}", Language::Rust).unwrap()
    }

    #[test]
    fn second_lookup_for_same_key_is_a_hit() {
        let cache = TreeCache::new(1 << 20);
        let digest = Digest::of_bytes(b"fn f() {}");
        let calls = AtomicUsize::new(0);
        cache
            .get_or_parse(Language::Rust, digest, 9, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(tiny_tree())
            })
            .unwrap();
        cache
            .get_or_parse(Language::Rust, digest, 9, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(tiny_tree())
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn oversize_entry_is_served_but_not_retained() {
        let cache = TreeCache::new(4);
        let digest = Digest::of_bytes(b"fn f() {}");
        cache
            .get_or_parse(Language::Rust, digest, 9, || Ok(tiny_tree()))
            .unwrap();
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn eviction_keeps_total_bytes_under_budget() {
        let cache = TreeCache::new(20);
        for i in 0..5u8 {
            let bytes = format!("fn f{i}() {{}}");
            let digest = Digest::of_bytes(bytes.as_bytes());
            cache
                .get_or_parse(Language::Rust, digest, bytes.len(), || Ok(tiny_tree()))
                .unwrap();
        }
        assert!(cache.stats().evictions > 0);
    }

    #[test]
    fn evict_to_halves_the_cache_rather_than_clearing_it() {
        let cache = TreeCache::new(1 << 20);
        for i in 0..6u8 {
            let bytes = format!("fn f{i}() {{}}");
            let digest = Digest::of_bytes(bytes.as_bytes());
            cache
                .get_or_parse(Language::Rust, digest, bytes.len(), || Ok(tiny_tree()))
                .unwrap();
        }
        let before = cache.len();
        cache.evict_to(before / 2);
        assert_eq!(cache.len(), before / 2);
        assert!(!cache.is_empty());
    }

    #[test]
    fn clear_resets_stats_and_entries() {
        let cache = TreeCache::new(1 << 20);
        let digest = Digest::of_bytes(b"fn f() {}");
        cache
            .get_or_parse(Language::Rust, digest, 9, || Ok(tiny_tree()))
            .unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 0);
    }
}
