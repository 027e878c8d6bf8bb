//! Translation cache: `(text, target language)` -> translated text.
//!
//! Shared by `Arc` across requests. Bounded by capacity (oldest insertion evicted first)
//! and by a time-to-live measured on an injectable clock. New keys are admitted under a
//! lock, so `len()` never exceeds capacity even with concurrent inserts.

use crate::config::CacheConfig;
use crate::language::LanguageCode;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for entry expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|p| p.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|p| p.into_inner());
        self.origin + offset
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub text: String,
    pub target: LanguageCode,
}

impl CacheKey {
    pub fn new(text: &str, target: LanguageCode) -> Self {
        Self {
            text: text.to_string(),
            target,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    inserted_at: Instant,
    seq: u64,
}

pub struct TranslationCache {
    entries: DashMap<CacheKey, CacheEntry>,
    capacity: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    next_seq: AtomicU64,
    /// Held while evicting and admitting a new key.
    admit_lock: Mutex<()>,
}

impl TranslationCache {
    pub fn new(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
            clock,
            next_seq: AtomicU64::new(0),
            admit_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.ttl(), Arc::new(SystemClock))
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }

    /// Cached translation, if present and not expired. Expired entries are dropped on read.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let now = self.clock.now();
        let hit = self.entries.get(key).map(|e| {
            if self.is_expired(&e, now) {
                None
            } else {
                Some(e.value.clone())
            }
        })?;
        if hit.is_none() {
            self.entries
                .remove_if(key, |_, e| self.is_expired(e, now));
        }
        hit
    }

    pub fn insert(&self, key: CacheKey, value: String) {
        let now = self.clock.now();
        if let Some(mut existing) = self.entries.get_mut(&key) {
            existing.value = value;
            existing.inserted_at = now;
            existing.seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let _admit = self.admit_lock.lock().unwrap_or_else(|p| p.into_inner());
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.entries.retain(|_, e| !self.is_expired(e, now));
            while self.entries.len() >= self.capacity {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|e| e.value().seq)
                    .map(|e| e.key().clone());
                match oldest {
                    Some(k) => {
                        tracing::debug!(target: "selah::translate", target_language = %k.target, "Evicting oldest cached translation");
                        self.entries.remove(&k);
                    }
                    None => break,
                }
            }
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
                seq,
            },
        );
    }

    /// Drop every entry; returns how many were removed.
    pub fn clear(&self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize, ttl_secs: u64) -> (TranslationCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TranslationCache::new(capacity, Duration::from_secs(ttl_secs), clock.clone());
        (cache, clock)
    }

    #[test]
    fn key_includes_target_language() {
        let (c, _) = cache(8, 60);
        c.insert(CacheKey::new("hello", LanguageCode::Am), "selam".into());
        assert_eq!(
            c.get(&CacheKey::new("hello", LanguageCode::Am)).as_deref(),
            Some("selam")
        );
        assert!(c.get(&CacheKey::new("hello", LanguageCode::Fr)).is_none());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let (c, clock) = cache(8, 60);
        let key = CacheKey::new("hello", LanguageCode::Es);
        c.insert(key.clone(), "hola".into());

        clock.advance(Duration::from_secs(59));
        assert!(c.get(&key).is_some());

        clock.advance(Duration::from_secs(1));
        assert!(c.get(&key).is_none());
        assert!(c.is_empty());
    }

    #[test]
    fn full_cache_evicts_oldest_insert() {
        let (c, _) = cache(2, 60);
        c.insert(CacheKey::new("a", LanguageCode::Fr), "1".into());
        c.insert(CacheKey::new("b", LanguageCode::Fr), "2".into());
        c.insert(CacheKey::new("c", LanguageCode::Fr), "3".into());

        assert_eq!(c.len(), 2);
        assert!(c.get(&CacheKey::new("a", LanguageCode::Fr)).is_none());
        assert!(c.get(&CacheKey::new("c", LanguageCode::Fr)).is_some());
    }

    #[test]
    fn expired_entries_go_before_live_ones() {
        let (c, clock) = cache(2, 60);
        c.insert(CacheKey::new("old", LanguageCode::De), "alt".into());
        clock.advance(Duration::from_secs(30));
        c.insert(CacheKey::new("mid", LanguageCode::De), "mitte".into());
        clock.advance(Duration::from_secs(31));
        c.insert(CacheKey::new("new", LanguageCode::De), "neu".into());

        assert!(c.get(&CacheKey::new("mid", LanguageCode::De)).is_some());
        assert!(c.get(&CacheKey::new("new", LanguageCode::De)).is_some());
    }

    #[test]
    fn overwrite_does_not_evict() {
        let (c, _) = cache(2, 60);
        c.insert(CacheKey::new("a", LanguageCode::It), "1".into());
        c.insert(CacheKey::new("b", LanguageCode::It), "2".into());
        c.insert(CacheKey::new("a", LanguageCode::It), "1b".into());

        assert_eq!(c.len(), 2);
        assert_eq!(c.get(&CacheKey::new("a", LanguageCode::It)).as_deref(), Some("1b"));
    }

    #[test]
    fn concurrent_inserts_stay_within_capacity() {
        let (c, _) = cache(8, 60);
        std::thread::scope(|scope| {
            for t in 0..8 {
                let c = &c;
                scope.spawn(move || {
                    for i in 0..50 {
                        c.insert(
                            CacheKey::new(&format!("t{}-{}", t, i), LanguageCode::Sw),
                            "x".into(),
                        );
                    }
                });
            }
        });
        assert_eq!(c.len(), 8);
    }

    #[test]
    fn clear_reports_removed_count() {
        let (c, _) = cache(8, 60);
        c.insert(CacheKey::new("a", LanguageCode::Ja), "1".into());
        c.insert(CacheKey::new("b", LanguageCode::Ja), "2".into());
        assert_eq!(c.clear(), 2);
        assert_eq!(c.clear(), 0);
    }
}
