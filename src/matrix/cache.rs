use crate::foundation::error::QrResult;
use crate::matrix::encoder::{BaseMatrix, MatrixEncoder};
use crate::style::spec::EccLevel;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Default number of base matrices retained by a [`RenderCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// Environment override for the cache capacity.
pub const CACHE_CAPACITY_ENV: &str = "QRDECOR_CACHE_CAPACITY";

/// The subset of a style that changes the encoded bitmap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseMatrixKey {
    pub content: String,
    pub size: u32,
    pub margin: u32,
    pub ecc: EccLevel,
}

/// Counters exposed for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub encoder_calls: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Engine-owned memo of encoded base matrices, bounded by least-recently-used eviction.
pub struct RenderCache {
    entries: HashMap<BaseMatrixKey, Arc<BaseMatrix>>,
    lru: VecDeque<BaseMatrixKey>,
    capacity: usize,
    stats: CacheStats,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Capacity from `QRDECOR_CACHE_CAPACITY` if set to a positive integer, else `fallback`.
    pub fn capacity_from_env(fallback: usize) -> usize {
        std::env::var(CACHE_CAPACITY_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(fallback)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &BaseMatrixKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            ..self.stats
        }
    }

    /// Return the bitmap for `key`, invoking `encoder` only on a miss. Failures are not cached.
    pub fn get_or_encode(
        &mut self,
        key: &BaseMatrixKey,
        encoder: &dyn MatrixEncoder,
    ) -> QrResult<Arc<BaseMatrix>> {
        if let Some(m) = self.entries.get(key).cloned() {
            self.stats.hits = self.stats.hits.saturating_add(1);
            self.touch(key);
            tracing::trace!(size = key.size, "base matrix cache hit");
            return Ok(m);
        }

        self.stats.misses = self.stats.misses.saturating_add(1);
        self.stats.encoder_calls = self.stats.encoder_calls.saturating_add(1);
        tracing::debug!(
            size = key.size,
            margin = key.margin,
            ecc = ?key.ecc,
            content_len = key.content.len(),
            "base matrix cache miss; encoding"
        );
        let m = Arc::new(encoder.encode_matrix(&key.content, key.size, key.margin, key.ecc)?);
        self.insert(key.clone(), m.clone());
        Ok(m)
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn insert(&mut self, key: BaseMatrixKey, m: Arc<BaseMatrix>) {
        self.entries.insert(key.clone(), m);
        self.touch(&key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
                self.stats.evictions = self.stats.evictions.saturating_add(1);
            }
        }
    }

    fn touch(&mut self, key: &BaseMatrixKey) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/matrix/cache.rs"]
mod tests;
