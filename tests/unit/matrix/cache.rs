use super::*;
use crate::foundation::error::QrError;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct CountingEncoder {
    calls: AtomicUsize,
}

impl MatrixEncoder for CountingEncoder {
    fn encode_matrix(
        &self,
        content: &str,
        size: u32,
        margin: u32,
        _ecc: EccLevel,
    ) -> QrResult<BaseMatrix> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if content == "too-long" {
            return Err(QrError::encoding("too long"));
        }
        BaseMatrix::from_symbol(&[true], 1, size, margin)
    }
}

fn key(content: &str) -> BaseMatrixKey {
    BaseMatrixKey {
        content: content.to_string(),
        size: 64,
        margin: 1,
        ecc: EccLevel::Medium,
    }
}

#[test]
fn hit_does_not_touch_encoder() {
    let enc = CountingEncoder::default();
    let mut cache = RenderCache::new(4);

    let a = cache.get_or_encode(&key("a"), &enc).unwrap();
    let b = cache.get_or_encode(&key("a"), &enc).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(enc.calls.load(Ordering::SeqCst), 1);

    let st = cache.stats();
    assert_eq!(st.hits, 1);
    assert_eq!(st.misses, 1);
    assert_eq!(st.encoder_calls, 1);
    assert_eq!(st.entries, 1);
}

#[test]
fn failures_surface_and_are_not_cached() {
    let enc = CountingEncoder::default();
    let mut cache = RenderCache::new(4);

    assert!(matches!(
        cache.get_or_encode(&key("too-long"), &enc),
        Err(QrError::Encoding(_))
    ));
    assert!(cache.get_or_encode(&key("too-long"), &enc).is_err());
    assert_eq!(enc.calls.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

#[test]
fn least_recently_used_entry_is_evicted() {
    let enc = CountingEncoder::default();
    let mut cache = RenderCache::new(2);

    cache.get_or_encode(&key("a"), &enc).unwrap();
    cache.get_or_encode(&key("b"), &enc).unwrap();
    // Refresh "a" so "b" becomes the eviction candidate.
    cache.get_or_encode(&key("a"), &enc).unwrap();
    cache.get_or_encode(&key("c"), &enc).unwrap();

    assert!(cache.contains(&key("a")));
    assert!(!cache.contains(&key("b")));
    assert!(cache.contains(&key("c")));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn clear_drops_entries_but_keeps_counters() {
    let enc = CountingEncoder::default();
    let mut cache = RenderCache::new(2);
    cache.get_or_encode(&key("a"), &enc).unwrap();
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 1);

    cache.get_or_encode(&key("a"), &enc).unwrap();
    assert_eq!(enc.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn zero_capacity_is_clamped() {
    assert_eq!(RenderCache::new(0).capacity(), 1);
}
