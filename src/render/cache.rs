use std::num::NonZeroUsize;

use lru::LruCache;

use crate::backend::RgbaFrame;
use crate::session::SessionId;

const DEFAULT_MEMORY_BUDGET_BYTES: usize = 256 * 1024 * 1024;
const DEFAULT_MAX_ENTRIES: usize = 32;

/// Pages are 1-based; scale is stored in thousandths so keys hash exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageFrameKey {
    pub session_id: SessionId,
    pub page: usize,
    pub scale_milli: u32,
}

impl PageFrameKey {
    pub fn new(session_id: SessionId, page: usize, scale: f32) -> Self {
        let scale_milli = (scale.max(0.0) * 1000.0).round() as u32;
        Self {
            session_id,
            page,
            scale_milli,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Rendered full-size pages, bounded by entry count and pixel memory.
#[derive(Debug)]
pub struct PageFrameCache {
    memory_budget_bytes: usize,
    memory_bytes: usize,
    entries: LruCache<PageFrameKey, RgbaFrame>,
    counters: CacheCounters,
}

impl Default for PageFrameCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MEMORY_BUDGET_BYTES)
    }
}

impl PageFrameCache {
    pub fn new(max_entries: usize, memory_budget_bytes: usize) -> Self {
        let max_entries = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory_budget_bytes: memory_budget_bytes.max(1),
            memory_bytes: 0,
            entries: LruCache::new(max_entries),
            counters: CacheCounters::default(),
        }
    }

    pub fn get(&mut self, key: &PageFrameKey) -> Option<RgbaFrame> {
        match self.entries.get(key) {
            Some(frame) => {
                self.counters.hits += 1;
                Some(frame.clone())
            }
            None => {
                self.counters.misses += 1;
                None
            }
        }
    }

    /// A frame larger than the whole budget is kept alone so the page that
    /// is on screen can still be revisited.
    pub fn insert(&mut self, key: PageFrameKey, frame: RgbaFrame) {
        if let Some(previous) = self.entries.pop(&key) {
            self.memory_bytes = self.memory_bytes.saturating_sub(previous.byte_len());
        }

        let frame_bytes = frame.byte_len();
        if frame_bytes > self.memory_budget_bytes {
            self.counters.evictions += self.entries.len() as u64;
            self.entries.clear();
            self.memory_bytes = 0;
        }

        self.memory_bytes += frame_bytes;
        if let Some((_evicted_key, evicted)) = self.entries.push(key, frame) {
            self.memory_bytes = self.memory_bytes.saturating_sub(evicted.byte_len());
            self.counters.evictions += 1;
        }

        while self.memory_bytes > self.memory_budget_bytes && self.entries.len() > 1 {
            let Some((_key, evicted)) = self.entries.pop_lru() else {
                break;
            };
            self.memory_bytes = self.memory_bytes.saturating_sub(evicted.byte_len());
            self.counters.evictions += 1;
        }
    }

    pub fn contains(&self, key: &PageFrameKey) -> bool {
        self.entries.contains(key)
    }

    /// Drops every frame that belongs to a session other than `keep`.
    pub fn retain_session(&mut self, keep: SessionId) {
        let doomed: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(key, _)| (key.session_id != keep).then_some(*key))
            .collect();

        for key in doomed {
            if let Some(frame) = self.entries.pop(&key) {
                self.memory_bytes = self.memory_bytes.saturating_sub(frame.byte_len());
                self.counters.evictions += 1;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.memory_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn memory_bytes(&self) -> usize {
        self.memory_bytes
    }

    pub fn counters(&self) -> CacheCounters {
        self.counters
    }
}
