//! An optional FIFO cache over parsed metadata.

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{MetadataError, RawMetadata};

/// A bounded, path-keyed cache of parse results.
///
/// Eviction is FIFO: once `capacity` files are cached, the oldest insertion
/// goes first, regardless of how often it was hit.
///
/// Entries are keyed by path alone - the cache never `stat`s the file, so a
/// file rewritten in place keeps serving its old metadata until evicted or
/// [`MetadataCache::clear`]ed. That staleness is the deal; callers who need
/// freshness should parse directly.
pub struct MetadataCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    map: FxHashMap<PathBuf, Arc<RawMetadata>>,
    order: VecDeque<PathBuf>,
}

impl MetadataCache {
    /// Creates a cache holding up to `capacity` files.
    ///
    /// A capacity of zero disables caching: every lookup parses.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Returns the cached metadata for `path`, parsing (with default
    /// options) on a miss.
    pub fn get_or_parse(&self, path: impl AsRef<Path>) -> Result<Arc<RawMetadata>, MetadataError> {
        let path = path.as_ref();

        if let Some(hit) = self.inner.lock().map.get(path) {
            log::trace!("Cache hit for `{}`.", path.display());
            return Ok(Arc::clone(hit));
        }

        // parse outside the lock; a slow file shouldn't stall other lookups
        let parsed = Arc::new(crate::parse_raw(path)?);

        let mut inner = self.inner.lock();

        // a racing caller may have filled the slot while we parsed
        if let Some(hit) = inner.map.get(path) {
            return Ok(Arc::clone(hit));
        }

        if self.capacity == 0 {
            return Ok(parsed);
        }

        while inner.order.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                log::trace!("Evicting `{}` from the cache.", oldest.display());
                inner.map.remove(&oldest);
            }
        }

        inner.map.insert(path.to_path_buf(), Arc::clone(&parsed));
        inner.order.push_back(path.to_path_buf());

        Ok(parsed)
    }

    /// How many files are currently cached.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.order.clear();
    }
}
