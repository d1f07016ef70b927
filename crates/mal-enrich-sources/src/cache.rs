use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Entity-type partition of the response cache. Volatile kinds are wiped
/// at end-of-run; Letterboxd lookups change rarely and survive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    Show,
    Movie,
    Season,
    Letterboxd,
}

impl CacheKind {
    pub const ALL: [CacheKind; 4] = [
        CacheKind::Show,
        CacheKind::Movie,
        CacheKind::Season,
        CacheKind::Letterboxd,
    ];

    pub fn dir(&self) -> &'static str {
        match self {
            CacheKind::Show => "shows",
            CacheKind::Movie => "movies",
            CacheKind::Season => "seasons",
            CacheKind::Letterboxd => "letterboxd",
        }
    }

    pub fn is_volatile(&self) -> bool {
        !matches!(self, CacheKind::Letterboxd)
    }
}

/// Key-value store for raw upstream response bodies, keyed by
/// `(entity type, entity id)`. Write failures must be non-fatal: the
/// fetcher already holds the value in memory.
pub trait ResponseCache: Send + Sync {
    fn get(&self, kind: CacheKind, id: u64) -> Option<Vec<u8>>;
    fn put(&self, kind: CacheKind, id: u64, body: &[u8]);
}

/// One file per key under `<root>/<kind>/<id>.json`.
pub struct FsCache {
    root: PathBuf,
}

impl FsCache {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for kind in CacheKind::ALL {
            std::fs::create_dir_all(root.join(kind.dir()))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, kind: CacheKind, id: u64) -> PathBuf {
        self.root.join(kind.dir()).join(format!("{id}.json"))
    }

    /// End-of-run teardown: drop show/movie/season responses, keep the
    /// slow-changing Letterboxd lookups for the next run.
    pub fn clear_volatile(&self) -> Result<()> {
        for kind in CacheKind::ALL.into_iter().filter(CacheKind::is_volatile) {
            let dir = self.root.join(kind.dir());
            if dir.exists() {
                std::fs::remove_dir_all(&dir)?;
            }
            std::fs::create_dir_all(&dir)?;
        }
        info!(root = %self.root.display(), "cleared volatile cache entries");
        Ok(())
    }

    pub fn clear_all(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        for kind in CacheKind::ALL {
            std::fs::create_dir_all(self.root.join(kind.dir()))?;
        }
        info!(root = %self.root.display(), "cleared response cache");
        Ok(())
    }
}

impl ResponseCache for FsCache {
    fn get(&self, kind: CacheKind, id: u64) -> Option<Vec<u8>> {
        let path = self.entry_path(kind, id);
        match std::fs::read(&path) {
            Ok(body) => {
                debug!(kind = kind.dir(), id, "cache hit");
                Some(body)
            }
            Err(_) => None,
        }
    }

    fn put(&self, kind: CacheKind, id: u64, body: &[u8]) {
        let path = self.entry_path(kind, id);
        if let Some(parent) = path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(kind = kind.dir(), id, error = %err, "failed to create cache directory");
                return;
            }
        }
        if let Err(err) = std::fs::write(&path, body) {
            warn!(kind = kind.dir(), id, error = %err, "failed to write cache entry");
        }
    }
}

/// In-memory cache with the same semantics as `FsCache`, for tests.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<(CacheKind, u64), Vec<u8>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, kind: CacheKind, id: u64) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(&(kind, id)).cloned()
    }

    fn put(&self, kind: CacheKind, id: u64, body: &[u8]) {
        self.entries.lock().unwrap().insert((kind, id), body.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_cache_round_trips_per_kind() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path()).unwrap();

        cache.put(CacheKind::Show, 7, b"{\"title\":\"x\"}");
        assert_eq!(cache.get(CacheKind::Show, 7).as_deref(), Some(&b"{\"title\":\"x\"}"[..]));
        // Same id, different kind is a different key.
        assert!(cache.get(CacheKind::Movie, 7).is_none());
    }

    #[test]
    fn clear_volatile_preserves_letterboxd() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path()).unwrap();

        cache.put(CacheKind::Show, 1, b"a");
        cache.put(CacheKind::Season, 1, b"b");
        cache.put(CacheKind::Letterboxd, 1, b"c");

        cache.clear_volatile().unwrap();

        assert!(cache.get(CacheKind::Show, 1).is_none());
        assert!(cache.get(CacheKind::Season, 1).is_none());
        assert_eq!(cache.get(CacheKind::Letterboxd, 1).as_deref(), Some(&b"c"[..]));
    }

    #[test]
    fn clear_all_wipes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FsCache::new(dir.path()).unwrap();

        cache.put(CacheKind::Letterboxd, 9, b"keep?");
        cache.clear_all().unwrap();
        assert!(cache.get(CacheKind::Letterboxd, 9).is_none());
    }

    #[test]
    fn memory_cache_matches_fs_semantics() {
        let cache = MemoryCache::new();
        assert!(cache.get(CacheKind::Show, 1).is_none());

        cache.put(CacheKind::Show, 1, b"v1");
        cache.put(CacheKind::Show, 1, b"v2");
        assert_eq!(cache.get(CacheKind::Show, 1).as_deref(), Some(&b"v2"[..]));
        assert_eq!(cache.len(), 1);
    }
}
