use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::assets::PrefabLoader;
use crate::assets::loaders::GltfLoader;
use crate::assets::prefab::SharedPrefab;
use crate::errors::Result;

static GLOBAL_CACHE: OnceLock<AssetCache> = OnceLock::new();

/// Process-wide prefab cache.
///
/// Paths are resolved against a root directory and loaded at most once;
/// later requests share the same [`SharedPrefab`]. Failed loads are not
/// cached, so a later request retries.
pub struct AssetCache {
    root: PathBuf,
    loader: Box<dyn PrefabLoader>,
    entries: RwLock<FxHashMap<PathBuf, SharedPrefab>>,
}

impl AssetCache {
    /// A cache reading glTF files below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_loader(root, GltfLoader::new())
    }

    /// A cache using a custom loader.
    #[must_use]
    pub fn with_loader(root: impl Into<PathBuf>, loader: impl PrefabLoader + 'static) -> Self {
        Self {
            root: root.into(),
            loader: Box::new(loader),
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// The process-wide cache. Unless [`install_global`](Self::install_global)
    /// ran first, it reads glTF files relative to the working directory.
    pub fn global() -> &'static AssetCache {
        GLOBAL_CACHE.get_or_init(|| AssetCache::new("."))
    }

    /// Installs `cache` as the process-wide cache.
    ///
    /// Fails (returning the cache back) once the global cache exists.
    pub fn install_global(cache: AssetCache) -> std::result::Result<(), AssetCache> {
        GLOBAL_CACHE.set(cache)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an asset path against the cache root. A leading `/` means
    /// "relative to the root", as on a web server.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Returns the cached prefab for `path`, loading it on first request.
    pub fn load(&self, path: &str) -> Result<SharedPrefab> {
        let full_path = self.resolve(path);

        if let Some(prefab) = self.entries.read().get(&full_path) {
            return Ok(Arc::clone(prefab));
        }

        log::info!("Loading asset {}", full_path.display());
        let prefab = Arc::new(self.loader.load(&full_path)?);

        // Another caller may have finished first; keep whichever landed first.
        let mut entries = self.entries.write();
        let entry = entries.entry(full_path).or_insert(prefab);
        Ok(Arc::clone(entry))
    }

    /// Loads every path now so later `load` calls hit the cache.
    pub fn preload<'a>(&self, paths: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for path in paths {
            self.load(path)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.read().contains_key(&self.resolve(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("root", &self.root)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
