//! Asset loading.
//!
//! - [`Prefab`]: load result, shared through the cache
//! - [`GltfLoader`]: glTF 2.0 / GLB parser
//! - [`AssetCache`]: process-wide, load-once prefab cache

pub mod cache;
pub mod loaders;
pub mod prefab;

use std::path::Path;

use crate::errors::Result;

pub use cache::AssetCache;
pub use loaders::GltfLoader;
pub use prefab::{Prefab, PrefabMesh, PrefabNode, SharedPrefab};

/// Source of prefabs for the [`AssetCache`].
pub trait PrefabLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Prefab>;
}
