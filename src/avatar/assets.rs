use std::sync::Arc;

use crate::animation::clip::AnimationClip;
use crate::assets::{AssetCache, SharedPrefab};
use crate::avatar::config::AvatarConfig;
use crate::errors::{AvatarError, Result};

/// The model and the named clips an avatar is built from.
#[derive(Debug, Clone)]
pub struct AvatarAssets {
    pub model: SharedPrefab,
    pub clips: Vec<Arc<AnimationClip>>,
}

impl AvatarAssets {
    #[must_use]
    pub fn from_parts(model: SharedPrefab, clips: Vec<Arc<AnimationClip>>) -> Self {
        Self { model, clips }
    }

    /// Requests every asset of `config` so mounting never waits on I/O.
    pub fn preload(cache: &AssetCache, config: &AvatarConfig) -> Result<()> {
        cache.preload(config.asset_paths())
    }

    /// Fetches the model and clips through `cache`.
    ///
    /// Each clip asset contributes its first animation, registered under the
    /// configured name. The cached clip keeps its original name.
    pub fn load(cache: &AssetCache, config: &AvatarConfig) -> Result<Self> {
        let model = cache.load(&config.model)?;

        let clips = config
            .clips
            .iter()
            .map(|source| {
                let prefab = cache.load(&source.path)?;
                let clip = prefab.animations.first().ok_or_else(|| {
                    AvatarError::MissingAnimation {
                        path: cache.resolve(&source.path),
                    }
                })?;
                Ok(Arc::new(clip.renamed(source.name.as_str())))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { model, clips })
    }
}
