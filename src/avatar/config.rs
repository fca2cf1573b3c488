use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Canonical clip names.
pub const TYPING: &str = "Typing";
pub const STANDING: &str = "Standing";
pub const FALLING: &str = "Falling";

/// Debug toggles, normally driven by an on-screen control panel.
///
/// All flags default to `false` and take effect on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarControls {
    /// Orient the head bone toward the camera
    pub head_follow: bool,
    /// Orient the upper spine toward the pointer
    pub cursor_follow: bool,
    /// Render every avatar material as wireframe
    pub wireframe: bool,
}

impl AvatarControls {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// An animation-only asset and the name its first clip is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSource {
    pub path: String,
    pub name: String,
}

impl ClipSource {
    #[must_use]
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

/// Avatar configuration. Missing JSON fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Model (mesh + skeleton) asset path
    pub model: String,
    pub clips: Vec<ClipSource>,
    /// Bone oriented toward the camera when `head_follow` is on
    pub head_bone: String,
    /// Bone oriented toward the pointer when `cursor_follow` is on
    pub spine_bone: String,
    /// Depth (world z) of the pointer target
    pub cursor_depth: f32,
    /// Blend window when switching clips, in seconds. 0 is a hard cut.
    pub fade_duration: f32,
    pub controls: AvatarControls,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            model: "models/maharaja_avatar.glb".to_string(),
            clips: vec![
                ClipSource::new("animations/Typing.glb", TYPING),
                ClipSource::new("animations/Standing Idle.glb", STANDING),
                ClipSource::new("animations/Falling Idle.glb", FALLING),
            ],
            head_bone: "Head".to_string(),
            spine_bone: "Spine2".to_string(),
            cursor_depth: 1.0,
            fade_duration: 0.0,
            controls: AvatarControls::default(),
        }
    }
}

impl AvatarConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Every asset path the avatar needs: the model first, then the clips.
    pub fn asset_paths(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.model.as_str()).chain(self.clips.iter().map(|c| c.path.as_str()))
    }
}
