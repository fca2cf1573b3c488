#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod avatar;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use app::{FrameState, Input};
pub use assets::{AssetCache, GltfLoader, Prefab, PrefabLoader};
pub use avatar::{Avatar, AvatarAssets, AvatarConfig, AvatarControls};
pub use errors::{AvatarError, Result};
pub use resources::{Material, Mesh, Side};
pub use scene::{MaterialKey, Node, NodeHandle, Scene, Transform};
pub use utils::{Changed, Timer};
