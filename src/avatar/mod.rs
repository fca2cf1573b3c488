//! The animated avatar component.
//!
//! An [`Avatar`] instantiates a rigged model into a [`Scene`], drives one
//! animation clip at a time through an [`AnimationMixer`], and applies
//! per-frame orientation overrides (forward lock, head and cursor follow).
//!
//! Hosts feed it three things:
//! - the requested clip name through [`Avatar::set_animation`]
//! - debug toggles through [`Avatar::set_controls`]
//! - one [`FrameState`] per rendered frame through [`Avatar::update`]
//!
//! Name and toggle changes are detected, so re-sending the same value every
//! frame is cheap.

pub mod animator;
pub mod assets;
pub mod config;
pub mod orientation;
pub mod wireframe;

pub use animator::AnimationController;
pub use assets::AvatarAssets;
pub use config::{AvatarConfig, AvatarControls, ClipSource, FALLING, STANDING, TYPING};
pub use orientation::OrientationController;
pub use wireframe::WireframeToggle;

use crate::animation::AnimationMixer;
use crate::app::FrameState;
use crate::assets::AssetCache;
use crate::errors::Result;
use crate::scene::{MaterialKey, Node, NodeHandle, PrefabInstance, Scene};
use crate::utils::Changed;

/// Name given to the group node that holds the avatar.
pub const AVATAR_ROOT_NAME: &str = "Avatar";

#[derive(Debug)]
pub struct Avatar {
    root: NodeHandle,
    instance: PrefabInstance,
    animator: AnimationController,
    orientation: OrientationController,
    wireframe: WireframeToggle,
    controls: AvatarControls,
    requested: Changed<Option<String>>,
}

impl Avatar {
    /// Loads the avatar's assets through `cache` and mounts it.
    pub fn load(scene: &mut Scene, cache: &AssetCache, config: &AvatarConfig) -> Result<Self> {
        let assets = AvatarAssets::load(cache, config)?;
        Ok(Self::mount(scene, &assets, config))
    }

    /// Instantiates the model under a new root group and prepares every
    /// clip. No clip plays until [`set_animation`](Self::set_animation).
    pub fn mount(scene: &mut Scene, assets: &AvatarAssets, config: &AvatarConfig) -> Self {
        let root = scene.add_node(Node::new());
        scene.set_name(root, AVATAR_ROOT_NAME);

        let instance = scene.instantiate(&assets.model, root);

        let mut animator =
            AnimationController::new(root, &assets.clips, scene, config.fade_duration);
        animator.warm_up();

        let orientation = OrientationController::new(
            scene,
            root,
            &config.head_bone,
            &config.spine_bone,
            config.cursor_depth,
        );

        let mut avatar = Self {
            root,
            wireframe: WireframeToggle::new(instance.materials.clone()),
            instance,
            animator,
            orientation,
            controls: AvatarControls::default(),
            requested: Changed::new(),
        };
        avatar.set_controls(scene, config.controls);

        log::info!(
            "Mounted avatar: {} nodes, {} materials, {} clips",
            avatar.instance.nodes.len(),
            avatar.instance.materials.len(),
            avatar.animator.mixer().len()
        );
        avatar
    }

    /// Removes every node and material the avatar created.
    pub fn unmount(self, scene: &mut Scene) {
        scene.remove_node(self.root);
        for &key in &self.instance.materials {
            scene.remove_material(key);
        }
        log::info!("Unmounted avatar");
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Requests the clip called `name`.
    ///
    /// Only a change of the requested value does anything. `None` and the
    /// empty string are recorded but leave playback as it is; an unknown
    /// name stops every clip and the figure holds its pose.
    pub fn set_animation(&mut self, name: Option<&str>) {
        if !self.requested.update(name.map(str::to_string)) {
            return;
        }
        match name {
            Some(name) if !name.is_empty() => {
                self.animator.switch_to(name);
            }
            _ => log::debug!("Animation request cleared"),
        }
    }

    /// Replaces the debug toggles. A wireframe change is applied to the
    /// materials immediately; follow flags apply from the next update.
    pub fn set_controls(&mut self, scene: &mut Scene, controls: AvatarControls) {
        self.controls = controls;
        self.wireframe.sync(scene, controls.wireframe);
    }

    /// Per-frame hook: advances the mixer by `frame.delta`, then applies the
    /// forward lock and the enabled follow behaviors.
    pub fn update(&mut self, scene: &mut Scene, frame: &FrameState) {
        self.animator.advance(frame.delta, scene);
        self.orientation.apply(scene, &self.controls, frame);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The group node holding the instantiated model.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn instance(&self) -> &PrefabInstance {
        &self.instance
    }

    #[must_use]
    pub fn materials(&self) -> &[MaterialKey] {
        &self.instance.materials
    }

    #[inline]
    #[must_use]
    pub fn controls(&self) -> AvatarControls {
        self.controls
    }

    /// The last requested clip name.
    #[must_use]
    pub fn requested_animation(&self) -> Option<&str> {
        self.requested.get().and_then(|n| n.as_deref())
    }

    /// The clip started by the last successful switch.
    #[must_use]
    pub fn active_clip(&self) -> Option<&str> {
        self.animator.active_clip()
    }

    #[must_use]
    pub fn animator(&self) -> &AnimationController {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut AnimationController {
        &mut self.animator
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        self.animator.mixer()
    }

    #[must_use]
    pub fn orientation(&self) -> &OrientationController {
        &self.orientation
    }
}
