use glam::{Quat, Vec3};

use crate::app::FrameState;
use crate::avatar::config::AvatarControls;
use crate::scene::{NodeHandle, Scene};

/// Per-frame orientation overrides applied after the animation pose.
#[derive(Debug, Clone)]
pub struct OrientationController {
    root: NodeHandle,
    head: Option<NodeHandle>,
    spine: Option<NodeHandle>,
    cursor_depth: f32,
}

impl OrientationController {
    /// Resolves the tracked bones below `root` by name. Missing bones
    /// disable the matching behavior.
    pub fn new(
        scene: &Scene,
        root: NodeHandle,
        head_bone: &str,
        spine_bone: &str,
        cursor_depth: f32,
    ) -> Self {
        let head = scene.find_node_by_name(root, head_bone);
        let spine = scene.find_node_by_name(root, spine_bone);
        if head.is_none() {
            log::debug!("Avatar has no '{head_bone}' bone; head follow disabled");
        }
        if spine.is_none() {
            log::debug!("Avatar has no '{spine_bone}' bone; cursor follow disabled");
        }

        Self {
            root,
            head,
            spine,
            cursor_depth,
        }
    }

    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<NodeHandle> {
        self.head
    }

    #[inline]
    #[must_use]
    pub fn spine(&self) -> Option<NodeHandle> {
        self.spine
    }

    /// World-space point the spine turns toward for a pointer position.
    #[must_use]
    pub fn cursor_target(&self, frame: &FrameState) -> Vec3 {
        Vec3::new(frame.pointer.x, frame.pointer.y, self.cursor_depth)
    }

    /// Forward lock, then head and cursor tracking as enabled by `controls`.
    pub fn apply(&self, scene: &mut Scene, controls: &AvatarControls, frame: &FrameState) {
        self.lock_forward(scene);

        if controls.head_follow
            && let Some(head) = self.head
        {
            scene.look_at(head, frame.camera_position);
        }

        if controls.cursor_follow
            && let Some(spine) = self.spine
        {
            scene.look_at(spine, self.cursor_target(frame));
        }
    }

    /// Zeroes the root rotation so clips cannot turn the whole avatar.
    pub fn lock_forward(&self, scene: &mut Scene) {
        if let Some(node) = scene.get_node_mut(self.root) {
            node.transform.rotation = Quat::IDENTITY;
        }
    }
}
