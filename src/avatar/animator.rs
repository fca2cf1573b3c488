use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::{ActionHandle, AnimationMixer};
use crate::scene::{NodeHandle, Scene};

/// Keeps exactly one clip running on the avatar's mixer.
#[derive(Debug)]
pub struct AnimationController {
    mixer: AnimationMixer,
    handles: Vec<ActionHandle>,
    current: Option<ActionHandle>,
    fade_duration: f32,
    warmed_up: bool,
}

impl AnimationController {
    /// Creates one action per clip, bound to the subtree of `root`.
    pub fn new(
        root: NodeHandle,
        clips: &[Arc<AnimationClip>],
        scene: &Scene,
        fade_duration: f32,
    ) -> Self {
        let mut mixer = AnimationMixer::new(root);
        let handles = clips
            .iter()
            .map(|clip| mixer.clip_action(Arc::clone(clip), scene))
            .collect();

        Self {
            mixer,
            handles,
            current: None,
            fade_duration: fade_duration.max(0.0),
            warmed_up: false,
        }
    }

    /// Plays every action and halts it immediately, so all bindings and
    /// cursors exist before the first switch. Runs once.
    pub fn warm_up(&mut self) {
        if self.warmed_up {
            return;
        }
        for &handle in &self.handles {
            if let Some(action) = self.mixer.action_mut(handle) {
                action.play().halt(0.0);
            }
        }
        self.warmed_up = true;
        log::debug!("Warmed up {} animation actions", self.handles.len());
    }

    #[must_use]
    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }

    /// Makes `name` the only playing clip.
    ///
    /// Returns `false` when no clip has that name; every clip is stopped
    /// anyway and the pose holds.
    pub fn switch_to(&mut self, name: &str) -> bool {
        let target = self.mixer.existing_action(name);

        if self.fade_duration > 0.0 {
            let fade = self.fade_duration;
            for (handle, action) in self.mixer.actions_mut() {
                if Some(handle) == target {
                    continue;
                }
                if action.is_running() {
                    action.fade_out(fade);
                } else {
                    action.stop();
                }
            }
        } else {
            self.mixer.stop_all_action();
        }

        self.current = target;
        let Some(action) = target.and_then(|h| self.mixer.action_mut(h)) else {
            log::debug!("No animation named '{name}', holding pose");
            return false;
        };
        action.reset().fade_in(self.fade_duration).play();
        log::debug!("Switched animation to '{name}'");
        true
    }

    /// Advances the mixer by one frame.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        self.mixer.update(dt, scene);
    }

    /// Clip started by the last successful switch.
    #[must_use]
    pub fn active_clip(&self) -> Option<&str> {
        self.current
            .and_then(|h| self.mixer.action(h))
            .map(AnimationAction::name)
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut AnimationMixer {
        &mut self.mixer
    }
}
