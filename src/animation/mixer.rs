use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::binding::{PropertyValue, TargetPath};
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionHandle;
}

const FULL_WEIGHT_EPSILON: f32 = 1e-4;

/// Weighted sum of every contribution to one node property in a frame.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    rest: PropertyValue,
    value: Option<PropertyValue>,
    weight: f32,
}

impl Accumulator {
    fn new(rest: PropertyValue) -> Self {
        Self {
            rest,
            value: None,
            weight: 0.0,
        }
    }

    fn add(&mut self, sample: PropertyValue, weight: f32) {
        let total = self.weight + weight;
        self.value = match (self.value, sample) {
            (None, sample) => Some(sample),
            (Some(PropertyValue::Vector3(acc)), PropertyValue::Vector3(v)) => {
                Some(PropertyValue::Vector3(acc.lerp(v, weight / total)))
            }
            (Some(PropertyValue::Quaternion(acc)), PropertyValue::Quaternion(q)) => {
                Some(PropertyValue::Quaternion(acc.slerp(q, weight / total)))
            }
            (existing, _) => existing,
        };
        self.weight = total;
    }

    /// Final value; below full weight the remainder comes from the rest pose.
    fn resolve(&self) -> Option<PropertyValue> {
        let value = self.value?;
        if self.weight >= 1.0 - FULL_WEIGHT_EPSILON {
            return Some(value);
        }
        Some(match (self.rest, value) {
            (PropertyValue::Vector3(rest), PropertyValue::Vector3(v)) => {
                PropertyValue::Vector3(rest.lerp(v, self.weight))
            }
            (PropertyValue::Quaternion(rest), PropertyValue::Quaternion(q)) => {
                PropertyValue::Quaternion(rest.slerp(q, self.weight))
            }
            (_, value) => value,
        })
    }
}

/// Plays clips on the subtree of one root node.
///
/// Owns one [`AnimationAction`] per clip name and a clock that advances by
/// exactly the delta passed to each [`update`](Self::update) (times
/// [`time_scale`](Self::time_scale)).
#[derive(Debug)]
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionHandle, AnimationAction>,
    by_name: FxHashMap<String, ActionHandle>,
    time: f32,
    pub time_scale: f32,

    accumulators: FxHashMap<(NodeHandle, TargetPath), Accumulator>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
            by_name: FxHashMap::default(),
            time: 0.0,
            time_scale: 1.0,
            accumulators: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Total mixer time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Returns the action for `clip`, creating and binding it on first use.
    /// Actions are keyed by clip name.
    pub fn clip_action(&mut self, clip: Arc<AnimationClip>, scene: &Scene) -> ActionHandle {
        if let Some(&handle) = self.by_name.get(&clip.name) {
            return handle;
        }

        let bindings = Binder::bind(scene, self.root, &clip);
        log::debug!(
            "Binding clip '{}' ({} tracks, {} bound, {:.2}s)",
            clip.name,
            clip.tracks.len(),
            bindings.len(),
            clip.duration
        );

        let name = clip.name.clone();
        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;

        let handle = self.actions.insert(action);
        self.by_name.insert(name, handle);
        handle
    }

    #[must_use]
    pub fn existing_action(&self, name: &str) -> Option<ActionHandle> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    #[must_use]
    pub fn action_by_name(&self, name: &str) -> Option<&AnimationAction> {
        self.existing_action(name).and_then(|h| self.actions.get(h))
    }

    pub fn action_by_name_mut(&mut self, name: &str) -> Option<&mut AnimationAction> {
        let handle = self.existing_action(name)?;
        self.actions.get_mut(handle)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionHandle, &AnimationAction)> {
        self.actions.iter()
    }

    pub fn actions_mut(&mut self) -> impl Iterator<Item = (ActionHandle, &mut AnimationAction)> {
        self.actions.iter_mut()
    }

    pub fn running_actions(&self) -> impl Iterator<Item = &AnimationAction> {
        self.actions.values().filter(|a| a.is_running())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn stop_all_action(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Advances the clock and every scheduled action by `dt`, then writes the
    /// blended pose into the scene.
    ///
    /// Properties no scheduled action contributes to are left as they are.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        let dt = dt * self.time_scale;
        self.time += dt;

        self.accumulators.clear();
        let accumulators = &mut self.accumulators;

        for action in self.actions.values_mut() {
            if !action.is_scheduled() {
                continue;
            }
            action.advance(dt);

            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }
            action.sample_bindings(|binding, value| {
                accumulators
                    .entry((binding.node_handle, binding.target))
                    .or_insert_with(|| Accumulator::new(binding.rest))
                    .add(value, weight);
            });
        }

        for (&(node_handle, target), acc) in &self.accumulators {
            let (Some(value), Some(node)) = (acc.resolve(), scene.get_node_mut(node_handle)) else {
                continue;
            };
            let transform = &mut node.transform;
            match (target, value) {
                (TargetPath::Translation, PropertyValue::Vector3(v)) => transform.position = v,
                (TargetPath::Scale, PropertyValue::Vector3(v)) => transform.scale = v,
                (TargetPath::Rotation, PropertyValue::Quaternion(q)) => transform.rotation = q,
                _ => {}
            }
        }
    }
}

