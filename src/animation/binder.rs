use crate::animation::binding::{PropertyBinding, PropertyValue, TargetPath};
use crate::animation::clip::{AnimationClip, TrackData};
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node in the subtree of `root_node`
    /// by name. Tracks whose node is missing, or whose data does not match
    /// the target property, are skipped.
    #[must_use]
    pub fn bind(scene: &Scene, root_node: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());
        let mut missing = 0_usize;

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let Some(node_handle) = scene.find_node_by_name(root_node, &track.meta.node_name) else {
                missing += 1;
                continue;
            };
            let Some(node) = scene.get_node(node_handle) else {
                continue;
            };

            let transform = &node.transform;
            let rest = match (&track.data, track.meta.target) {
                (TrackData::Vector3(_), TargetPath::Translation) => {
                    PropertyValue::Vector3(transform.position)
                }
                (TrackData::Vector3(_), TargetPath::Scale) => PropertyValue::Vector3(transform.scale),
                (TrackData::Quaternion(_), TargetPath::Rotation) => {
                    PropertyValue::Quaternion(transform.rotation)
                }
                _ => {
                    log::warn!(
                        "Clip '{}': track {track_index} data does not match target {:?}",
                        clip.name,
                        track.meta.target
                    );
                    continue;
                }
            };

            bindings.push(PropertyBinding {
                track_index,
                node_handle,
                target: track.meta.target,
                rest,
            });
        }

        if missing > 0 {
            log::debug!(
                "Clip '{}': {missing} of {} tracks have no matching node",
                clip.name,
                clip.tracks.len()
            );
        }

        bindings
    }
}
