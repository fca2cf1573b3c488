//! Keyframe animation.
//!
//! Clips hold tracks keyed by node name; a [`Binder`] resolves them against
//! a scene subtree; an [`AnimationMixer`] owns one [`AnimationAction`] per
//! clip and writes the blended pose into the scene every update.

pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{AnimationAction, LoopMode};
pub use binder::Binder;
pub use binding::{PropertyBinding, PropertyValue, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{ActionHandle, AnimationMixer};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;
