use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

#[derive(Debug, Clone)]
pub struct TrackMeta {
    /// Name of the node the track animates
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }
}

/// A track: metadata plus keyframe data.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// A named, time-parameterized set of node property tracks.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    /// Last keyframe time over all tracks
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name,
            duration,
            tracks,
        }
    }

    /// Copy of this clip under another name. Track data is cloned.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: self.duration,
            tracks: self.tracks.clone(),
        }
    }
}
