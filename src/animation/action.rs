use std::sync::Arc;

use crate::animation::binding::{PropertyBinding, PropertyValue};
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
    PingPong,
}

/// Linear ramp of a multiplier over a window of mixer time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ramp {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Ramp {
    fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advances the ramp and returns the multiplier at the new position.
    fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt.abs();
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Playback state of one clip inside an [`AnimationMixer`](crate::animation::AnimationMixer).
///
/// An action is *scheduled* between [`play`](Self::play) and
/// [`stop`](Self::stop). A scheduled action contributes its pose with its
/// effective weight, even while paused; it is *running* only when it is
/// also enabled, not paused and has a non-zero time scale.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    /// Local playback time in seconds
    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// With [`LoopMode::Once`]: pause on the last frame instead of
    /// disabling the action when the clip ends
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    scheduled: bool,
    fade: Option<Ramp>,
    warp: Option<Ramp>,
    effective_weight: f32,
    effective_time_scale: f32,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            scheduled: false,
            fade: None,
            warp: None,
            effective_weight: 0.0,
            effective_time_scale: 0.0,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Schedules the action in its mixer.
    pub fn play(&mut self) -> &mut Self {
        self.scheduled = true;
        self
    }

    /// Unschedules the action and resets it.
    pub fn stop(&mut self) -> &mut Self {
        self.scheduled = false;
        self.reset()
    }

    /// Rewinds to time 0, clears pause, fades and warps, re-enables.
    pub fn reset(&mut self) -> &mut Self {
        self.paused = false;
        self.enabled = true;
        self.time = 0.0;
        self.fade = None;
        self.warp = None;
        self.track_cursors.fill(KeyframeCursor::default());
        self
    }

    /// Ramps the weight multiplier from 0 to 1 over `duration` seconds.
    /// A zero duration takes full effect on the next mixer update.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Ramp::new(0.0, 1.0, duration));
        self
    }

    /// Ramps the weight multiplier from 1 to 0 over `duration` seconds; the
    /// action disables itself when the ramp ends.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Ramp::new(1.0, 0.0, duration));
        self
    }

    /// Changes the time scale from `start` to `end` over `duration` seconds.
    pub fn warp(&mut self, start: f32, end: f32, duration: f32) -> &mut Self {
        let base = self.time_scale;
        let (from, to) = if base == 0.0 {
            (0.0, 0.0)
        } else {
            (start / base, end / base)
        };
        self.warp = Some(Ramp::new(from, to, duration));
        self
    }

    /// Decelerates to a stop over `duration` seconds, then pauses.
    /// `halt(0.0)` pauses on the next mixer update without advancing time.
    pub fn halt(&mut self, duration: f32) -> &mut Self {
        let current = if self.scheduled && self.effective_time_scale != 0.0 {
            self.effective_time_scale
        } else {
            self.time_scale
        };
        self.warp(current, 0.0, duration)
    }

    // ========================================================================
    // State queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Scheduled, enabled, not paused and with a non-zero time scale.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduled && self.enabled && !self.paused && self.time_scale != 0.0
    }

    /// Weight used in the last mixer update (weight times fade).
    #[inline]
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        self.effective_weight
    }

    /// Time scale used in the last mixer update (time scale times warp).
    #[inline]
    #[must_use]
    pub fn effective_time_scale(&self) -> f32 {
        self.effective_time_scale
    }

    // ========================================================================
    // Per-frame
    // ========================================================================

    /// Advances fades, warps and local time by `dt` mixer seconds.
    pub(crate) fn advance(&mut self, dt: f32) {
        self.update_weight(dt);
        let time_scale = self.update_time_scale(dt);
        if self.enabled && time_scale != 0.0 {
            self.update(dt * time_scale);
        }
    }

    fn update_weight(&mut self, dt: f32) {
        let mut weight = 0.0;
        if self.enabled {
            weight = self.weight;
            if let Some(fade) = &mut self.fade {
                let multiplier = fade.advance(dt);
                weight *= multiplier;
                if fade.finished() {
                    self.fade = None;
                    if multiplier == 0.0 {
                        self.enabled = false;
                    }
                }
            }
        }
        self.effective_weight = weight;
    }

    fn update_time_scale(&mut self, dt: f32) -> f32 {
        let mut time_scale = 0.0;
        if !self.paused {
            time_scale = self.time_scale;
            if let Some(warp) = &mut self.warp {
                time_scale *= warp.advance(dt);
                if warp.finished() {
                    self.warp = None;
                    if time_scale == 0.0 {
                        self.paused = true;
                    } else {
                        self.time_scale = time_scale;
                    }
                }
            }
        }
        self.effective_time_scale = time_scale;
        time_scale
    }

    /// Advances local time by `dt` (already scaled) and applies the loop mode.
    pub fn update(&mut self, dt: f32) {
        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt;

        match self.loop_mode {
            LoopMode::Once => {
                let finished = self.time >= duration || self.time < 0.0;
                if finished {
                    self.time = self.time.clamp(0.0, duration);
                    if self.clamp_when_finished {
                        self.paused = true;
                    } else {
                        self.enabled = false;
                    }
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let t = self.time.rem_euclid(double_duration);
                self.time = if t > duration { double_duration - t } else { t };
            }
        }
    }

    /// Samples every bound track at the current time.
    pub(crate) fn sample_bindings(&mut self, mut apply: impl FnMut(&PropertyBinding, PropertyValue)) {
        let clip = &self.clip;
        for binding in &self.bindings {
            let (Some(track), Some(cursor)) = (
                clip.tracks.get(binding.track_index),
                self.track_cursors.get_mut(binding.track_index),
            ) else {
                continue;
            };
            let value = match &track.data {
                TrackData::Vector3(t) => t
                    .sample_with_cursor(self.time, cursor)
                    .map(PropertyValue::Vector3),
                TrackData::Quaternion(t) => t
                    .sample_with_cursor(self.time, cursor)
                    .map(PropertyValue::Quaternion),
            };
            if let Some(value) = value {
                apply(binding, value);
            }
        }
    }
}
