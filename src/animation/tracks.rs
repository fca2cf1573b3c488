use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// How many keyframes a cursor scans locally before falling back to a
/// binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last keyframe interval a track was sampled in, so sequential
/// playback finds the next interval in O(1).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    /// For CubicSpline, length is `times.len() * 3` (in-tangent, value, out-tangent)
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Whether `values` has the length `times` and the interpolation mode require.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let per_key = match self.interpolation {
            InterpolationMode::CubicSpline => 3,
            _ => 1,
        };
        self.values.len() == self.times.len() * per_key
    }

    /// Time of the last keyframe (0 for an empty track).
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Stateless sampling (binary search). `None` for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        if self.times.is_empty() {
            return None;
        }
        let next_idx = self.times.partition_point(|&t| t <= time);
        let index = next_idx.saturating_sub(1);
        Some(self.sample_at_frame(index, time))
    }

    /// Sampling with a cursor; the cursor is updated to the interval found.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let len = self.times.len();
        if len == 0 {
            return None;
        }
        // Static data
        if len == 1 {
            return Some(self.value_at(0).clone());
        }

        let i = cursor.last_index.min(len - 1);
        let t_curr = self.times[i];

        let found = if time >= t_curr {
            // Forward playback: scan right
            let mut res = None;
            for offset in 0..=MAX_SCAN_OFFSET {
                let idx = i + offset;
                if idx >= len - 1 {
                    if time >= self.times[len - 1] {
                        res = Some(len - 1);
                    }
                    break;
                }
                if time < self.times[idx + 1] {
                    res = Some(idx);
                    break;
                }
            }
            res
        } else {
            // Reverse playback or loop wrap: scan left
            (0..=MAX_SCAN_OFFSET.min(i))
                .map(|offset| i - offset)
                .find(|&idx| time >= self.times[idx])
        };

        let index = found.unwrap_or_else(|| {
            // Large jump: binary search
            self.times
                .partition_point(|&t| t <= time)
                .saturating_sub(1)
        });
        cursor.last_index = index;

        Some(self.sample_at_frame(index, time))
    }

    /// Keyframe value; CubicSpline stores it at `index * 3 + 1`.
    fn value_at(&self, index: usize) -> &T {
        match self.interpolation {
            InterpolationMode::CubicSpline => &self.values[index * 3 + 1],
            _ => &self.values[index],
        }
    }

    fn sample_at_frame(&self, index: usize, time: f32) -> T {
        let len = self.times.len();

        if index >= len - 1 {
            return self.value_at(len - 1).clone();
        }

        let next_idx = index + 1;
        let t0 = self.times[index];
        let t1 = self.times[next_idx];
        let dt = t1 - t0;

        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        match self.interpolation {
            InterpolationMode::Step => self.value_at(index).clone(),
            InterpolationMode::Linear => {
                T::interpolate_linear(self.value_at(index), self.value_at(next_idx), t)
            }
            InterpolationMode::CubicSpline => {
                let i_prev = index * 3;
                let i_next = next_idx * 3;
                T::interpolate_cubic(
                    &self.values[i_prev + 1],
                    &self.values[i_prev + 2],
                    &self.values[i_next],
                    &self.values[i_next + 1],
                    t,
                    dt,
                )
            }
        }
    }
}
