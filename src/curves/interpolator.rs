// Copyright (c) 2024 Mike Tsao

use super::Keyframe;
use log::{debug, warn};

/// Which side of zero a value is on. Zero is its own class, so a segment from
/// 0.0 to 1.0 counts as a sign change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sign {
    Negative,
    Zero,
    Positive,
}
impl Sign {
    fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }
}

/// Turns a handful of [Keyframe]s into a dense sequence of samples, one per
/// player tick.
///
/// Each pair of consecutive keyframes is a segment that becomes
/// `ceil(duration * 100) + 1` evenly spaced samples, including both endpoints.
/// Because each segment includes both of its endpoints, the sample at a shared
/// keyframe appears twice.
///
/// A segment whose endpoints have different signs is split at its temporal
/// midpoint. The curve first moves to whichever endpoint value is closer to
/// zero, and then to the other endpoint. This keeps a parameter from sweeping
/// through zero linearly, which is audible for parameters such as pitch or
/// pan.
///
/// A segment with zero, negative or non-finite duration contributes a single
/// sample, its start value. A very long segment is capped at
/// [CurveInterpolator::MAX_STEPS_PER_SEGMENT] steps.
#[derive(Clone, Copy, Debug)]
pub struct CurveInterpolator {
    samples_per_unit: f64,
    is_verbose: bool,
}
impl Default for CurveInterpolator {
    fn default() -> Self {
        Self {
            samples_per_unit: Self::SAMPLES_PER_TIME_UNIT,
            is_verbose: false,
        }
    }
}
impl CurveInterpolator {
    /// Sample density, in samples per unit of keyframe time.
    pub const SAMPLES_PER_TIME_UNIT: f64 = 100.0;

    /// The most steps any one segment is divided into. At the default density
    /// that is a thousand time units.
    pub const MAX_STEPS_PER_SEGMENT: usize = 100_000;

    /// Creates an interpolator with a custom sample density. `is_verbose`
    /// traces every sample at debug level.
    pub fn new_with(samples_per_unit: f64, is_verbose: bool) -> Self {
        Self {
            samples_per_unit,
            is_verbose,
        }
    }

    /// How many steps a segment of the given duration is divided into. A
    /// segment of `n` steps yields `n + 1` samples. Durations that aren't
    /// finite and positive get zero steps.
    pub fn step_count(&self, duration: f64) -> usize {
        let steps = (duration * self.samples_per_unit).ceil();
        if !steps.is_finite() || steps <= 0.0 {
            return 0;
        }
        if steps > Self::MAX_STEPS_PER_SEGMENT as f64 {
            warn!(
                "Curve segment of duration {duration} needs {steps} steps; capping at {}",
                Self::MAX_STEPS_PER_SEGMENT
            );
            return Self::MAX_STEPS_PER_SEGMENT;
        }
        steps as usize
    }

    /// Produces the sample sequence for the keyframes, which should be in
    /// ascending time order. Fewer than two keyframes produce no samples.
    pub fn interpolate(&self, keyframes: &[Keyframe]) -> Vec<f64> {
        let mut samples = Vec::new();
        if self.is_verbose {
            debug!("keyframe count: {}", keyframes.len());
        }
        for pair in keyframes.windows(2) {
            self.interpolate_pair(&pair[0], &pair[1], &mut samples);
        }
        samples
    }

    fn interpolate_pair(&self, start: &Keyframe, end: &Keyframe, samples: &mut Vec<f64>) {
        if self.is_verbose {
            debug!(
                "start time: {}, end time: {}, start value: {}, end value: {}",
                start.time, end.time, start.value, end.value
            );
        }
        if Sign::of(start.value) != Sign::of(end.value) {
            let mid_time = (start.time + end.time) / 2.0;
            let mid_value = if start.value.abs() < end.value.abs() {
                start.value
            } else {
                end.value
            };
            self.interpolate_segment(start.time, mid_time, start.value, mid_value, samples);
            self.interpolate_segment(mid_time, end.time, mid_value, end.value, samples);
        } else {
            self.interpolate_segment(start.time, end.time, start.value, end.value, samples);
        }
    }

    fn interpolate_segment(
        &self,
        start_time: f64,
        end_time: f64,
        start_value: f64,
        end_value: f64,
        samples: &mut Vec<f64>,
    ) {
        let steps = self.step_count(end_time - start_time);
        if steps == 0 {
            samples.push(start_value);
            return;
        }
        samples.extend((0..=steps).map(|j| {
            let t = j as f64 / steps as f64;
            let value = if j == steps {
                end_value
            } else {
                Self::lerp(start_value, end_value, t)
            };
            if self.is_verbose {
                debug!(
                    "Interpolated value at {}: {}",
                    start_time + t * (end_time - start_time),
                    value
                );
            }
            value
        }));
    }

    fn lerp(start: f64, end: f64, t: f64) -> f64 {
        start + t * (end - start)
    }
}
