// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};

/// A single anchor point of an RTPC curve: the parameter should have `value` at
/// `time`. Times are in the curve file's own units; the interpolator produces
/// 100 samples per unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Keyframe {
    /// When the curve reaches the value.
    pub time: f64,
    /// The value of the parameter at that time.
    pub value: f64,
}
impl Keyframe {
    #[allow(missing_docs)]
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}
impl From<(f64, f64)> for Keyframe {
    fn from((time, value): (f64, f64)) -> Self {
        Self { time, value }
    }
}
