// Copyright (c) 2024 Mike Tsao

use super::{CurveInterpolator, CurveParser, Keyframe};
use crate::{error::Diagnostic, types::ParameterName};
use serde::{Deserialize, Serialize};

/// Binds a curve file (or URL) to the parameter it drives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CurveSource {
    /// The RTPC that the curve drives.
    pub parameter: ParameterName,
    /// A file name relative to the curve directory, or an `http(s)://` URL.
    pub source: String,
}
impl CurveSource {
    #[allow(missing_docs)]
    pub fn new_with(parameter: &str, source: &str) -> Self {
        Self {
            parameter: ParameterName(parameter.to_string()),
            source: source.to_string(),
        }
    }
}

/// The runtime state of one [CurveSource]: its most recently loaded
/// keyframes, their interpolated samples, and the value a player last pushed.
///
/// Keyframes and samples are replaced wholesale by each load. The current
/// value is written only by a playing curve.
#[derive(Clone, Debug, Default)]
pub struct CurveConfig {
    source: CurveSource,
    keyframes: Vec<Keyframe>,
    samples: Vec<f64>,
    current_value: Option<f64>,
}
impl CurveConfig {
    #[allow(missing_docs)]
    pub fn new_with(source: CurveSource) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    #[allow(missing_docs)]
    pub fn source(&self) -> &CurveSource {
        &self.source
    }

    #[allow(missing_docs)]
    pub fn parameter(&self) -> &ParameterName {
        &self.source.parameter
    }

    /// The keyframes from the last load, in ascending time order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The interpolated samples from the last load.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The value most recently pushed by a player, if any.
    pub fn current_value(&self) -> Option<f64> {
        self.current_value
    }

    pub(crate) fn set_current_value(&mut self, value: f64) {
        self.current_value = Some(value);
    }

    /// Discards the keyframes and samples. Called at the start of every load,
    /// so a failed load leaves the curve empty rather than stale.
    pub fn clear(&mut self) {
        self.keyframes.clear();
        self.samples.clear();
    }

    /// Replaces the keyframes with those parsed from `text` and recomputes the
    /// samples. Keyframes are stably sorted by time first, so a file with
    /// out-of-order lines still produces a sensible curve.
    pub fn load_text(
        &mut self,
        text: &str,
        parser: &CurveParser,
        interpolator: &CurveInterpolator,
    ) -> Vec<Diagnostic> {
        self.clear();
        let parsed = parser.parse(text);
        self.keyframes = parsed.keyframes;
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.samples = interpolator.interpolate(&self.keyframes);
        parsed.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_replaces_previous_data() {
        let parser = CurveParser::default();
        let interpolator = CurveInterpolator::default();
        let mut c = CurveConfig::new_with(CurveSource::new_with("Wind", "wind.csv"));

        c.load_text("0_1\n1_2", &parser, &interpolator);
        assert_eq!(c.keyframes().len(), 2);
        assert_eq!(c.samples().len(), 101);

        let diagnostics = c.load_text("0_1\nbad\n0.5_1", &parser, &interpolator);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(c.keyframes().len(), 2);
        assert_eq!(c.samples().len(), 51, "a reload shouldn't append");
    }

    #[test]
    fn reload_is_idempotent() {
        let parser = CurveParser::default();
        let interpolator = CurveInterpolator::default();
        let text = "0_-1\n0.25_0.5\n0.75_0\n1_-0.5\n";
        let mut c = CurveConfig::new_with(CurveSource::new_with("Pitch", "pitch.csv"));

        c.load_text(text, &parser, &interpolator);
        let first = c.samples().to_vec();
        c.load_text(text, &parser, &interpolator);
        assert_eq!(c.samples(), first.as_slice());
    }

    #[test]
    fn out_of_order_keyframes_are_sorted() {
        let mut c = CurveConfig::default();
        c.load_text(
            "1_2\n0_1",
            &CurveParser::default(),
            &CurveInterpolator::default(),
        );
        assert_eq!(c.keyframes(), &[Keyframe::new(0.0, 1.0), Keyframe::new(1.0, 2.0)]);
        assert_eq!(c.samples().first(), Some(&1.0));
        assert_eq!(c.samples().last(), Some(&2.0));
    }

    #[test]
    fn unbounded_times_load_without_panicking() {
        let parser = CurveParser::default();
        let interpolator = CurveInterpolator::default();
        let mut c = CurveConfig::default();

        let diagnostics = c.load_text("0_1\ninf_2\n", &parser, &interpolator);
        assert!(diagnostics.is_empty());
        assert_eq!(c.keyframes().len(), 2);
        assert_eq!(c.samples(), &[1.0]);

        c.load_text("0_1\n1e300_2\n", &parser, &interpolator);
        assert_eq!(
            c.samples().len(),
            CurveInterpolator::MAX_STEPS_PER_SEGMENT + 1
        );
    }

    #[test]
    fn clear_keeps_current_value() {
        let mut c = CurveConfig::default();
        c.set_current_value(0.75);
        c.clear();
        assert_eq!(c.current_value(), Some(0.75));
        assert!(c.samples().is_empty());
    }
}
