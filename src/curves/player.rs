// Copyright (c) 2024 Mike Tsao

/// Walks a dense sample sequence one sample per tick.
///
/// The player doesn't look at the clock. Timing comes entirely from the sample
/// density chosen by the [CurveInterpolator](super::CurveInterpolator) and the
/// rate at which the host ticks the scheduler.
#[derive(Clone, Debug, Default)]
pub struct CurvePlayer {
    samples: Vec<f64>,
    cursor: usize,
    current_value: Option<f64>,
}
impl CurvePlayer {
    /// Creates a player positioned before the first sample.
    pub fn new_with(samples: Vec<f64>) -> Self {
        Self {
            samples,
            ..Default::default()
        }
    }

    /// Consumes the next sample and makes it the current value. Returns the
    /// new current value, or [None] if the sequence was already exhausted, in
    /// which case the current value keeps holding the last sample.
    pub fn advance(&mut self) -> Option<f64> {
        let value = *self.samples.get(self.cursor)?;
        self.cursor += 1;
        self.current_value = Some(value);
        Some(value)
    }

    /// The most recently consumed sample, or [None] if nothing has been
    /// consumed yet.
    pub fn current_value(&self) -> Option<f64> {
        self.current_value
    }
}
