// Copyright (c) 2024 Mike Tsao

//! Wall-clock time as seen by the scheduler.

use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of time.
/// The host reports elapsed frame time in this unit, and all configured delays
/// use it.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }

    /// Returns the larger of the two.
    pub fn max(self, other: Seconds) -> Seconds {
        Seconds(self.0.max(other.0))
    }

    /// Adds a duration.
    pub fn plus(self, other: Seconds) -> Seconds {
        Seconds(self.0 + other.0)
    }

    /// Whether this instant has been reached at time `now`.
    pub fn is_due(&self, now: Seconds) -> bool {
        self.0 <= now.0
    }
}
