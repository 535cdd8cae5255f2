// Copyright (c) 2024 Mike Tsao

use core::fmt;
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// The name of an event defined in the audio engine's project, such as
/// `"Play_Impact"`.
#[derive(Synonym, Serialize, Deserialize)]
pub struct AudioEventName(pub String);

/// The name of a real-time parameter control (RTPC) defined in the audio
/// engine's project, such as `"Engine_RPM"`. Parameters are global rather than
/// per-entity.
#[derive(Synonym, Serialize, Deserialize)]
pub struct ParameterName(pub String);

/// A bitmask of physics layers. An overlap query only reports colliders whose
/// layer bit is set in the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);
impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}
impl fmt::Display for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
#[allow(missing_docs)]
impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// A mask containing only the given layer (0..32).
    pub const fn layer(index: u8) -> Self {
        Self(1 << (index & 31))
    }

    pub fn contains_layer(&self, index: u8) -> bool {
        self.0 & Self::layer(index).0 != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}
