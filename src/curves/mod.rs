// Copyright (c) 2024 Mike Tsao

//! The RTPC curve pipeline: parse a `time_value` file into [Keyframe]s,
//! interpolate them into a dense sample sequence, and play that sequence one
//! sample per tick into a parameter.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        CurveConfig, CurveInterpolator, CurveParser, CurvePlayer, CurveSource, Keyframe,
        ParsedCurve,
    };
}

pub use config::{CurveConfig, CurveSource};
pub use interpolator::CurveInterpolator;
pub use keyframe::Keyframe;
pub use parser::{CurveParser, ParsedCurve};
pub use player::CurvePlayer;

mod config;
mod interpolator;
mod keyframe;
mod parser;
mod player;
