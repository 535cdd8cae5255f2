// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! proximity-rtpc binds spatial proximity between game entities to an audio
//! engine's events and real-time parameter controls (RTPCs).
//!
//! The host engine owns physics, transforms, and the audio engine itself. It
//! exposes them to this crate through the capability traits in [traits], and
//! it drives a [ProximityController] by calling
//! [ProximityController::tick()] once per frame and forwarding trigger-volume
//! notifications.
//!
//! * *Curves*: [CurveParser] reads `time_value` records,
//! [CurveInterpolator] turns keyframes into a dense sample sequence, and
//! [CurvePlayer] walks that sequence one sample per tick.
//! * *Static rows*: [CsvRowLoader] reads five-column rows whose values are
//! pushed, with random jitter, to named parameters.
//! * *Detection*: [ProximityDetector] evaluates each [ProximityRule]'s
//! distance and speed gates, and [EventDispatcher] turns detections into
//! audio events and cooperative [scheduler] tasks.

/// A collection of imports that are useful to users of this crate. `use
/// proximity_rtpc::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        controller::{LoggingObserver, ProximityController}, curves::prelude::*, detection::prelude::*,
        dispatch::EventDispatcher, error::prelude::*, rows::prelude::*, scheduler::prelude::*,
        traits::prelude::*, types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    controller::ProximityController,
    curves::{CurveInterpolator, CurveParser, CurvePlayer},
    detection::{ProximityDetector, ProximityRule},
    dispatch::EventDispatcher,
    rows::CsvRowLoader,
};

pub mod controller;
pub mod curves;
pub mod detection;
pub mod dispatch;
pub mod error;
pub mod rows;
pub mod scheduler;
pub mod testing;
pub mod traits;
pub mod types;
pub mod util;
