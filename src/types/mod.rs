// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        AudioEventName, EntityUid, FetchTicket, LayerMask, ParameterName, Position, RuleUid,
        Seconds, UidFactory,
    };
}

pub use {
    names::{AudioEventName, LayerMask, ParameterName},
    spatial::{distance_between, Position},
    time::Seconds,
    uid::{EntityUid, FetchTicket, IsUid, RuleUid, UidFactory},
};

mod names;
mod spatial;
mod time;
mod uid;
