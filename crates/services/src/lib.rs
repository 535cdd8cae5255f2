// Copyright (c) 2024 Mike Tsao

//! Thread-backed services for proximity-rtpc hosts. Each service runs on its
//! own thread and communicates over crossbeam channels.

#![deny(missing_docs)]

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        CrossbeamChannel, FetchService, FetchServiceEvent, FetchServiceInput, ProvidesService,
    };
}

pub use {
    fetch::{FetchService, FetchServiceEvent, FetchServiceInput},
    traits::ProvidesService,
    types::CrossbeamChannel,
};

mod fetch;
mod traits;
mod types;
