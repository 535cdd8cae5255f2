// Copyright (c) 2024 Mike Tsao

//! System utilities: randomness, configuration, and content fetching.

/// Commonly used imports.
pub mod prelude {
    pub use super::{ControllerConfig, ControllerSettings, FileFetcher, Rng, SourceLocation};
}

pub use fetch::{read_text_file, FileFetcher, SourceLocation};
pub use rng::Rng;
pub use settings::{ControllerConfig, ControllerSettings};

mod fetch;
mod rng;
mod settings;
