// Copyright (c) 2024 Mike Tsao

//! Turns proximity notifications into audio. A detection registers the
//! tracked entity and starts a [RowLoadTask]; exits and stays post their
//! configured events directly.

pub use {
    dispatcher::EventDispatcher,
    tasks::{CurvePipelineTask, CurvePlayerTask, RowLoadTask},
};

mod dispatcher;
mod tasks;
