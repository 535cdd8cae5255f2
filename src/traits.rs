// Copyright (c) 2024 Mike Tsao

//! The capabilities this crate needs from its host engine, and the hooks it
//! offers back.
//!
//! A game engine already knows where everything is, how fast it's moving, and
//! how to talk to the audio engine. Rather than wrap any particular engine,
//! this crate asks for those services through small traits. Tests implement
//! them with plain structs.

use crate::{
    detection::DetectionEvent,
    error::LoadError,
    types::{AudioEventName, EntityUid, FetchTicket, LayerMask, ParameterName, Position},
    util::SourceLocation,
};

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{AudioSink, DetectionObserver, FetchesContent, Host, SpatialQuery};
}

/// The audio engine, as seen by this crate.
pub trait AudioSink {
    /// Makes an entity known to the audio engine so that events can be posted
    /// to it.
    fn register_entity(&mut self, uid: EntityUid);

    /// Releases an entity registered with [AudioSink::register_entity()].
    fn unregister_entity(&mut self, uid: EntityUid);

    /// Posts a named event on an entity.
    fn post_event(&mut self, event: &AudioEventName, uid: EntityUid);

    /// Sets a global real-time parameter.
    fn set_parameter(&mut self, parameter: &ParameterName, value: f64);
}

/// The physics world, as seen by this crate.
#[allow(unused_variables)]
pub trait SpatialQuery {
    /// Returns every entity whose collider overlaps the sphere at `center` with
    /// `radius`, limited to colliders on layers in `layer`.
    fn overlap_sphere(&self, center: Position, radius: f64, layer: LayerMask) -> Vec<EntityUid>;

    /// Returns the entity's world position, or [None] if it no longer exists.
    fn position(&self, uid: EntityUid) -> Option<Position>;

    /// Returns the magnitude of the entity's rigid-body velocity, or [None] if
    /// it has no rigid body.
    fn rigid_body_speed(&self, uid: EntityUid) -> Option<f64>;

    /// Whether the entity still exists. Checked before every audio post.
    fn is_alive(&self, uid: EntityUid) -> bool {
        self.position(uid).is_some()
    }

    /// Asks the host to give the entity a trigger volume of the given radius,
    /// so that it will forward stay/exit notifications. Hosts that manage
    /// their own trigger volumes can ignore this.
    fn attach_trigger_volume(&mut self, uid: EntityUid, radius: f64) {}
}

/// Retrieves the text of a file or URL without blocking the scheduler.
///
/// A fetch is started with [FetchesContent::begin_fetch()], and then polled
/// once per tick with [FetchesContent::poll_fetch()] until it returns
/// [Some]. After that, the ticket is spent.
pub trait FetchesContent {
    /// Starts retrieving the content at `location`.
    fn begin_fetch(&mut self, location: &SourceLocation) -> FetchTicket;

    /// Returns the outcome of the fetch if it has finished, or [None] if it's
    /// still in progress.
    fn poll_fetch(&mut self, ticket: FetchTicket) -> Option<Result<String, LoadError>>;

    /// Abandons a fetch whose result is no longer wanted. The default polls
    /// once and drops the outcome, which covers fetchers that finish inside
    /// [FetchesContent::begin_fetch()]. Fetchers with work still in progress
    /// should override this so that a late result is discarded on arrival.
    fn cancel_fetch(&mut self, ticket: FetchTicket) {
        let _ = self.poll_fetch(ticket);
    }
}

/// Everything a [ProximityController](crate::ProximityController) needs from
/// the host, in one bundle. Implemented automatically.
pub trait Host: AudioSink + SpatialQuery + FetchesContent {}
impl<T: AudioSink + SpatialQuery + FetchesContent> Host for T {}

/// Receives a copy of every proximity notification. This is the place to hang
/// game logic that cares about proximity but not about audio.
#[allow(unused_variables)]
pub trait DetectionObserver {
    /// An entity passed a rule's distance and speed gates.
    fn handle_detection(&mut self, event: DetectionEvent) {}

    /// `other` left the trigger volume around `source`.
    fn handle_exit(&mut self, source: EntityUid, other: EntityUid) {}

    /// `other` remains inside the trigger volume around `source`.
    fn handle_stay(&mut self, source: EntityUid, other: EntityUid, distance: f64, speed: f64) {}
}
