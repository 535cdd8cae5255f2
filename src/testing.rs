// Copyright (c) 2024 Mike Tsao

//! A scripted stand-in for a game engine. [TestHost] implements every
//! capability trait with plain collections, and records each audio call so
//! that tests can make assertions about what was posted and when.

use crate::{
    error::LoadError,
    traits::{AudioSink, FetchesContent, SpatialQuery},
    types::{
        distance_between, AudioEventName, EntityUid, FetchTicket, LayerMask, ParameterName,
        Position, UidFactory,
    },
    util::SourceLocation,
};
use rustc_hash::FxHashMap;

/// One call the controller made on the [AudioSink].
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum AudioCall {
    Register(EntityUid),
    Unregister(EntityUid),
    Post(AudioEventName, EntityUid),
    SetParameter(ParameterName, f64),
}

/// An entity in the [TestHost] world.
#[derive(Clone, Debug, PartialEq)]
pub struct TestEntity {
    #[allow(missing_docs)]
    pub position: Position,
    /// [None] means the entity has no rigid body.
    pub speed: Option<f64>,
    /// The collision layer, 0..32.
    pub layer: u8,
}

#[derive(Debug)]
struct PendingFetch {
    location: SourceLocation,
    polls_remaining: usize,
}

/// See the [module documentation](self).
#[derive(Debug, Default)]
pub struct TestHost {
    entities: FxHashMap<EntityUid, TestEntity>,
    contents: FxHashMap<SourceLocation, String>,
    fetch_latency: usize,
    tickets: UidFactory<FetchTicket>,
    pending: FxHashMap<FetchTicket, PendingFetch>,

    /// Every audio call, in order.
    pub calls: Vec<AudioCall>,
    /// Every [SpatialQuery::attach_trigger_volume()] request.
    pub trigger_volumes: Vec<(EntityUid, f64)>,
    /// Every location that was fetched, in order.
    pub fetched: Vec<SourceLocation>,
}
impl TestHost {
    /// Places an entity on layer 0.
    pub fn add_entity(&mut self, uid: EntityUid, position: Position, speed: Option<f64>) {
        self.add_entity_on_layer(uid, position, speed, 0);
    }

    #[allow(missing_docs)]
    pub fn add_entity_on_layer(
        &mut self,
        uid: EntityUid,
        position: Position,
        speed: Option<f64>,
        layer: u8,
    ) {
        self.entities.insert(
            uid,
            TestEntity {
                position,
                speed,
                layer,
            },
        );
    }

    /// Destroys an entity.
    pub fn remove_entity(&mut self, uid: EntityUid) {
        self.entities.remove(&uid);
    }

    #[allow(missing_docs)]
    pub fn move_entity(&mut self, uid: EntityUid, position: Position) {
        if let Some(entity) = self.entities.get_mut(&uid) {
            entity.position = position;
        }
    }

    /// Makes `text` available at `location`. Anything not added this way
    /// fails to load.
    pub fn add_content(&mut self, location: SourceLocation, text: &str) {
        self.contents.insert(location, text.to_string());
    }

    /// How many polls a fetch stays in progress before it resolves. Zero (the
    /// default) means the first poll resolves it.
    pub fn set_fetch_latency(&mut self, polls: usize) {
        self.fetch_latency = polls;
    }

    /// How many times `event` was posted, on any entity.
    pub fn post_count(&self, event: &str) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, AudioCall::Post(e, _) if e.0 == event))
            .count()
    }

    /// How many fetches have begun but not yet been handed out or cancelled.
    pub fn outstanding_fetch_count(&self) -> usize {
        self.pending.len()
    }

    /// Every value set on `parameter`, in order.
    pub fn parameter_values(&self, parameter: &str) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                AudioCall::SetParameter(p, v) if p.0 == parameter => Some(*v),
                _ => None,
            })
            .collect()
    }
}
impl AudioSink for TestHost {
    fn register_entity(&mut self, uid: EntityUid) {
        self.calls.push(AudioCall::Register(uid));
    }

    fn unregister_entity(&mut self, uid: EntityUid) {
        self.calls.push(AudioCall::Unregister(uid));
    }

    fn post_event(&mut self, event: &AudioEventName, uid: EntityUid) {
        self.calls.push(AudioCall::Post(event.clone(), uid));
    }

    fn set_parameter(&mut self, parameter: &ParameterName, value: f64) {
        self.calls
            .push(AudioCall::SetParameter(parameter.clone(), value));
    }
}
impl SpatialQuery for TestHost {
    fn overlap_sphere(&self, center: Position, radius: f64, layer: LayerMask) -> Vec<EntityUid> {
        let mut uids: Vec<EntityUid> = self
            .entities
            .iter()
            .filter(|(_, e)| {
                layer.contains_layer(e.layer) && distance_between(&center, &e.position) <= radius
            })
            .map(|(uid, _)| *uid)
            .collect();
        uids.sort_by_key(|uid| uid.0);
        uids
    }

    fn position(&self, uid: EntityUid) -> Option<Position> {
        self.entities.get(&uid).map(|e| e.position)
    }

    fn rigid_body_speed(&self, uid: EntityUid) -> Option<f64> {
        self.entities.get(&uid).and_then(|e| e.speed)
    }

    fn attach_trigger_volume(&mut self, uid: EntityUid, radius: f64) {
        self.trigger_volumes.push((uid, radius));
    }
}
impl FetchesContent for TestHost {
    fn begin_fetch(&mut self, location: &SourceLocation) -> FetchTicket {
        let ticket = self.tickets.mint_next();
        self.fetched.push(location.clone());
        self.pending.insert(
            ticket,
            PendingFetch {
                location: location.clone(),
                polls_remaining: self.fetch_latency,
            },
        );
        ticket
    }

    fn poll_fetch(&mut self, ticket: FetchTicket) -> Option<Result<String, LoadError>> {
        let pending = self.pending.get_mut(&ticket)?;
        if pending.polls_remaining > 0 {
            pending.polls_remaining -= 1;
            return None;
        }
        let pending = self.pending.remove(&ticket)?;
        Some(match self.contents.get(&pending.location) {
            Some(text) => Ok(text.clone()),
            None => Err(match pending.location {
                SourceLocation::File(path) => LoadError::MissingFile(path),
                SourceLocation::Url(url) => LoadError::Network {
                    url,
                    reason: "404 Not Found".to_string(),
                },
            }),
        })
    }

    fn cancel_fetch(&mut self, ticket: FetchTicket) {
        self.pending.remove(&ticket);
    }
}
