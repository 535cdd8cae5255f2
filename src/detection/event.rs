// Copyright (c) 2024 Mike Tsao

use crate::types::EntityUid;
use bounded_vec_deque::BoundedVecDeque;
use serde::{Deserialize, Serialize};

/// One entity found near a tracked entity, with the measurements that passed
/// the rule's gates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DetectionEvent {
    /// The tracked entity.
    pub source: EntityUid,
    /// The entity that came near it.
    pub other: EntityUid,
    #[allow(missing_docs)]
    pub distance: f64,
    /// The other entity's speed, or zero if it has no rigid body.
    pub speed: f64,
}

/// The most recent detections, oldest first. Once full, each new detection
/// evicts the oldest one.
#[derive(Debug)]
pub struct DetectionHistory {
    events: BoundedVecDeque<DetectionEvent>,
}
impl DetectionHistory {
    /// Creates an empty history that keeps at most `capacity` events (at
    /// least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            events: BoundedVecDeque::new(capacity.max(1)),
        }
    }

    #[allow(missing_docs)]
    pub fn push(&mut self, event: DetectionEvent) {
        self.events.push_back(event);
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[allow(missing_docs)]
    pub fn capacity(&self) -> usize {
        self.events.max_len()
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &DetectionEvent> {
        self.events.iter()
    }

    #[allow(missing_docs)]
    pub fn latest(&self) -> Option<&DetectionEvent> {
        self.events.back()
    }

    #[allow(missing_docs)]
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
