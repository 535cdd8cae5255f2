// Copyright (c) 2024 Mike Tsao

//! Identifiers for host entities, proximity rules, and in-flight fetches, plus
//! the factory that mints the ones this crate owns.

use core::sync::atomic::Ordering;
use core::{hash::Hash, marker::PhantomData, sync::atomic::AtomicUsize};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Anything that behaves like a numeric identifier.
pub trait IsUid: Eq + Hash + Clone + From<usize> {
    /// Returns the raw identifier.
    fn as_usize(&self) -> usize;
}

/// Identifies an entity (a game object) owned by the host engine. The host
/// chooses these values; this crate only compares and forwards them.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EntityUid(pub usize);
impl IsUid for EntityUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Identifies a [ProximityRule](crate::detection::ProximityRule) registered
/// with a controller.
#[derive(Synonym, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleUid(pub usize);
impl IsUid for RuleUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Identifies one outstanding content fetch. See
/// [FetchesContent](crate::traits::FetchesContent).
#[derive(Synonym, Serialize, Deserialize)]
pub struct FetchTicket(pub usize);
impl IsUid for FetchTicket {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Mints uids that never repeat within the lifetime of the factory.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UidFactory<U: IsUid> {
    next_uid_value: AtomicUsize,
    #[serde(skip)]
    _phantom: PhantomData<U>,
}
impl<U: IsUid> Default for UidFactory<U> {
    fn default() -> Self {
        Self::new(1)
    }
}
impl<U: IsUid> UidFactory<U> {
    /// Creates a factory whose first uid is `first_uid`.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
            _phantom: Default::default(),
        }
    }

    /// Hands out the next uid.
    pub fn mint_next(&self) -> U {
        U::from(self.next_uid_value.fetch_add(1, Ordering::Relaxed))
    }

    /// Tells the factory about a uid that was minted somewhere else, such as
    /// one read from a configuration file, so that it is never handed out
    /// again.
    pub fn notify_externally_minted_uid(&self, uid: &U) {
        self.next_uid_value
            .fetch_max(uid.as_usize() + 1, Ordering::Relaxed);
    }
}
