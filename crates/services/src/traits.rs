// Copyright (c) 2024 Mike Tsao

//! Traits used by services.

use crossbeam::channel::{Receiver, Sender};
use log::warn;

/// A service runs on its own thread and talks to its clients over crossbeam
/// channels. Clients send it Inputs and receive Events.
pub trait ProvidesService<I: core::fmt::Debug, E: core::fmt::Debug> {
    /// The sender side of the Input channel.
    fn sender(&self) -> &Sender<I>;

    /// Sends an Input, logging rather than failing if the service has gone
    /// away.
    fn send_input(&self, input: I) {
        if let Err(e) = self.sender().try_send(input) {
            warn!("While sending: {e:?}");
        }
    }

    /// The receiver side of the Event channel.
    fn receiver(&self) -> &Receiver<E>;
}
