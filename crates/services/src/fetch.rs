// Copyright (c) 2024 Mike Tsao

//! Fetches curve and row sources on a background thread, so that slow disks
//! and slow servers never stall a frame.

use crate::{traits::ProvidesService, types::CrossbeamChannel};
use crossbeam::channel::{Receiver, Sender};
use log::{debug, error};
use proximity_rtpc::{
    error::LoadError,
    traits::FetchesContent,
    types::{FetchTicket, UidFactory},
    util::{read_text_file, SourceLocation},
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Requests to the [FetchService].
#[derive(Clone, Debug)]
pub enum FetchServiceInput {
    /// Retrieve the content at the location and report it under the ticket.
    Fetch(FetchTicket, SourceLocation),

    /// Stop the worker thread.
    Quit,
}

/// Replies from the [FetchService].
#[derive(Debug)]
pub enum FetchServiceEvent {
    /// A fetch finished, successfully or not.
    Fetched(FetchTicket, Result<String, LoadError>),

    /// The worker thread processed [FetchServiceInput::Quit] and is exiting.
    Quit,
}

/// A [FetchesContent] backed by a worker thread. Files are read from disk,
/// and `http(s)://` URLs are retrieved with a blocking
/// [reqwest](https://crates.io/crates/reqwest) client when the `http` feature
/// is enabled.
///
/// Results arrive on the event channel and are collected by
/// [FetchesContent::poll_fetch()], so a host that uses this service as its
/// fetcher never needs to read the channel itself.
#[derive(Debug)]
pub struct FetchService {
    inputs: CrossbeamChannel<FetchServiceInput>,
    events: CrossbeamChannel<FetchServiceEvent>,

    tickets: UidFactory<FetchTicket>,
    ready: FxHashMap<FetchTicket, Result<String, LoadError>>,
    cancelled: FxHashSet<FetchTicket>,
}
impl Default for FetchService {
    fn default() -> Self {
        Self::new()
    }
}
impl FetchService {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        let r = Self {
            inputs: Default::default(),
            events: Default::default(),
            tickets: Default::default(),
            ready: Default::default(),
            cancelled: Default::default(),
        };
        r.spawn_thread();
        r
    }

    fn spawn_thread(&self) {
        let receiver = self.inputs.receiver.clone();
        let sender = self.events.sender.clone();
        std::thread::spawn(move || {
            FetchServiceDaemon::new_with(receiver, sender).execute();
        });
    }

    fn collect_events(&mut self) {
        while let Ok(event) = self.events.receiver.try_recv() {
            match event {
                FetchServiceEvent::Fetched(ticket, result) => {
                    if !self.cancelled.remove(&ticket) {
                        self.ready.insert(ticket, result);
                    }
                }
                FetchServiceEvent::Quit => debug!("Fetch service has quit"),
            }
        }
    }
}
impl ProvidesService<FetchServiceInput, FetchServiceEvent> for FetchService {
    fn sender(&self) -> &Sender<FetchServiceInput> {
        &self.inputs.sender
    }

    fn receiver(&self) -> &Receiver<FetchServiceEvent> {
        &self.events.receiver
    }
}
impl FetchesContent for FetchService {
    fn begin_fetch(&mut self, location: &SourceLocation) -> FetchTicket {
        let ticket = self.tickets.mint_next();
        self.send_input(FetchServiceInput::Fetch(ticket, location.clone()));
        ticket
    }

    fn poll_fetch(&mut self, ticket: FetchTicket) -> Option<Result<String, LoadError>> {
        self.collect_events();
        self.ready.remove(&ticket)
    }

    fn cancel_fetch(&mut self, ticket: FetchTicket) {
        self.collect_events();
        if self.ready.remove(&ticket).is_none() {
            self.cancelled.insert(ticket);
        }
    }
}

struct FetchServiceDaemon {
    receiver: Receiver<FetchServiceInput>,
    sender: Sender<FetchServiceEvent>,
    #[cfg(feature = "http")]
    client: Option<reqwest::blocking::Client>,
}
impl FetchServiceDaemon {
    fn new_with(receiver: Receiver<FetchServiceInput>, sender: Sender<FetchServiceEvent>) -> Self {
        Self {
            receiver,
            sender,
            #[cfg(feature = "http")]
            client: match reqwest::blocking::Client::builder().build() {
                Ok(client) => Some(client),
                Err(e) => {
                    error!("Couldn't create HTTP client: {e}");
                    None
                }
            },
        }
    }

    fn execute(&mut self) {
        while let Ok(input) = self.receiver.recv() {
            match input {
                FetchServiceInput::Fetch(ticket, location) => {
                    debug!("Fetching {location}");
                    let result = self.fetch(&location);
                    if self
                        .sender
                        .send(FetchServiceEvent::Fetched(ticket, result))
                        .is_err()
                    {
                        break;
                    }
                }
                FetchServiceInput::Quit => {
                    let _ = self.sender.send(FetchServiceEvent::Quit);
                    break;
                }
            }
        }
    }

    fn fetch(&self, location: &SourceLocation) -> Result<String, LoadError> {
        match location {
            SourceLocation::File(path) => read_text_file(path),
            SourceLocation::Url(url) => self.fetch_url(url),
        }
    }

    #[cfg(feature = "http")]
    fn fetch_url(&self, url: &str) -> Result<String, LoadError> {
        let network_error = |reason: String| LoadError::Network {
            url: url.to_string(),
            reason,
        };
        let Some(client) = self.client.as_ref() else {
            return Err(network_error("no HTTP client".to_string()));
        };
        let response = client
            .get(url)
            .send()
            .map_err(|e| network_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(network_error(status.to_string()));
        }
        response.text().map_err(|e| network_error(e.to_string()))
    }

    #[cfg(not(feature = "http"))]
    fn fetch_url(&self, url: &str) -> Result<String, LoadError> {
        Err(LoadError::Unsupported(url.to_string()))
    }
}
