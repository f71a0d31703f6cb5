/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Methods to build and run a node that keeps track of the tentative chain.
//!
//! The key components of this module are:
//! - The builder-pattern interface to construct a [specification of the node](NodeSpec) with:
//!   1. `NodeSpec::builder` to construct a `NodeSpecBuilder`,
//!   2. The setters of the `NodeSpecBuilder`, and
//!   3. The `NodeSpecBuilder::build` method to construct a [NodeSpec],
//! - The function to [start](NodeSpec::start) a [Node] given its specification,
//! - [The type](Node) which keeps the node's threads alive.
//!
//! ## Starting a node
//!
//! ```ignore
//! let node =
//!     NodeSpec::builder()
//!     .network(network)
//!     .configuration(Configuration::builder().keypair(keypair).build())
//!     .genesis(genesis_block)
//!     .on_insert_micro_block(handler)
//!     .build()
//!     .start();
//!
//! let current_row = node.camera().row();
//! ```
//!
//! ## Threads
//!
//! A started node runs:
//! 1. The driver thread, which polls the [`Network`] and passes every message to the node's
//!    [`NgState`].
//! 2. The event bus thread, if logging is enabled or any handler was registered, which passes
//!    [events](crate::events) to their handlers.
//!
//! Each thread is stopped through its own shutdown channel when the [`Node`] is dropped.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use typed_builder::TypedBuilder;

use crate::cache::recency::{DEFAULT_INV_CACHE_CAPACITY, DEFAULT_MICRO_BLOCK_CACHE_CAPACITY};
use crate::chain::DEFAULT_SHRINK_SOFT_CAP;
use crate::event_bus::*;
use crate::events::*;
use crate::logging::first_seven_base64_chars;
use crate::networking::Network;
use crate::ng::{NgCamera, NgState, DEFAULT_INV_REQUESTER_CAPACITY};
use crate::types::block::KeyBlock;
use crate::types::keypair::Keypair;

/// Stores the user-defined parameters of a node, that is:
/// 1. The soft cap on the length of the tentative chain, above which old rows are dropped.
/// 2. The capacities of the microblock cache and of the inventory cache.
/// 3. How many requested microblock ids the inventory de-duplicator remembers.
/// 4. An optional keypair. A node with a keypair announces every microblock it attaches.
/// 5. The "Log Events" flag, if set to "true" then logs should be printed.
///
/// ## Log Events
///
/// This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
/// printed onto a terminal or to a file, set up a [logging
/// implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
#[derive(Clone, TypedBuilder)]
pub struct Configuration {
    #[builder(default = DEFAULT_SHRINK_SOFT_CAP, setter(doc = "Set the soft cap on the length of the tentative chain. Optional, defaults to 100."))]
    pub shrink_soft_cap: usize,
    #[builder(default = DEFAULT_MICRO_BLOCK_CACHE_CAPACITY, setter(doc = "Set how many recent microblocks are kept to serve peers. Optional."))]
    pub micro_block_cache_capacity: usize,
    #[builder(default = DEFAULT_INV_CACHE_CAPACITY, setter(doc = "Set how many recent inventory announcements are kept. Optional."))]
    pub inv_cache_capacity: usize,
    #[builder(default = DEFAULT_INV_REQUESTER_CAPACITY, setter(doc = "Set how many requested microblock ids are remembered. Optional, defaults to 16."))]
    pub inv_requester_capacity: usize,
    #[builder(default, setter(strip_option, doc = "Set the keypair used to sign microblock announcements. Optional."))]
    pub keypair: Option<Keypair>,
    #[builder(default = true, setter(doc = "Enable logging? Optional, defaults to true."))]
    pub log_events: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::builder().build()
    }
}

/// Stores all necessary parameters and trait implementations required to run the [Node].
#[derive(TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [NodeSpec]. On the builder call the following methods to construct a valid [NodeSpec].

    Required:
    - `.network(...)`
    - `.configuration(...)`

    Optional:
    - `.genesis(...)`
    - `.on_insert_key_block(...)`
    - `.on_insert_micro_block(...)`
    - `.on_shrink_chain(...)`
    - `.on_reset_chain(...)`
    - `.on_reject_orphan(...)`
    - `.on_request_micro_block(...)`
    - `.on_serve_micro_block(...)`
"))]
pub struct NodeSpec<N: Network + 'static> {
    // Required parameters
    #[builder(setter(doc = "Set the implementation of peer-to-peer networking. Required."))]
    network: N,
    #[builder(setter(doc = "Set the [configuration](Configuration) of the node. Required."))]
    configuration: Configuration,
    // Optional parameters
    #[builder(default, setter(strip_option, doc = "Set the key block the tentative chain starts from. Optional."))]
    genesis: Option<KeyBlock>,
    #[builder(default, setter(transform = |handler: impl Fn(&InsertKeyBlockEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<InsertKeyBlockEvent>),
    doc = "Register a handler closure to be invoked after a key block is attached to the tentative chain. Optional."))]
    on_insert_key_block: Option<HandlerPtr<InsertKeyBlockEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&InsertMicroBlockEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<InsertMicroBlockEvent>),
    doc = "Register a handler closure to be invoked after a microblock is attached to the tentative chain. Optional."))]
    on_insert_micro_block: Option<HandlerPtr<InsertMicroBlockEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&ShrinkChainEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<ShrinkChainEvent>),
    doc = "Register a handler closure to be invoked after old rows are dropped from the tentative chain. Optional."))]
    on_shrink_chain: Option<HandlerPtr<ShrinkChainEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&ResetChainEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<ResetChainEvent>),
    doc = "Register a handler closure to be invoked after the tentative chain is replaced. Optional."))]
    on_reset_chain: Option<HandlerPtr<ResetChainEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&RejectOrphanEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<RejectOrphanEvent>),
    doc = "Register a handler closure to be invoked after an orphan block or microblock is rejected. Optional."))]
    on_reject_orphan: Option<HandlerPtr<RejectOrphanEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&RequestMicroBlockEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<RequestMicroBlockEvent>),
    doc = "Register a handler closure to be invoked after an announced microblock is requested from a peer. Optional."))]
    on_request_micro_block: Option<HandlerPtr<RequestMicroBlockEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&ServeMicroBlockEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<ServeMicroBlockEvent>),
    doc = "Register a handler closure to be invoked after a cached microblock is sent to a peer that asked for it. Optional."))]
    on_serve_micro_block: Option<HandlerPtr<ServeMicroBlockEvent>>,
}

impl<N: Network + 'static> NodeSpec<N> {
    /// Starts all threads and channels associated with running a node, and returns the handles to
    /// them in a [Node] struct.
    pub fn start(self) -> Node {
        let event_handlers = EventHandlers::new(
            self.configuration.log_events,
            self.on_insert_key_block,
            self.on_insert_micro_block,
            self.on_shrink_chain,
            self.on_reset_chain,
            self.on_reject_orphan,
            self.on_request_micro_block,
            self.on_serve_micro_block,
        );

        let (event_publisher, event_subscriber) = if !event_handlers.is_empty() {
            Some(mpsc::channel()).unzip()
        } else {
            (None, None)
        };

        let mut state = NgState::new(&self.configuration, self.network.clone(), event_publisher);
        if let Some(genesis) = self.genesis {
            state.reset(genesis);
        }
        let camera = state.camera();

        let (event_bus, event_bus_shutdown) = match event_subscriber {
            Some(event_subscriber) => {
                let (shutdown, shutdown_receiver) = mpsc::channel();
                let event_bus =
                    start_event_bus(event_handlers, event_subscriber, shutdown_receiver);
                (Some(event_bus), Some(shutdown))
            }
            None => (None, None),
        };

        let (driver_shutdown, driver_shutdown_receiver) = mpsc::channel();
        let driver = start_driver(state, self.network, driver_shutdown_receiver);

        Node {
            camera,
            driver: Some(driver),
            driver_shutdown,
            event_bus,
            event_bus_shutdown,
        }
    }
}

/// Spawn the driver thread, which polls `network` and feeds every message to `state` until a
/// shutdown signal is received.
fn start_driver<N: Network + 'static>(
    mut state: NgState<N>,
    mut network: N,
    shutdown_signal: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match shutdown_signal.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => return,
            Err(TryRecvError::Empty) => (),
        }

        if let Some((origin, message)) = network.recv() {
            let kind = message.kind();
            if let Err(err) = state.handle_message(origin, message) {
                log::debug!(
                    "Ignored {} from {}: {}",
                    kind,
                    first_seven_base64_chars(&origin.to_bytes()),
                    err
                );
            }
        } else {
            thread::yield_now()
        }
    })
}

/// A handle to the background threads of a node. When this value is dropped, all background threads
/// are gracefully shut down.
pub struct Node {
    camera: NgCamera,
    driver: Option<JoinHandle<()>>,
    driver_shutdown: Sender<()>,
    event_bus: Option<JoinHandle<()>>,
    event_bus_shutdown: Option<Sender<()>>,
}

impl Node {
    /// Returns an [NgCamera] which can be used to peek into the tentative chain and the caches.
    pub fn camera(&self) -> &NgCamera {
        &self.camera
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        // The driver publishes events, so it is stopped before the event bus.
        let _ = self.driver_shutdown.send(());
        if let Some(driver) = self.driver.take() {
            let _ = driver.join();
        }

        if let Some(shutdown) = &self.event_bus_shutdown {
            let _ = shutdown.send(());
        }
        if let Some(event_bus) = self.event_bus.take() {
            let _ = event_bus.join();
        }
    }
}
