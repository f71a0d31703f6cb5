//! The event bus thread, which passes published [events](crate::events) to their handlers.

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::*;
use crate::logging::Logger;

pub(crate) type HandlerPtr<T> = Box<dyn Fn(&T) + Send>;

pub(crate) struct EventHandlers {
    pub(crate) insert_key_block_handlers: Vec<HandlerPtr<InsertKeyBlockEvent>>,
    pub(crate) insert_micro_block_handlers: Vec<HandlerPtr<InsertMicroBlockEvent>>,
    pub(crate) shrink_chain_handlers: Vec<HandlerPtr<ShrinkChainEvent>>,
    pub(crate) reset_chain_handlers: Vec<HandlerPtr<ResetChainEvent>>,
    pub(crate) reject_orphan_handlers: Vec<HandlerPtr<RejectOrphanEvent>>,
    pub(crate) request_micro_block_handlers: Vec<HandlerPtr<RequestMicroBlockEvent>>,
    pub(crate) serve_micro_block_handlers: Vec<HandlerPtr<ServeMicroBlockEvent>>,
}

impl EventHandlers {
    /// Collect the user-provided handlers, adding the default loggers in front of them if
    /// `log_events` is set.
    pub(crate) fn new(
        log_events: bool,
        insert_key_block_handler: Option<HandlerPtr<InsertKeyBlockEvent>>,
        insert_micro_block_handler: Option<HandlerPtr<InsertMicroBlockEvent>>,
        shrink_chain_handler: Option<HandlerPtr<ShrinkChainEvent>>,
        reset_chain_handler: Option<HandlerPtr<ResetChainEvent>>,
        reject_orphan_handler: Option<HandlerPtr<RejectOrphanEvent>>,
        request_micro_block_handler: Option<HandlerPtr<RequestMicroBlockEvent>>,
        serve_micro_block_handler: Option<HandlerPtr<ServeMicroBlockEvent>>,
    ) -> EventHandlers {
        fn handlers<T: Logger>(log_events: bool, user: Option<HandlerPtr<T>>) -> Vec<HandlerPtr<T>> {
            let mut handlers: Vec<HandlerPtr<T>> = Vec::new();
            if log_events {
                handlers.push(T::get_logger());
            }
            handlers.extend(user);
            handlers
        }

        EventHandlers {
            insert_key_block_handlers: handlers(log_events, insert_key_block_handler),
            insert_micro_block_handlers: handlers(log_events, insert_micro_block_handler),
            shrink_chain_handlers: handlers(log_events, shrink_chain_handler),
            reset_chain_handlers: handlers(log_events, reset_chain_handler),
            reject_orphan_handlers: handlers(log_events, reject_orphan_handler),
            request_micro_block_handlers: handlers(log_events, request_micro_block_handler),
            serve_micro_block_handlers: handlers(log_events, serve_micro_block_handler),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.insert_key_block_handlers.is_empty()
            && self.insert_micro_block_handlers.is_empty()
            && self.shrink_chain_handlers.is_empty()
            && self.reset_chain_handlers.is_empty()
            && self.reject_orphan_handlers.is_empty()
            && self.request_micro_block_handlers.is_empty()
            && self.serve_micro_block_handlers.is_empty()
    }

    pub(crate) fn fire_handlers(&self, event: Event) {
        match event {
            Event::InsertKeyBlock(insert_key_block_event) => self
                .insert_key_block_handlers
                .iter()
                .for_each(|handler| handler(&insert_key_block_event)),

            Event::InsertMicroBlock(insert_micro_block_event) => self
                .insert_micro_block_handlers
                .iter()
                .for_each(|handler| handler(&insert_micro_block_event)),

            Event::ShrinkChain(shrink_chain_event) => self
                .shrink_chain_handlers
                .iter()
                .for_each(|handler| handler(&shrink_chain_event)),

            Event::ResetChain(reset_chain_event) => self
                .reset_chain_handlers
                .iter()
                .for_each(|handler| handler(&reset_chain_event)),

            Event::RejectOrphan(reject_orphan_event) => self
                .reject_orphan_handlers
                .iter()
                .for_each(|handler| handler(&reject_orphan_event)),

            Event::RequestMicroBlock(request_micro_block_event) => self
                .request_micro_block_handlers
                .iter()
                .for_each(|handler| handler(&request_micro_block_event)),

            Event::ServeMicroBlock(serve_micro_block_event) => self
                .serve_micro_block_handlers
                .iter()
                .for_each(|handler| handler(&serve_micro_block_event)),
        }
    }
}

pub(crate) fn start_event_bus(
    event_handlers: EventHandlers,
    event_subscriber: Receiver<Event>,
    shutdown_signal: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match shutdown_signal.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => return,
            Err(TryRecvError::Empty) => (),
        }

        match event_subscriber.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => event_handlers.fire_handlers(event),
            Err(RecvTimeoutError::Timeout) => (),
            Err(RecvTimeoutError::Disconnected) => return,
        }
    })
}
