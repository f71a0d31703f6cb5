/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the node's
//! [configuration](crate::node::Configuration).
//!
//! This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values are
//! always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how an [InsertMicroBlock](crate::events::InsertMicroBlockEvent) is printed:
//!
//! ```text
//! InsertMicroBlock, 1701329264, Id5u7f6, fNGCJyk
//! ```
//!
//! In the snippet, the third and fourth values are the first seven characters of the Base64
//! encoding of the microblock's total id and of the id it references.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use std::time::SystemTime;

use crate::events::*;

// Names of each event in PascalCase for printing:
pub const INSERT_KEY_BLOCK: &str = "InsertKeyBlock";
pub const INSERT_MICRO_BLOCK: &str = "InsertMicroBlock";
pub const SHRINK_CHAIN: &str = "ShrinkChain";
pub const RESET_CHAIN: &str = "ResetChain";
pub const REJECT_ORPHAN: &str = "RejectOrphan";

pub const REQUEST_MICRO_BLOCK: &str = "RequestMicroBlock";
pub const SERVE_MICRO_BLOCK: &str = "ServeMicroBlock";

/// Implemented by event types. Used to get a closure that logs the event.
pub(crate) trait Logger {
    /// Returns a pointer to the default logging handler for a given event type.
    fn get_logger() -> Box<dyn Fn(&Self) + Send>;
}

impl Logger for InsertKeyBlockEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |insert_key_block_event: &InsertKeyBlockEvent| {
            log::info!(
                "{}, {}, {}, {}",
                INSERT_KEY_BLOCK,
                secs_since_unix_epoch(insert_key_block_event.timestamp),
                first_seven_base64_chars(&insert_key_block_event.block.bytes()),
                insert_key_block_event.height
            )
        };
        Box::new(logger)
    }
}

impl Logger for InsertMicroBlockEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |insert_micro_block_event: &InsertMicroBlockEvent| {
            log::info!(
                "{}, {}, {}, {}",
                INSERT_MICRO_BLOCK,
                secs_since_unix_epoch(insert_micro_block_event.timestamp),
                first_seven_base64_chars(&insert_micro_block_event.total_id.bytes()),
                first_seven_base64_chars(&insert_micro_block_event.reference.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for ShrinkChainEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |shrink_chain_event: &ShrinkChainEvent| {
            log::debug!(
                "{}, {}, {}, {}",
                SHRINK_CHAIN,
                secs_since_unix_epoch(shrink_chain_event.timestamp),
                first_seven_base64_chars(&shrink_chain_event.first_block.bytes()),
                shrink_chain_event.len
            )
        };
        Box::new(logger)
    }
}

impl Logger for ResetChainEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |reset_chain_event: &ResetChainEvent| {
            log::info!(
                "{}, {}, {}",
                RESET_CHAIN,
                secs_since_unix_epoch(reset_chain_event.timestamp),
                first_seven_base64_chars(&reset_chain_event.block.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for RejectOrphanEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |reject_orphan_event: &RejectOrphanEvent| {
            log::warn!(
                "{}, {}, {}, {}",
                REJECT_ORPHAN,
                secs_since_unix_epoch(reject_orphan_event.timestamp),
                first_seven_base64_chars(&reject_orphan_event.id.bytes()),
                first_seven_base64_chars(&reject_orphan_event.parent.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for RequestMicroBlockEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |request_micro_block_event: &RequestMicroBlockEvent| {
            log::debug!(
                "{}, {}, {}, {}",
                REQUEST_MICRO_BLOCK,
                secs_since_unix_epoch(request_micro_block_event.timestamp),
                first_seven_base64_chars(&request_micro_block_event.peer.to_bytes()),
                first_seven_base64_chars(&request_micro_block_event.total_id.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for ServeMicroBlockEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |serve_micro_block_event: &ServeMicroBlockEvent| {
            log::debug!(
                "{}, {}, {}, {}",
                SERVE_MICRO_BLOCK,
                secs_since_unix_epoch(serve_micro_block_event.timestamp),
                first_seven_base64_chars(&serve_micro_block_event.peer.to_bytes()),
                first_seven_base64_chars(&serve_micro_block_event.total_id.bytes())
            )
        };
        Box::new(logger)
    }
}

// Get a more readable representation of a bytesequence by base64-encoding it and taking the first 7 characters.
pub(crate) fn first_seven_base64_chars(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);
    if encoded.len() > 7 {
        encoded[0..7].to_string()
    } else {
        encoded
    }
}

fn secs_since_unix_epoch(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
