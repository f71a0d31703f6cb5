//! Pluggable peer-to-peer (P2P) networking.
//!
//! The crate does not implement a transport. Library users provide one by implementing [`Network`],
//! and the crate only ever sends, broadcasts, and polls for [`Message`]s through it.

pub mod network;
pub use network::Network;

pub mod messages;
pub use messages::{Message, MicroBlockRequest};

pub(crate) mod sending;
