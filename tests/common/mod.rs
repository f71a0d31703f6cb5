//! Helpers shared by the integration tests: a logger, an in-memory key-value store, mock networks,
//! stub chain information providers, and block builders.

#![allow(dead_code)]

pub(crate) mod blocks;
pub(crate) mod chain_info;
pub(crate) mod logging;
pub(crate) mod mem_db;
pub(crate) mod network;
