//! Types that are used across multiple components of the crate.
//!
//! Types specific to a single component, like the tentative chain's [`Row`](crate::chain::Row),
//! can be found in that component's module.

pub mod basic;

pub mod block;

pub mod keypair;
