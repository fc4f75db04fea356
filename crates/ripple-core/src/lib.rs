//! Core types and trait definitions for the Ripple sharing backend.
//!
//! This crate is deliberately free of HTTP, database, and crypto
//! dependencies. All other crates depend on it; it depends on nothing
//! proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod account;
pub mod audience;
pub mod contact;
pub mod error;
pub mod media;
pub mod post;
pub mod store;
pub mod subject;

pub use error::{Error, Result};
