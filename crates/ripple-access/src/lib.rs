//! Access control and shareable links for Ripple.
//!
//! This crate holds the subsystem with actual invariants: deciding, for a
//! bearer token and an optional post id, which posts and media a requester
//! may see, and minting scoped tokens that authorise exactly that access.
//! Storage is reached only through [`ripple_core::store::ShareStore`]; SMS
//! delivery only through [`notify::SmsSender`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod authorize;
pub mod error;
pub mod membership;
pub mod notify;
pub mod view;

pub use authorize::{Authorizer, ShareLink};
pub use error::{AccessError, Result};
pub use membership::MembershipResolver;
pub use notify::{DeliveryReport, LoggingSms, Notifier, SmsSender};
pub use view::{MediaView, PostView, ViewPayload, ViewService};
