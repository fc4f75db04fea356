//! Error taxonomy for access decisions.
//!
//! The variants map one-to-one onto transport outcomes: `*NotFound` → 404,
//! `Unauthorized` → 401, `Forbidden` → 403, `InvalidState`/`Store` → 500.
//! "No access" is always a value (`Ok(false)`, an empty set, `Forbidden`);
//! a failed lookup is always an error. The two are never collapsed.

use ripple_core::{media::MediaItemId, post::PostId, subject::Subject};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
  #[error("post not found: {0}")]
  PostNotFound(PostId),

  #[error("subject not found: {0:?}")]
  SubjectNotFound(Subject),

  #[error("media item not found: {0}")]
  MediaNotFound(MediaItemId),

  /// Missing, malformed, expired, or tampered token.
  #[error("unauthorized")]
  Unauthorized,

  /// Valid identity, but the post was not shared to any audience containing
  /// it (and the identity is not the owner).
  #[error("forbidden")]
  Forbidden,

  /// Referential inconsistency that must surface, e.g. a post whose owning
  /// account no longer resolves.
  #[error("invalid state: {0}")]
  InvalidState(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AccessError {
  /// Wrap a backend error at the `ShareStore` seam.
  pub fn store<E: std::error::Error + Send + Sync + 'static>(e: E) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = AccessError> = std::result::Result<T, E>;
