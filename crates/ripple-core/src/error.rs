//! Error types for `ripple-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown subject kind discriminant: {0:?}")]
  UnknownSubjectKind(String),

  #[error("unknown media kind discriminant: {0:?}")]
  UnknownMediaKind(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
