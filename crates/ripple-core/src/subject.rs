//! Subject — the polymorphic viewer identity.
//!
//! A subject is whatever can hold a bearer token and be a member of an
//! audience: either a registered [`Account`](crate::account::Account) or a
//! [`Contact`](crate::contact::Contact) belonging to one.

use serde::{Deserialize, Serialize};

use crate::{account::AccountId, contact::ContactId};

/// The kind of identity a subject represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectKind {
  Account,
  Contact,
}

impl SubjectKind {
  /// The discriminant string stored in the `member_kind` column.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::Account => "account",
      Self::Contact => "contact",
    }
  }

  pub fn from_discriminant(s: &str) -> crate::Result<Self> {
    match s {
      "account" => Ok(Self::Account),
      "contact" => Ok(Self::Contact),
      other => Err(crate::Error::UnknownSubjectKind(other.to_string())),
    }
  }
}

/// A tagged identity reference. Authorization decisions dispatch on the
/// variant, never on field probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Subject {
  Account(AccountId),
  Contact(ContactId),
}

impl Subject {
  pub fn kind(&self) -> SubjectKind {
    match self {
      Self::Account(_) => SubjectKind::Account,
      Self::Contact(_) => SubjectKind::Contact,
    }
  }

  /// The raw storage identifier, meaningful only together with [`kind`].
  ///
  /// [`kind`]: Self::kind
  pub fn raw_id(&self) -> i64 {
    match self {
      Self::Account(id) | Self::Contact(id) => *id,
    }
  }

  pub fn from_parts(kind: SubjectKind, id: i64) -> Self {
    match kind {
      SubjectKind::Account => Self::Account(id),
      SubjectKind::Contact => Self::Contact(id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn discriminant_round_trip() {
    for kind in [SubjectKind::Account, SubjectKind::Contact] {
      let s = kind.discriminant();
      assert_eq!(SubjectKind::from_discriminant(s).unwrap(), kind);
    }
    assert!(SubjectKind::from_discriminant("audience").is_err());
  }

  #[test]
  fn parts_round_trip() {
    let s = Subject::Contact(42);
    assert_eq!(Subject::from_parts(s.kind(), s.raw_id()), s);
  }
}
