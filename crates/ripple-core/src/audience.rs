//! Audience — a named, owner-scoped group of subjects; the unit of sharing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Storage-assigned identifier for an [`Audience`]. Opaque to the core.
pub type AudienceId = i64;

/// A named collection of subjects owned by one account. Every member must
/// belong to (or, for contacts, be owned by) the owning account — enforced
/// when membership is written, tolerated as "no access" when a link dangles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audience {
  pub id:         AudienceId,
  pub owner_id:   AccountId,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::ShareStore::add_audience`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAudience {
  pub owner_id: AccountId,
  pub name:     String,
}
