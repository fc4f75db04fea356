//! Post — the unit of sharing.
//!
//! A post holds a description and owns an ordered set of media items. Which
//! audiences can see it is tracked separately as share links.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Storage-assigned identifier for a [`Post`]. Opaque to the core.
pub type PostId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub id:          PostId,
  pub owner_id:    AccountId,
  pub description: String,
  /// Server-assigned timestamp; never changes after creation. Listings are
  /// ordered by this field, most recent first.
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ShareStore::add_post`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
  pub owner_id:    AccountId,
  pub description: String,
}
