//! Account — a registered user who owns posts, audiences, and contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-assigned identifier for an [`Account`]. Opaque to the core.
pub type AccountId = i64;

/// A registered user. Credential management lives outside this system; the
/// account row carries identity and delivery details only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub id:           AccountId,
  pub name:         String,
  pub phone_number: String,
  pub email:        String,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ShareStore::add_account`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
  pub name:         String,
  pub phone_number: String,
  pub email:        String,
}
