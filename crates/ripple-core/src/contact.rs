//! Contact — a non-account recipient owned by exactly one account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// Storage-assigned identifier for a [`Contact`]. Opaque to the core.
pub type ContactId = i64;

/// A person the owning account can share with. Contacts never log in; they
/// reach shared content only through signed links delivered out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub id:           ContactId,
  pub owner_id:     AccountId,
  pub name:         String,
  pub phone_number: String,
  pub email:        Option<String>,
  pub created_at:   DateTime<Utc>,
}

/// Input to [`crate::store::ShareStore::add_contact`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
  pub owner_id:     AccountId,
  pub name:         String,
  pub phone_number: String,
  pub email:        Option<String>,
}
