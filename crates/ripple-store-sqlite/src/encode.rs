//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Subject and media kinds are
//! stored as their discriminant strings.

use chrono::{DateTime, Utc};
use ripple_core::{
  account::Account,
  audience::Audience,
  contact::Contact,
  media::{MediaItem, MediaKind},
  post::Post,
  subject::{Subject, SubjectKind},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Kind discriminants ──────────────────────────────────────────────────────

pub fn decode_subject_kind(s: &str) -> Result<SubjectKind> {
  Ok(SubjectKind::from_discriminant(s)?)
}

pub fn decode_media_kind(s: &str) -> Result<MediaKind> {
  Ok(MediaKind::from_discriminant(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `accounts` row.
pub struct RawAccount {
  pub account_id:   i64,
  pub name:         String,
  pub phone_number: String,
  pub email:        String,
  pub created_at:   String,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:           self.account_id,
      name:         self.name,
      phone_number: self.phone_number,
      email:        self.email,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id:   i64,
  pub owner_id:     i64,
  pub name:         String,
  pub phone_number: String,
  pub email:        Option<String>,
  pub created_at:   String,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:           self.contact_id,
      owner_id:     self.owner_id,
      name:         self.name,
      phone_number: self.phone_number,
      email:        self.email,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `posts` row.
pub struct RawPost {
  pub post_id:     i64,
  pub owner_id:    i64,
  pub description: String,
  pub created_at:  String,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:          self.post_id,
      owner_id:    self.owner_id,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `audiences` row.
pub struct RawAudience {
  pub audience_id: i64,
  pub owner_id:    i64,
  pub name:        String,
  pub created_at:  String,
}

impl RawAudience {
  pub fn into_audience(self) -> Result<Audience> {
    Ok(Audience {
      id:         self.audience_id,
      owner_id:   self.owner_id,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `media_items` row.
pub struct RawMediaItem {
  pub media_item_id: i64,
  pub post_id:       i64,
  pub path:          String,
  pub kind:          String,
  pub position:      i64,
}

impl RawMediaItem {
  pub fn into_media_item(self) -> Result<MediaItem> {
    Ok(MediaItem {
      id:       self.media_item_id,
      post_id:  self.post_id,
      path:     self.path,
      kind:     decode_media_kind(&self.kind)?,
      position: self.position as u32,
    })
  }
}

/// Raw values read from an `audience_members` row.
pub struct RawMember {
  pub member_kind: String,
  pub member_id:   i64,
}

impl RawMember {
  pub fn into_subject(self) -> Result<Subject> {
    let kind = decode_subject_kind(&self.member_kind)?;
    Ok(Subject::from_parts(kind, self.member_id))
  }
}
