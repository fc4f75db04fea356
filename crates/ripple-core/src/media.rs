//! Media items — photos and videos attached to a post.

use serde::{Deserialize, Serialize};

use crate::post::PostId;

/// Storage-assigned identifier for a [`MediaItem`]. Opaque to the core.
pub type MediaItemId = i64;

/// The kind of media a [`MediaItem`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
  Photo,
  Video,
}

impl MediaKind {
  /// The discriminant string stored in the `kind` column and rendered in
  /// view payloads. Must match the serde tags above.
  pub fn discriminant(&self) -> &'static str {
    match self {
      Self::Photo => "photo",
      Self::Video => "video",
    }
  }

  pub fn from_discriminant(s: &str) -> crate::Result<Self> {
    match s {
      "photo" => Ok(Self::Photo),
      "video" => Ok(Self::Video),
      other => Err(crate::Error::UnknownMediaKind(other.to_string())),
    }
  }
}

/// One attachment of a post. The binary payload lives on disk under the
/// configured media directory; only the relative path is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
  pub id:       MediaItemId,
  pub post_id:  PostId,
  /// Path relative to the configured media directory.
  pub path:     String,
  pub kind:     MediaKind,
  /// Ordering within the owning post; lower renders first.
  pub position: u32,
}

/// Input to [`crate::store::ShareStore::add_media_item`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMediaItem {
  pub post_id:  PostId,
  pub path:     String,
  pub kind:     MediaKind,
  pub position: u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn discriminant_round_trip() {
    for kind in [MediaKind::Photo, MediaKind::Video] {
      let s = kind.discriminant();
      assert_eq!(MediaKind::from_discriminant(s).unwrap(), kind);
    }
    assert!(MediaKind::from_discriminant("audio").is_err());
  }
}
