//! The access authorizer: capability checks and shareable-link minting.

use chrono::Duration;
use ripple_core::{
  media::{MediaItem, MediaItemId},
  post::PostId,
  store::ShareStore,
  subject::Subject,
};
use ripple_token::{Claims, TokenCodec, TokenError};
use serde::Serialize;

use crate::{
  error::{AccessError, Result},
  membership::MembershipResolver,
};

/// A minted share link: the bearer token plus the URL carrying it.
#[derive(Debug, Clone, Serialize)]
pub struct ShareLink {
  pub token: String,
  pub url:   String,
}

/// Decides whether a subject may view a post, and mints tokens that grant
/// exactly that access. Construction wires in the process-wide codec, the
/// frontend base URL, and the token lifetime.
#[derive(Clone)]
pub struct Authorizer {
  codec:    TokenCodec,
  base_url: String,
  ttl:      Duration,
}

impl Authorizer {
  pub fn new(codec: TokenCodec, base_url: impl Into<String>, ttl: Duration) -> Self {
    Self { codec, base_url: base_url.into(), ttl }
  }

  /// Verify a bearer token. Any token failure collapses to `Unauthorized`.
  pub fn verify(&self, token: &str) -> Result<Claims> {
    self.codec.verify(token).map_err(|_| AccessError::Unauthorized)
  }

  /// True iff the subject owns the post, or the post's share set intersects
  /// the subject's audience memberships.
  ///
  /// A missing post is `PostNotFound`, checked before any membership work —
  /// never conflated with a deny.
  pub async fn can_view<S: ShareStore>(
    &self,
    store: &S,
    subject: Subject,
    post_id: PostId,
  ) -> Result<bool> {
    let post = store
      .get_post(post_id)
      .await
      .map_err(AccessError::store)?
      .ok_or(AccessError::PostNotFound(post_id))?;

    if let Subject::Account(account_id) = subject
      && account_id == post.owner_id
    {
      return Ok(true);
    }

    let resolver = MembershipResolver::new(store);
    let shared_to = resolver.audiences_for_post(post_id).await?;
    if shared_to.is_empty() {
      return Ok(false);
    }
    let member_of = resolver.audiences_containing(subject).await?;
    Ok(!shared_to.is_disjoint(&member_of))
  }

  /// Authorize access to a media item through its owning post, returning the
  /// item for serving. Called on every byte request: possession of a valid
  /// token is not enough on its own.
  pub async fn authorize_media<S: ShareStore>(
    &self,
    store: &S,
    subject: Subject,
    media_item_id: MediaItemId,
  ) -> Result<MediaItem> {
    let item = store
      .get_media_item(media_item_id)
      .await
      .map_err(AccessError::store)?
      .ok_or(AccessError::MediaNotFound(media_item_id))?;

    if self.can_view(store, subject, item.post_id).await? {
      Ok(item)
    } else {
      Err(AccessError::Forbidden)
    }
  }

  /// Mint a share link for `subject`. The capability is checked first; a
  /// deny fails with `Forbidden` and mints nothing. With
  /// `pin_post = true` the URL carries the post id, producing the
  /// "view this post" variant used in notifications; the token itself is
  /// identical either way.
  pub async fn issue_link<S: ShareStore>(
    &self,
    store: &S,
    subject: Subject,
    post_id: PostId,
    pin_post: bool,
  ) -> Result<ShareLink> {
    self.ensure_subject_exists(store, subject).await?;

    if !self.can_view(store, subject, post_id).await? {
      return Err(AccessError::Forbidden);
    }

    let token = self.codec.issue(subject, self.ttl).map_err(|e| match e {
      TokenError::Misconfigured => {
        AccessError::InvalidState("token signing secret misconfigured".into())
      }
      TokenError::Invalid => AccessError::Unauthorized,
    })?;

    let url = if pin_post {
      format!("{}?token={token}&post_id={post_id}", self.base_url)
    } else {
      format!("{}?token={token}", self.base_url)
    };
    Ok(ShareLink { token, url })
  }

  /// The subject row must still resolve before a token is minted for it.
  async fn ensure_subject_exists<S: ShareStore>(
    &self,
    store: &S,
    subject: Subject,
  ) -> Result<()> {
    let exists = match subject {
      Subject::Account(id) => store
        .get_account(id)
        .await
        .map_err(AccessError::store)?
        .is_some(),
      Subject::Contact(id) => store
        .get_contact(id)
        .await
        .map_err(AccessError::store)?
        .is_some(),
    };
    if exists {
      Ok(())
    } else {
      Err(AccessError::SubjectNotFound(subject))
    }
  }
}
