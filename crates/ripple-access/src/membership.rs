//! Membership resolution — pure set computations over the share graph.
//!
//! All lookups deduplicate by identifier and treat dangling links as "no
//! access": a missing audience, account, or contact resolves to the empty
//! set, never to an error. Store failures, by contrast, propagate — the call
//! site can always tell "denied" from "could not look up".

use std::collections::HashSet;

use ripple_core::{
  audience::AudienceId, post::PostId, store::ShareStore, subject::Subject,
};

use crate::error::{AccessError, Result};

/// Borrow-only resolver over a [`ShareStore`].
pub struct MembershipResolver<'a, S> {
  store: &'a S,
}

impl<'a, S: ShareStore> MembershipResolver<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// All audiences a post was shared to. Empty set if the post is unknown
  /// or unshared — post existence is the caller's concern.
  pub async fn audiences_for_post(
    &self,
    post_id: PostId,
  ) -> Result<HashSet<AudienceId>> {
    let ids = self
      .store
      .audience_ids_for_post(post_id)
      .await
      .map_err(AccessError::store)?;
    Ok(ids.into_iter().collect())
  }

  /// Direct membership lookup. Unknown audiences yield the empty set.
  pub async fn members_of_audience(
    &self,
    audience_id: AudienceId,
  ) -> Result<HashSet<Subject>> {
    let members = self
      .store
      .member_subjects(audience_id)
      .await
      .map_err(AccessError::store)?;
    Ok(members.into_iter().collect())
  }

  /// Inverse lookup: every audience the subject is a member of.
  pub async fn audiences_containing(
    &self,
    subject: Subject,
  ) -> Result<HashSet<AudienceId>> {
    let ids = self
      .store
      .audience_ids_containing(subject)
      .await
      .map_err(AccessError::store)?;
    Ok(ids.into_iter().collect())
  }

  /// Everything the subject can see through membership: the union, over the
  /// subject's audiences, of the posts shared to each. A post shared to two
  /// of the subject's audiences appears once.
  pub async fn posts_visible_to(
    &self,
    subject: Subject,
  ) -> Result<HashSet<PostId>> {
    let mut posts = HashSet::new();
    for audience_id in self.audiences_containing(subject).await? {
      let shared = self
        .store
        .post_ids_shared_to(audience_id)
        .await
        .map_err(AccessError::store)?;
      posts.extend(shared);
    }
    Ok(posts)
  }
}
