//! The view aggregator: token in, visible content out.
//!
//! One request walks a fixed sequence — verify, identify, branch — and ends
//! in either a single-post payload or the deduplicated, newest-first list of
//! everything the token's subject can see.

use ripple_core::{
  media::{MediaItemId, MediaKind},
  post::{Post, PostId},
  store::ShareStore,
  subject::Subject,
};
use serde::Serialize;

use crate::{
  authorize::Authorizer,
  error::{AccessError, Result},
  membership::MembershipResolver,
};

// ─── Payloads ────────────────────────────────────────────────────────────────

/// One media attachment as rendered to viewers. The URL points at the
/// token-gated byte endpoint; authorization happens again there.
#[derive(Debug, Clone, Serialize)]
pub struct MediaView {
  pub id:   MediaItemId,
  #[serde(rename = "type")]
  pub kind: MediaKind,
  pub url:  String,
}

/// One post as rendered to viewers.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
  pub post_id:      PostId,
  pub description:  String,
  pub creator_name: String,
  pub media_items:  Vec<MediaView>,
  /// RFC 3339.
  pub created_at:   String,
}

/// The response body of the view endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ViewPayload {
  Post(PostView),
  Posts { posts: Vec<PostView> },
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Renders the post(s) visible to a verified token's subject.
#[derive(Clone)]
pub struct ViewService {
  authorizer: Authorizer,
}

impl ViewService {
  pub fn new(authorizer: Authorizer) -> Self { Self { authorizer } }

  /// Resolve a raw bearer token (plus optional post id) to a view payload.
  ///
  /// Invalid token → `Unauthorized`. Post id supplied but not visible to
  /// the subject → `Forbidden`. Contact tokens list by the contact's own
  /// memberships, never the owning account's.
  pub async fn view_for_token<S: ShareStore>(
    &self,
    store: &S,
    token: &str,
    post_id: Option<PostId>,
  ) -> Result<ViewPayload> {
    let claims = self.authorizer.verify(token)?;
    let subject = claims.subject().map_err(|_| AccessError::Unauthorized)?;

    match post_id {
      Some(post_id) => {
        if !self.authorizer.can_view(store, subject, post_id).await? {
          return Err(AccessError::Forbidden);
        }
        Ok(ViewPayload::Post(self.single_post_view(store, post_id).await?))
      }
      None => {
        let posts = self.list_view(store, subject).await?;
        Ok(ViewPayload::Posts { posts })
      }
    }
  }

  /// Render one post. A post whose owning account cannot be resolved is an
  /// `InvalidState` error here — list mode already filters unloadable
  /// posts, but a directly requested post must surface the inconsistency.
  async fn single_post_view<S: ShareStore>(
    &self,
    store: &S,
    post_id: PostId,
  ) -> Result<PostView> {
    let post = store
      .get_post(post_id)
      .await
      .map_err(AccessError::store)?
      .ok_or(AccessError::PostNotFound(post_id))?;
    self.render_post(store, post).await
  }

  async fn render_post<S: ShareStore>(
    &self,
    store: &S,
    post: Post,
  ) -> Result<PostView> {
    let owner = store
      .get_account(post.owner_id)
      .await
      .map_err(AccessError::store)?
      .ok_or_else(|| {
        AccessError::InvalidState(format!(
          "post {} has no resolvable owner",
          post.id
        ))
      })?;

    let media = store
      .media_for_post(post.id)
      .await
      .map_err(AccessError::store)?;

    Ok(PostView {
      post_id:      post.id,
      description:  post.description,
      creator_name: owner.name,
      media_items:  media
        .into_iter()
        .map(|m| MediaView {
          id:   m.id,
          kind: m.kind,
          url:  format!("/media-items/{}/bytes", m.id),
        })
        .collect(),
      created_at:   post.created_at.to_rfc3339(),
    })
  }

  /// Everything the subject can see, deduplicated, newest first. Posts that
  /// fail to load are skipped rather than failing the whole request.
  async fn list_view<S: ShareStore>(
    &self,
    store: &S,
    subject: Subject,
  ) -> Result<Vec<PostView>> {
    let resolver = MembershipResolver::new(store);
    let post_ids = resolver.posts_visible_to(subject).await?;

    let mut posts: Vec<Post> = Vec::with_capacity(post_ids.len());
    for post_id in post_ids {
      match store.get_post(post_id).await.map_err(AccessError::store)? {
        Some(post) => posts.push(post),
        // Dangling share link; the post is gone.
        None => tracing::warn!(post_id, "skipping unresolvable shared post"),
      }
    }

    posts.sort_by(|a, b| {
      b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
    });

    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
      let post_id = post.id;
      match self.render_post(store, post).await {
        Ok(view) => views.push(view),
        Err(AccessError::InvalidState(reason)) => {
          tracing::warn!(post_id, %reason, "skipping unloadable shared post");
        }
        Err(e) => return Err(e),
      }
    }
    Ok(views)
  }
}
