//! Handlers for `/posts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/posts?owner_id=<id>` | An owner's posts, newest first |
//! | `POST`   | `/posts` | Creates, shares, and fans out SMS notifications |
//! | `GET`    | `/posts/:id` | Post plus audiences and media |
//! | `PUT`    | `/posts/:id` | Update description and/or share set |
//! | `DELETE` | `/posts/:id` | Cascades media items and share links |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ripple_core::{
  account::AccountId,
  audience::{Audience, AudienceId},
  media::MediaItem,
  post::{NewPost, Post, PostId},
  store::ShareStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Share validation ────────────────────────────────────────────────────────

/// A post's shares may only reference audiences owned by the post's owner.
async fn validate_shares<S>(
  state: &AppState<S>,
  owner_id: AccountId,
  audience_ids: &[AudienceId],
) -> Result<(), ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  for &audience_id in audience_ids {
    let audience = state
      .store
      .get_audience(audience_id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        ApiError::BadRequest(format!("audience {audience_id} not found"))
      })?;
    if audience.owner_id != owner_id {
      return Err(ApiError::BadRequest(format!(
        "audience {audience_id} does not belong to account {owner_id}"
      )));
    }
  }
  Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner_id: AccountId,
}

/// `GET /posts?owner_id=<id>`
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let posts = state
    .store
    .posts_by_owner(params.owner_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(posts))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub owner_id:     AccountId,
  pub description:  String,
  #[serde(default)]
  pub audience_ids: Vec<AudienceId>,
}

/// `POST /posts`
///
/// Sharing and notification happen here too: the post is linked to the given
/// audiences and their contact members are texted. Delivery failures are
/// logged by the notifier and never fail the request.
pub async fn create<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  if state
    .store
    .get_account(body.owner_id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "account {} not found",
      body.owner_id
    )));
  }
  validate_shares(&state, body.owner_id, &body.audience_ids).await?;

  let post = state
    .store
    .add_post(NewPost {
      owner_id:    body.owner_id,
      description: body.description,
    })
    .await
    .map_err(ApiError::store)?;

  if !body.audience_ids.is_empty() {
    state
      .store
      .replace_shares(post.id, body.audience_ids.clone())
      .await
      .map_err(ApiError::store)?;
    state
      .notifier
      .notify_audiences(
        state.store.as_ref(),
        state.sms.as_ref(),
        post.id,
        &body.audience_ids,
      )
      .await;
  }

  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PostWithDetails {
  #[serde(flatten)]
  pub post:        Post,
  pub audiences:   Vec<Audience>,
  pub media_items: Vec<MediaItem>,
}

/// `GET /posts/:id`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<PostId>,
) -> Result<Json<PostWithDetails>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;

  let mut audiences = Vec::new();
  for audience_id in state
    .store
    .audience_ids_for_post(id)
    .await
    .map_err(ApiError::store)?
  {
    if let Some(audience) = state
      .store
      .get_audience(audience_id)
      .await
      .map_err(ApiError::store)?
    {
      audiences.push(audience);
    }
  }

  let media_items = state
    .store
    .media_for_post(id)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(PostWithDetails { post, audiences, media_items }))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub description:  Option<String>,
  /// `None` leaves shares untouched; `Some` replaces the full set.
  pub audience_ids: Option<Vec<AudienceId>>,
}

/// `PUT /posts/:id`
pub async fn update_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<PostId>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<PostWithDetails>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;

  if let Some(audience_ids) = &body.audience_ids {
    validate_shares(&state, post.owner_id, audience_ids).await?;
  }

  if let Some(description) = body.description {
    state
      .store
      .set_post_description(id, description)
      .await
      .map_err(ApiError::store)?;
  }
  if let Some(audience_ids) = body.audience_ids {
    state
      .store
      .replace_shares(id, audience_ids)
      .await
      .map_err(ApiError::store)?;
  }

  get_one(_auth, State(state), Path(id)).await
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /posts/:id`
pub async fn delete_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<PostId>,
) -> Result<StatusCode, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_post(id)
    .await
    .map_err(ApiError::store)?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("post {id} not found")))
  }
}
