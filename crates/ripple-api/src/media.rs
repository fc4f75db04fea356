//! Handlers for media upload and the token-gated byte endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/posts/:id/media?kind=<photo\|video>&position=<n>` | Raw body bytes |
//! | `GET`    | `/media-items/:id/bytes?token=<tok>` | Public, token-gated |
//! | `DELETE` | `/media-items/:id` | Drops the row, best-effort blob removal |
//!
//! Byte serving re-evaluates `can_view` against the owning post on every
//! request. A verified token on its own proves identity, not access.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use ripple_core::{
  media::{MediaItem, MediaItemId, MediaKind, NewMediaItem},
  post::PostId,
  store::ShareStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Upload ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  pub kind:     MediaKind,
  #[serde(default)]
  pub position: u32,
}

/// `POST /posts/:id/media`
///
/// The body is the raw blob. It lands under the configured media directory
/// with a server-generated filename; only that relative path is persisted.
pub async fn upload<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(post_id): Path<PostId>,
  Query(params): Query<UploadParams>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  if state
    .store
    .get_post(post_id)
    .await
    .map_err(ApiError::store)?
    .is_none()
  {
    return Err(ApiError::NotFound(format!("post {post_id} not found")));
  }
  if body.is_empty() {
    return Err(ApiError::BadRequest("empty media body".to_string()));
  }

  let filename = Uuid::new_v4().hyphenated().to_string();
  let dest = state.config.media_dir.join(&filename);
  tokio::fs::write(&dest, &body).await.map_err(|e| {
    ApiError::InvalidState(format!("cannot write media blob: {e}"))
  })?;

  let item = state
    .store
    .add_media_item(NewMediaItem {
      post_id,
      path: filename,
      kind: params.kind,
      position: params.position,
    })
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(item)))
}

// ─── Bytes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BytesParams {
  pub token: String,
}

/// `GET /media-items/:id/bytes`
pub async fn bytes<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<MediaItemId>,
  Query(params): Query<BytesParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let claims = state
    .authorizer
    .verify(&params.token)
    .map_err(|_| ApiError::InvalidToken)?;
  let subject = claims.subject().map_err(|_| ApiError::InvalidToken)?;

  let item: MediaItem = state
    .authorizer
    .authorize_media(state.store.as_ref(), subject, id)
    .await?;

  let path = state.config.media_dir.join(&item.path);
  let blob = tokio::fs::read(&path).await.map_err(|e| {
    // The row exists but the blob is gone: referential inconsistency.
    ApiError::InvalidState(format!("media blob {} unreadable: {e}", item.path))
  })?;

  Ok((
    [(axum::http::header::CONTENT_TYPE, "application/octet-stream")],
    Bytes::from(blob),
  ))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /media-items/:id`
pub async fn delete_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<MediaItemId>,
) -> Result<StatusCode, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let item = state
    .store
    .get_media_item(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("media item {id} not found")))?;

  state
    .store
    .delete_media_item(id)
    .await
    .map_err(ApiError::store)?;

  // Blob removal is best-effort; a stale file is harmless.
  let path = state.config.media_dir.join(&item.path);
  if let Err(e) = tokio::fs::remove_file(&path).await {
    tracing::warn!(media_item_id = id, error = %e, "could not remove media blob");
  }

  Ok(StatusCode::NO_CONTENT)
}
