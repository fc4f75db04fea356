//! Handler for the public `/view` endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/view?token=<tok>[&post_id=<id>]` | Single post or full listing |
//!
//! 401 for an invalid/expired token, 403 for a valid token pointed at a post
//! its subject may not see, 404 when the post is gone.

use axum::{
  Json,
  extract::{Query, State},
};
use ripple_access::ViewPayload;
use ripple_core::{post::PostId, store::ShareStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ViewParams {
  pub token:   String,
  pub post_id: Option<PostId>,
}

/// `GET /view`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ViewParams>,
) -> Result<Json<ViewPayload>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let payload = state
    .views
    .view_for_token(state.store.as_ref(), &params.token, params.post_id)
    .await?;
  Ok(Json(payload))
}
