//! Handlers for `/share-links` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/share-links/accounts/:subject_id/:post_id` | Account-scoped link |
//! | `GET` | `/share-links/contacts/:subject_id/:post_id` | Contact-scoped link |
//!
//! Minting validates access to the named post, but the returned token roams:
//! it grants whatever the subject's memberships grant at view time. 403 when
//! the subject may not view the post, 404 when post or subject are missing.

use axum::{
  Json,
  extract::{Path, State},
};
use ripple_access::ShareLink;
use ripple_core::{post::PostId, store::ShareStore, subject::Subject};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `GET /share-links/accounts/:subject_id/:post_id`
pub async fn account_link<S>(
  auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((subject_id, post_id)): Path<(i64, PostId)>,
) -> Result<Json<ShareLink>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  mint(auth, state, Subject::Account(subject_id), post_id).await
}

/// `GET /share-links/contacts/:subject_id/:post_id`
pub async fn contact_link<S>(
  auth: Authenticated,
  State(state): State<AppState<S>>,
  Path((subject_id, post_id)): Path<(i64, PostId)>,
) -> Result<Json<ShareLink>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  mint(auth, state, Subject::Contact(subject_id), post_id).await
}

async fn mint<S>(
  _auth: Authenticated,
  state: AppState<S>,
  subject: Subject,
  post_id: PostId,
) -> Result<Json<ShareLink>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let link = state
    .authorizer
    .issue_link(state.store.as_ref(), subject, post_id, false)
    .await?;
  Ok(Json(link))
}
