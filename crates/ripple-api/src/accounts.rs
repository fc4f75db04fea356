//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/accounts` | Body: `{"name","phone_number","email"}` |
//! | `GET`  | `/accounts/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ripple_core::{
  account::{Account, AccountId, NewAccount},
  store::ShareStore,
};

use crate::{AppState, auth::Authenticated, error::ApiError};

/// `POST /accounts`
pub async fn create<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<NewAccount>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let account = state
    .store
    .add_account(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(account)))
}

/// `GET /accounts/:id`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<AccountId>,
) -> Result<Json<Account>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let account = state
    .store
    .get_account(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(account))
}
