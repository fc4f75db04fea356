//! Handlers for `/contacts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/contacts?owner_id=<id>` | An owner's contacts |
//! | `POST`   | `/contacts` | Body: `{"owner_id","name","phone_number","email"?}` |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `DELETE` | `/contacts/:id` | Also drops the contact's memberships |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ripple_core::{
  account::AccountId,
  contact::{Contact, ContactId, NewContact},
  store::ShareStore,
};
use serde::Deserialize;

use crate::{AppState, auth::Authenticated, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner_id: AccountId,
}

/// `GET /contacts?owner_id=<id>`
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let contacts = state
    .store
    .contacts_by_owner(params.owner_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contacts))
}

/// `POST /contacts`
pub async fn create<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<NewContact>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let owner = state
    .store
    .get_account(body.owner_id)
    .await
    .map_err(ApiError::store)?;
  if owner.is_none() {
    return Err(ApiError::NotFound(format!(
      "account {} not found",
      body.owner_id
    )));
  }

  let contact = state
    .store
    .add_contact(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contact)))
}

/// `GET /contacts/:id`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
) -> Result<Json<Contact>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(contact))
}

/// `DELETE /contacts/:id`
pub async fn delete_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<ContactId>,
) -> Result<StatusCode, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_contact(id)
    .await
    .map_err(ApiError::store)?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("contact {id} not found")))
  }
}
