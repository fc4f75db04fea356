//! Handlers for `/audiences` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/audiences?owner_id=<id>` | An owner's audiences |
//! | `POST`   | `/audiences` | Body: `{"owner_id","name","members"?}` |
//! | `GET`    | `/audiences/:id` | Audience plus member subjects |
//! | `PUT`    | `/audiences/:id` | Rename and/or replace members |
//! | `DELETE` | `/audiences/:id` | Cascades membership and share links |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use ripple_core::{
  account::AccountId,
  audience::{Audience, AudienceId, NewAudience},
  store::ShareStore,
  subject::Subject,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError};

// ─── Member validation ───────────────────────────────────────────────────────

/// Contact members must be owned by the audience's owner; account members
/// must at least exist. Violations are rejected before any link is written.
async fn validate_members<S>(
  state: &AppState<S>,
  owner_id: AccountId,
  members: &[Subject],
) -> Result<(), ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  for member in members {
    match *member {
      Subject::Contact(id) => {
        let contact = state
          .store
          .get_contact(id)
          .await
          .map_err(ApiError::store)?
          .ok_or_else(|| {
            ApiError::BadRequest(format!("contact {id} not found"))
          })?;
        if contact.owner_id != owner_id {
          return Err(ApiError::BadRequest(format!(
            "contact {id} does not belong to account {owner_id}"
          )));
        }
      }
      Subject::Account(id) => {
        if state
          .store
          .get_account(id)
          .await
          .map_err(ApiError::store)?
          .is_none()
        {
          return Err(ApiError::BadRequest(format!(
            "account {id} not found"
          )));
        }
      }
    }
  }
  Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner_id: AccountId,
}

/// `GET /audiences?owner_id=<id>`
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Audience>>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let audiences = state
    .store
    .audiences_by_owner(params.owner_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(audiences))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub owner_id: AccountId,
  pub name:     String,
  #[serde(default)]
  pub members:  Vec<Subject>,
}

/// `POST /audiences`
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
  validate_members(&state, body.owner_id, &body.members).await?;

  let audience = state
    .store
    .add_audience(NewAudience {
      owner_id: body.owner_id,
      name:     body.name,
    })
    .await
    .map_err(ApiError::store)?;
  state
    .store
    .add_members(audience.id, body.members)
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(audience)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AudienceWithMembers {
  #[serde(flatten)]
  pub audience: Audience,
  pub members:  Vec<Subject>,
}

/// `GET /audiences/:id`
pub async fn get_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<AudienceId>,
) -> Result<Json<AudienceWithMembers>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let audience = state
    .store
    .get_audience(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("audience {id} not found")))?;
  let members = state
    .store
    .member_subjects(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(AudienceWithMembers { audience, members }))
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:    Option<String>,
  /// `None` leaves membership untouched; `Some` replaces the full set.
  pub members: Option<Vec<Subject>>,
}

/// `PUT /audiences/:id`
pub async fn update_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<AudienceId>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<AudienceWithMembers>, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let audience = state
    .store
    .get_audience(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("audience {id} not found")))?;

  if let Some(members) = &body.members {
    validate_members(&state, audience.owner_id, members).await?;
  }

  if let Some(name) = body.name {
    state
      .store
      .rename_audience(id, name)
      .await
      .map_err(ApiError::store)?;
  }
  if let Some(members) = body.members {
    state
      .store
      .replace_members(id, members)
      .await
      .map_err(ApiError::store)?;
  }

  get_one(_auth, State(state), Path(id)).await
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /audiences/:id`
pub async fn delete_one<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Path(id): Path<AudienceId>,
) -> Result<StatusCode, ApiError>
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  let deleted = state
    .store
    .delete_audience(id)
    .await
    .map_err(ApiError::store)?;
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("audience {id} not found")))
  }
}
