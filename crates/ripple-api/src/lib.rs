//! JSON REST API for Ripple.
//!
//! Exposes an axum [`Router`] backed by any [`ShareStore`]. Two surfaces
//! share it: the owner surface (accounts, contacts, audiences, posts, media
//! management, link minting) behind HTTP Basic auth, and the public share
//! surface (`/view`, media bytes) gated by bearer tokens.

pub mod accounts;
pub mod audiences;
pub mod auth;
pub mod contacts;
pub mod error;
pub mod links;
pub mod media;
pub mod posts;
pub mod view;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use chrono::Duration;
use ripple_access::{Authorizer, LoggingSms, Notifier, ViewService};
use ripple_core::store::ShareStore;
use ripple_token::{TokenCodec, TokenError};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_token_ttl_days() -> i64 { ripple_token::DEFAULT_TTL_DAYS }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// Base URL share links point at, e.g. `https://app.example.com/view`.
  pub frontend_url:       String,
  pub store_path:         PathBuf,
  pub media_dir:          PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  pub token_secret:       String,
  #[serde(default = "default_token_ttl_days")]
  pub token_ttl_days:     i64,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub config:     Arc<ServerConfig>,
  pub auth:       Arc<AuthConfig>,
  pub authorizer: Authorizer,
  pub views:      ViewService,
  pub notifier:   Notifier,
  pub sms:        Arc<LoggingSms>,
}

impl<S: ShareStore> AppState<S> {
  /// Wire the access components from configuration. Fails only on a
  /// misconfigured (empty) token secret.
  pub fn new(
    store: Arc<S>,
    config: Arc<ServerConfig>,
    auth: Arc<AuthConfig>,
  ) -> Result<Self, TokenError> {
    let codec = TokenCodec::new(config.token_secret.as_bytes().to_vec())?;
    let authorizer = Authorizer::new(
      codec,
      config.frontend_url.clone(),
      Duration::days(config.token_ttl_days),
    );
    Ok(Self {
      views: ViewService::new(authorizer.clone()),
      notifier: Notifier::new(authorizer.clone()),
      authorizer,
      store,
      config,
      auth,
      sms: Arc::new(LoggingSms),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the Ripple server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ShareStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Owner surface (Basic auth via the `Authenticated` extractor).
    .route("/accounts",        post(accounts::create::<S>))
    .route("/accounts/{id}",   get(accounts::get_one::<S>))
    .route("/contacts",        get(contacts::list::<S>).post(contacts::create::<S>))
    .route("/contacts/{id}",   get(contacts::get_one::<S>).delete(contacts::delete_one::<S>))
    .route("/audiences",       get(audiences::list::<S>).post(audiences::create::<S>))
    .route(
      "/audiences/{id}",
      get(audiences::get_one::<S>)
        .put(audiences::update_one::<S>)
        .delete(audiences::delete_one::<S>),
    )
    .route("/posts",           get(posts::list::<S>).post(posts::create::<S>))
    .route(
      "/posts/{id}",
      get(posts::get_one::<S>)
        .put(posts::update_one::<S>)
        .delete(posts::delete_one::<S>),
    )
    .route("/posts/{id}/media", post(media::upload::<S>))
    .route("/media-items/{id}", delete(media::delete_one::<S>))
    .route("/share-links/accounts/{subject_id}/{post_id}", get(links::account_link::<S>))
    .route("/share-links/contacts/{subject_id}/{post_id}", get(links::contact_link::<S>))
    // Public share surface (token-gated inside the handlers).
    .route("/view",                   get(view::handler::<S>))
    .route("/media-items/{id}/bytes", get(media::bytes::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use rand_core::OsRng;
  use ripple_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    let media_dir =
      std::env::temp_dir().join(format!("ripple-test-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&media_dir).unwrap();

    let config = ServerConfig {
      host:               "127.0.0.1".to_string(),
      port:               8080,
      frontend_url:       "https://app.example.com/view".to_string(),
      store_path:         PathBuf::from(":memory:"),
      media_dir,
      auth_username:      "operator".to_string(),
      auth_password_hash: hash.clone(),
      token_secret:       "integration-test-secret".to_string(),
      token_ttl_days:     30,
    };

    AppState::new(
      Arc::new(store),
      Arc::new(config),
      Arc::new(AuthConfig {
        username:      "operator".to_string(),
        password_hash: hash,
      }),
    )
    .unwrap()
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn request(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    auth:    Option<&str>,
    body:    Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp = router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
  }

  /// Create account + contact + audience (with the contact as member) and a
  /// post shared to that audience. Returns (account, contact, audience,
  /// post) ids.
  async fn seed_graph(
    state: &AppState<SqliteStore>,
    auth:  &str,
  ) -> (i64, i64, i64, i64) {
    let (status, account) = request(
      state.clone(),
      "POST",
      "/accounts",
      Some(auth),
      Some(json!({
        "name": "alice",
        "phone_number": "+15550100",
        "email": "alice@example.com"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let account_id = account["id"].as_i64().unwrap();

    let (status, contact) = request(
      state.clone(),
      "POST",
      "/contacts",
      Some(auth),
      Some(json!({
        "owner_id": account_id,
        "name": "carol",
        "phone_number": "+15550101"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let contact_id = contact["id"].as_i64().unwrap();

    let (status, audience) = request(
      state.clone(),
      "POST",
      "/audiences",
      Some(auth),
      Some(json!({
        "owner_id": account_id,
        "name": "family",
        "members": [{"kind": "contact", "id": contact_id}]
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let audience_id = audience["id"].as_i64().unwrap();

    let (status, post) = request(
      state.clone(),
      "POST",
      "/posts",
      Some(auth),
      Some(json!({
        "owner_id": account_id,
        "description": "holiday pictures",
        "audience_ids": [audience_id]
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = post["id"].as_i64().unwrap();

    (account_id, contact_id, audience_id, post_id)
  }

  // ── Basic auth ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn owner_surface_requires_basic_auth() {
    let state = make_state("secret").await;
    let req = Request::builder()
      .method("GET")
      .uri("/posts?owner_id=1")
      .body(Body::empty())
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn wrong_password_is_rejected() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "wrong");
    let (status, _) =
      request(state, "GET", "/posts?owner_id=1", Some(&auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Link minting ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn contact_link_mints_token_and_url() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (_, contact_id, _, post_id) = seed_graph(&state, &auth).await;

    let (status, link) = request(
      state,
      "GET",
      &format!("/share-links/contacts/{contact_id}/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = link["token"].as_str().unwrap();
    assert_eq!(
      link["url"].as_str().unwrap(),
      format!("https://app.example.com/view?token={token}")
    );
  }

  #[tokio::test]
  async fn link_for_non_member_is_forbidden_and_mints_nothing() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (account_id, _, _, post_id) = seed_graph(&state, &auth).await;

    // A second contact outside the audience.
    let (_, outsider) = request(
      state.clone(),
      "POST",
      "/contacts",
      Some(&auth),
      Some(json!({
        "owner_id": account_id,
        "name": "mallory",
        "phone_number": "+15550102"
      })),
    )
    .await;
    let outsider_id = outsider["id"].as_i64().unwrap();

    let (status, body) = request(
      state,
      "GET",
      &format!("/share-links/contacts/{outsider_id}/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["token"].is_null());
  }

  #[tokio::test]
  async fn link_for_missing_post_is_not_found() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (_, contact_id, _, _) = seed_graph(&state, &auth).await;

    let (status, _) = request(
      state,
      "GET",
      &format!("/share-links/contacts/{contact_id}/999"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── View endpoint ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn view_with_garbage_token_is_unauthorized() {
    let state = make_state("secret").await;
    let (status, _) =
      request(state, "GET", "/view?token=garbage", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn view_lists_accessible_posts() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (_, contact_id, _, post_id) = seed_graph(&state, &auth).await;

    let (_, link) = request(
      state.clone(),
      "GET",
      &format!("/share-links/contacts/{contact_id}/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    let token = link["token"].as_str().unwrap();

    let (status, body) = request(
      state,
      "GET",
      &format!("/view?token={token}"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["post_id"].as_i64().unwrap(), post_id);
    assert_eq!(posts[0]["creator_name"].as_str().unwrap(), "alice");
  }

  #[tokio::test]
  async fn pinned_view_of_foreign_post_is_forbidden() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (account_id, contact_id, _, post_id) = seed_graph(&state, &auth).await;

    // An unshared post by the same owner.
    let (_, private_post) = request(
      state.clone(),
      "POST",
      "/posts",
      Some(&auth),
      Some(json!({ "owner_id": account_id, "description": "private" })),
    )
    .await;
    let private_id = private_post["id"].as_i64().unwrap();

    let (_, link) = request(
      state.clone(),
      "GET",
      &format!("/share-links/contacts/{contact_id}/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    let token = link["token"].as_str().unwrap();

    let (status, _) = request(
      state,
      "GET",
      &format!("/view?token={token}&post_id={private_id}"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  // ── Media bytes ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn media_bytes_are_served_only_to_authorized_tokens() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (account_id, contact_id, _, post_id) = seed_graph(&state, &auth).await;

    // Upload a blob onto the shared post.
    let upload_req = Request::builder()
      .method("POST")
      .uri(format!("/posts/{post_id}/media?kind=photo&position=0"))
      .header(header::AUTHORIZATION, &auth)
      .body(Body::from("fake-jpeg-bytes"))
      .unwrap();
    let upload_resp = router(state.clone()).oneshot(upload_req).await.unwrap();
    assert_eq!(upload_resp.status(), StatusCode::CREATED);
    let upload_body =
      axum::body::to_bytes(upload_resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let item: Value = serde_json::from_slice(&upload_body).unwrap();
    let media_id = item["id"].as_i64().unwrap();

    let (_, link) = request(
      state.clone(),
      "GET",
      &format!("/share-links/contacts/{contact_id}/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    let token = link["token"].as_str().unwrap().to_string();

    // The audience member gets the bytes.
    let bytes_req = Request::builder()
      .method("GET")
      .uri(format!("/media-items/{media_id}/bytes?token={token}"))
      .body(Body::empty())
      .unwrap();
    let bytes_resp = router(state.clone()).oneshot(bytes_req).await.unwrap();
    assert_eq!(bytes_resp.status(), StatusCode::OK);
    let blob = axum::body::to_bytes(bytes_resp.into_body(), usize::MAX)
      .await
      .unwrap();
    assert_eq!(&blob[..], b"fake-jpeg-bytes");

    // An outsider's valid token is refused at the byte endpoint: access is
    // re-derived from membership on every request, not from possession.
    let (_, outsider) = request(
      state.clone(),
      "POST",
      "/contacts",
      Some(&auth),
      Some(json!({
        "owner_id": account_id,
        "name": "mallory",
        "phone_number": "+15550102"
      })),
    )
    .await;
    let outsider_id = outsider["id"].as_i64().unwrap();
    let outsider_subject =
      ripple_core::subject::Subject::Contact(outsider_id);
    let outsider_token = TokenCodec::new("integration-test-secret")
      .unwrap()
      .issue(outsider_subject, Duration::days(1))
      .unwrap();

    let denied_req = Request::builder()
      .method("GET")
      .uri(format!("/media-items/{media_id}/bytes?token={outsider_token}"))
      .body(Body::empty())
      .unwrap();
    let denied_resp = router(state).oneshot(denied_req).await.unwrap();
    assert_eq!(denied_resp.status(), StatusCode::FORBIDDEN);
  }

  // ── CRUD validation ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn sharing_to_a_foreign_audience_is_rejected() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (_, _, audience_id, _) = seed_graph(&state, &auth).await;

    // A second account trying to share into alice's audience.
    let (_, bob) = request(
      state.clone(),
      "POST",
      "/accounts",
      Some(&auth),
      Some(json!({
        "name": "bob",
        "phone_number": "+15550103",
        "email": "bob@example.com"
      })),
    )
    .await;
    let bob_id = bob["id"].as_i64().unwrap();

    let (status, _) = request(
      state,
      "POST",
      "/posts",
      Some(&auth),
      Some(json!({
        "owner_id": bob_id,
        "description": "sneaky",
        "audience_ids": [audience_id]
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn audience_update_replaces_members_and_revokes_access() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (_, contact_id, audience_id, post_id) = seed_graph(&state, &auth).await;

    let (_, link) = request(
      state.clone(),
      "GET",
      &format!("/share-links/contacts/{contact_id}/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    let token = link["token"].as_str().unwrap().to_string();

    // Empty out the audience.
    let (status, updated) = request(
      state.clone(),
      "PUT",
      &format!("/audiences/{audience_id}"),
      Some(&auth),
      Some(json!({ "members": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["members"].as_array().unwrap().len(), 0);

    // The still-valid token now sees nothing: capability is re-evaluated
    // per request.
    let (status, body) = request(
      state,
      "GET",
      &format!("/view?token={token}"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["posts"].as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn deleting_a_post_cascades_and_404s() {
    let state = make_state("secret").await;
    let auth  = auth_header("operator", "secret");
    let (_, _, _, post_id) = seed_graph(&state, &auth).await;

    let (status, _) = request(
      state.clone(),
      "DELETE",
      &format!("/posts/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
      state,
      "GET",
      &format!("/posts/{post_id}"),
      Some(&auth),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
