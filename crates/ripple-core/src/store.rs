//! The `ShareStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `ripple-store-sqlite`).
//! Higher layers (`ripple-access`, `ripple-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  account::{Account, AccountId, NewAccount},
  audience::{Audience, AudienceId, NewAudience},
  contact::{Contact, ContactId, NewContact},
  media::{MediaItem, MediaItemId, NewMediaItem},
  post::{NewPost, Post, PostId},
  subject::Subject,
};

/// Abstraction over a Ripple storage backend.
///
/// Entity rows, membership links (`audience ↔ subject`), and share links
/// (`post ↔ audience`) all live behind this trait. Multi-row replacements
/// (`replace_members`, `replace_shares`) and cascading deletes must be
/// atomic: no concurrent reader may observe a half-applied link set.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ShareStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create and persist a new account. `created_at` is set by the store.
  fn add_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    id: AccountId,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + '_;

  // ── Contacts ──────────────────────────────────────────────────────────

  fn add_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn contacts_by_owner(
    &self,
    owner_id: AccountId,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Delete a contact and its membership links. Returns `false` if the
  /// contact did not exist.
  fn delete_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  fn add_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// List an account's own posts, most recent first.
  fn posts_by_owner(
    &self,
    owner_id: AccountId,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Replace a post's description. Returns `false` if the post is missing.
  fn set_post_description(
    &self,
    id: PostId,
    description: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a post, cascading to its media items and share links, in one
  /// transaction. Returns `false` if the post did not exist.
  fn delete_post(
    &self,
    id: PostId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Media items ───────────────────────────────────────────────────────

  fn add_media_item(
    &self,
    input: NewMediaItem,
  ) -> impl Future<Output = Result<MediaItem, Self::Error>> + Send + '_;

  fn get_media_item(
    &self,
    id: MediaItemId,
  ) -> impl Future<Output = Result<Option<MediaItem>, Self::Error>> + Send + '_;

  /// All media items of a post, ordered by `position` ascending.
  fn media_for_post(
    &self,
    post_id: PostId,
  ) -> impl Future<Output = Result<Vec<MediaItem>, Self::Error>> + Send + '_;

  fn delete_media_item(
    &self,
    id: MediaItemId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Audiences ─────────────────────────────────────────────────────────

  fn add_audience(
    &self,
    input: NewAudience,
  ) -> impl Future<Output = Result<Audience, Self::Error>> + Send + '_;

  fn get_audience(
    &self,
    id: AudienceId,
  ) -> impl Future<Output = Result<Option<Audience>, Self::Error>> + Send + '_;

  fn audiences_by_owner(
    &self,
    owner_id: AccountId,
  ) -> impl Future<Output = Result<Vec<Audience>, Self::Error>> + Send + '_;

  /// Rename an audience. Returns `false` if the audience is missing.
  fn rename_audience(
    &self,
    id: AudienceId,
    name: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete an audience, cascading to its membership and share links, in
  /// one transaction. Returns `false` if the audience did not exist.
  fn delete_audience(
    &self,
    id: AudienceId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Membership links ──────────────────────────────────────────────────

  /// Add subjects to an audience. Re-adding an existing member is a no-op.
  fn add_members(
    &self,
    audience_id: AudienceId,
    members: Vec<Subject>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Atomically replace the full member set of an audience.
  fn replace_members(
    &self,
    audience_id: AudienceId,
    members: Vec<Subject>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove one subject from an audience. Returns `false` if the link did
  /// not exist.
  fn remove_member(
    &self,
    audience_id: AudienceId,
    member: Subject,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Direct membership lookup. Unknown audiences yield an empty list.
  fn member_subjects(
    &self,
    audience_id: AudienceId,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Inverse membership lookup: every audience the subject is a member of.
  fn audience_ids_containing(
    &self,
    subject: Subject,
  ) -> impl Future<Output = Result<Vec<AudienceId>, Self::Error>> + Send + '_;

  // ── Share links ───────────────────────────────────────────────────────

  /// Atomically replace the set of audiences a post is shared to.
  fn replace_shares(
    &self,
    post_id: PostId,
    audience_ids: Vec<AudienceId>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All audiences a post was shared to. Unknown posts yield an empty list.
  fn audience_ids_for_post(
    &self,
    post_id: PostId,
  ) -> impl Future<Output = Result<Vec<AudienceId>, Self::Error>> + Send + '_;

  /// Reverse index: every post shared to the audience.
  fn post_ids_shared_to(
    &self,
    audience_id: AudienceId,
  ) -> impl Future<Output = Result<Vec<PostId>, Self::Error>> + Send + '_;
}
