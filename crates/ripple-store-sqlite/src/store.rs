//! [`SqliteStore`] — the SQLite implementation of [`ShareStore`].

use std::path::Path;

use chrono::Utc;
use ripple_core::{
  account::{Account, AccountId, NewAccount},
  audience::{Audience, AudienceId, NewAudience},
  contact::{Contact, ContactId, NewContact},
  media::{MediaItem, MediaItemId, NewMediaItem},
  post::{NewPost, Post, PostId},
  store::ShareStore,
  subject::Subject,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawAudience, RawContact, RawMediaItem, RawMember, RawPost,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Ripple share store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ShareStore impl ─────────────────────────────────────────────────────────

impl ShareStore for SqliteStore {
  type Error = Error;

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn add_account(&self, input: NewAccount) -> Result<Account> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let NewAccount { name, phone_number, email } = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (name, phone_number, email, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![name, phone_number, email, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Account {
      id,
      name: input.name,
      phone_number: input.phone_number,
      email: input.email,
      created_at,
    })
  }

  async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT account_id, name, phone_number, email, created_at
             FROM accounts WHERE account_id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawAccount {
                account_id:   row.get(0)?,
                name:         row.get(1)?,
                phone_number: row.get(2)?,
                email:        row.get(3)?,
                created_at:   row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn add_contact(&self, input: NewContact) -> Result<Contact> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let NewContact { owner_id, name, phone_number, email } = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (owner_id, name, phone_number, email, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![owner_id, name, phone_number, email, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Contact {
      id,
      owner_id: input.owner_id,
      name: input.name,
      phone_number: input.phone_number,
      email: input.email,
      created_at,
    })
  }

  async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT contact_id, owner_id, name, phone_number, email, created_at
             FROM contacts WHERE contact_id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawContact {
                contact_id:   row.get(0)?,
                owner_id:     row.get(1)?,
                name:         row.get(2)?,
                phone_number: row.get(3)?,
                email:        row.get(4)?,
                created_at:   row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn contacts_by_owner(&self, owner_id: AccountId) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT contact_id, owner_id, name, phone_number, email, created_at
           FROM contacts WHERE owner_id = ?1 ORDER BY contact_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_id], |row| {
            Ok(RawContact {
              contact_id:   row.get(0)?,
              owner_id:     row.get(1)?,
              name:         row.get(2)?,
              phone_number: row.get(3)?,
              email:        row.get(4)?,
              created_at:   row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn delete_contact(&self, id: ContactId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM audience_members
           WHERE member_kind = 'contact' AND member_id = ?1",
          rusqlite::params![id],
        )?;
        let n = tx.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn add_post(&self, input: NewPost) -> Result<Post> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let NewPost { owner_id, description } = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (owner_id, description, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![owner_id, description, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Post {
      id,
      owner_id: input.owner_id,
      description: input.description,
      created_at,
    })
  }

  async fn get_post(&self, id: PostId) -> Result<Option<Post>> {
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT post_id, owner_id, description, created_at
             FROM posts WHERE post_id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawPost {
                post_id:     row.get(0)?,
                owner_id:    row.get(1)?,
                description: row.get(2)?,
                created_at:  row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn posts_by_owner(&self, owner_id: AccountId) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT post_id, owner_id, description, created_at
           FROM posts WHERE owner_id = ?1
           ORDER BY created_at DESC, post_id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_id], |row| {
            Ok(RawPost {
              post_id:     row.get(0)?,
              owner_id:    row.get(1)?,
              description: row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn set_post_description(
    &self,
    id: PostId,
    description: String,
  ) -> Result<bool> {
    let updated = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE posts SET description = ?2 WHERE post_id = ?1",
          rusqlite::params![id, description],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(updated)
  }

  async fn delete_post(&self, id: PostId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM media_items WHERE post_id = ?1",
          rusqlite::params![id],
        )?;
        tx.execute(
          "DELETE FROM post_shares WHERE post_id = ?1",
          rusqlite::params![id],
        )?;
        let n = tx.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Media items ───────────────────────────────────────────────────────────

  async fn add_media_item(&self, input: NewMediaItem) -> Result<MediaItem> {
    let kind_str = input.kind.discriminant().to_owned();
    let NewMediaItem { post_id, path, position, .. } = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO media_items (post_id, path, kind, position)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![post_id, path, kind_str, position as i64],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(MediaItem {
      id,
      post_id: input.post_id,
      path: input.path,
      kind: input.kind,
      position: input.position,
    })
  }

  async fn get_media_item(&self, id: MediaItemId) -> Result<Option<MediaItem>> {
    let raw: Option<RawMediaItem> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT media_item_id, post_id, path, kind, position
             FROM media_items WHERE media_item_id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawMediaItem {
                media_item_id: row.get(0)?,
                post_id:       row.get(1)?,
                path:          row.get(2)?,
                kind:          row.get(3)?,
                position:      row.get(4)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMediaItem::into_media_item).transpose()
  }

  async fn media_for_post(&self, post_id: PostId) -> Result<Vec<MediaItem>> {
    let raws: Vec<RawMediaItem> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT media_item_id, post_id, path, kind, position
           FROM media_items WHERE post_id = ?1
           ORDER BY position, media_item_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![post_id], |row| {
            Ok(RawMediaItem {
              media_item_id: row.get(0)?,
              post_id:       row.get(1)?,
              path:          row.get(2)?,
              kind:          row.get(3)?,
              position:      row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMediaItem::into_media_item).collect()
  }

  async fn delete_media_item(&self, id: MediaItemId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM media_items WHERE media_item_id = ?1",
          rusqlite::params![id],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Audiences ─────────────────────────────────────────────────────────────

  async fn add_audience(&self, input: NewAudience) -> Result<Audience> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let NewAudience { owner_id, name } = input.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO audiences (owner_id, name, created_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![owner_id, name, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Audience {
      id,
      owner_id: input.owner_id,
      name: input.name,
      created_at,
    })
  }

  async fn get_audience(&self, id: AudienceId) -> Result<Option<Audience>> {
    let raw: Option<RawAudience> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT audience_id, owner_id, name, created_at
             FROM audiences WHERE audience_id = ?1",
            rusqlite::params![id],
            |row| {
              Ok(RawAudience {
                audience_id: row.get(0)?,
                owner_id:    row.get(1)?,
                name:        row.get(2)?,
                created_at:  row.get(3)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAudience::into_audience).transpose()
  }

  async fn audiences_by_owner(&self, owner_id: AccountId) -> Result<Vec<Audience>> {
    let raws: Vec<RawAudience> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT audience_id, owner_id, name, created_at
           FROM audiences WHERE owner_id = ?1 ORDER BY audience_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_id], |row| {
            Ok(RawAudience {
              audience_id: row.get(0)?,
              owner_id:    row.get(1)?,
              name:        row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAudience::into_audience).collect()
  }

  async fn rename_audience(&self, id: AudienceId, name: String) -> Result<bool> {
    let renamed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE audiences SET name = ?2 WHERE audience_id = ?1",
          rusqlite::params![id, name],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(renamed)
  }

  async fn delete_audience(&self, id: AudienceId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM audience_members WHERE audience_id = ?1",
          rusqlite::params![id],
        )?;
        tx.execute(
          "DELETE FROM post_shares WHERE audience_id = ?1",
          rusqlite::params![id],
        )?;
        let n = tx.execute(
          "DELETE FROM audiences WHERE audience_id = ?1",
          rusqlite::params![id],
        )?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Membership links ──────────────────────────────────────────────────────

  async fn add_members(
    &self,
    audience_id: AudienceId,
    members: Vec<Subject>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for member in &members {
          tx.execute(
            "INSERT OR IGNORE INTO audience_members
               (audience_id, member_kind, member_id)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![
              audience_id,
              member.kind().discriminant(),
              member.raw_id()
            ],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn replace_members(
    &self,
    audience_id: AudienceId,
    members: Vec<Subject>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM audience_members WHERE audience_id = ?1",
          rusqlite::params![audience_id],
        )?;
        for member in &members {
          tx.execute(
            "INSERT OR IGNORE INTO audience_members
               (audience_id, member_kind, member_id)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![
              audience_id,
              member.kind().discriminant(),
              member.raw_id()
            ],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_member(
    &self,
    audience_id: AudienceId,
    member: Subject,
  ) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM audience_members
           WHERE audience_id = ?1 AND member_kind = ?2 AND member_id = ?3",
          rusqlite::params![
            audience_id,
            member.kind().discriminant(),
            member.raw_id()
          ],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  async fn member_subjects(&self, audience_id: AudienceId) -> Result<Vec<Subject>> {
    let raws: Vec<RawMember> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT member_kind, member_id FROM audience_members
           WHERE audience_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![audience_id], |row| {
            Ok(RawMember {
              member_kind: row.get(0)?,
              member_id:   row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMember::into_subject).collect()
  }

  async fn audience_ids_containing(
    &self,
    subject: Subject,
  ) -> Result<Vec<AudienceId>> {
    let kind = subject.kind().discriminant();
    let id = subject.raw_id();

    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT audience_id FROM audience_members
           WHERE member_kind = ?1 AND member_id = ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![kind, id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }

  // ── Share links ───────────────────────────────────────────────────────────

  async fn replace_shares(
    &self,
    post_id: PostId,
    audience_ids: Vec<AudienceId>,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM post_shares WHERE post_id = ?1",
          rusqlite::params![post_id],
        )?;
        for audience_id in &audience_ids {
          tx.execute(
            "INSERT OR IGNORE INTO post_shares (post_id, audience_id)
             VALUES (?1, ?2)",
            rusqlite::params![post_id, audience_id],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn audience_ids_for_post(&self, post_id: PostId) -> Result<Vec<AudienceId>> {
    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT audience_id FROM post_shares WHERE post_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![post_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }

  async fn post_ids_shared_to(&self, audience_id: AudienceId) -> Result<Vec<PostId>> {
    let ids = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT post_id FROM post_shares WHERE audience_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![audience_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids)
  }
}
