//! Integration tests for `SqliteStore` against an in-memory database.

use ripple_core::{
  account::{Account, NewAccount},
  audience::{Audience, NewAudience},
  contact::{Contact, NewContact},
  media::{MediaKind, NewMediaItem},
  post::{NewPost, Post},
  store::ShareStore,
  subject::Subject,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn account(s: &SqliteStore, name: &str) -> Account {
  s.add_account(NewAccount {
    name:         name.to_string(),
    phone_number: "+15550100".to_string(),
    email:        format!("{name}@example.com"),
  })
  .await
  .unwrap()
}

async fn contact(s: &SqliteStore, owner: &Account, name: &str) -> Contact {
  s.add_contact(NewContact {
    owner_id:     owner.id,
    name:         name.to_string(),
    phone_number: "+15550101".to_string(),
    email:        None,
  })
  .await
  .unwrap()
}

async fn post(s: &SqliteStore, owner: &Account, description: &str) -> Post {
  s.add_post(NewPost {
    owner_id:    owner.id,
    description: description.to_string(),
  })
  .await
  .unwrap()
}

async fn audience(s: &SqliteStore, owner: &Account, name: &str) -> Audience {
  s.add_audience(NewAudience {
    owner_id: owner.id,
    name:     name.to_string(),
  })
  .await
  .unwrap()
}

// ─── Accounts & contacts ─────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_account() {
  let s = store().await;
  let a = account(&s, "alice").await;

  let fetched = s.get_account(a.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, a.id);
  assert_eq!(fetched.name, "alice");
  assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_account_missing_returns_none() {
  let s = store().await;
  assert!(s.get_account(999).await.unwrap().is_none());
}

#[tokio::test]
async fn contacts_scoped_by_owner() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let bob = account(&s, "bob").await;
  contact(&s, &alice, "carol").await;
  contact(&s, &alice, "dave").await;
  contact(&s, &bob, "erin").await;

  let alices = s.contacts_by_owner(alice.id).await.unwrap();
  assert_eq!(alices.len(), 2);
  assert!(alices.iter().all(|c| c.owner_id == alice.id));
}

#[tokio::test]
async fn delete_contact_removes_membership_links() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let carol = contact(&s, &alice, "carol").await;
  let aud = audience(&s, &alice, "family").await;
  s.add_members(aud.id, vec![Subject::Contact(carol.id)])
    .await
    .unwrap();

  assert!(s.delete_contact(carol.id).await.unwrap());
  assert!(s.get_contact(carol.id).await.unwrap().is_none());
  assert!(s.member_subjects(aud.id).await.unwrap().is_empty());
}

// ─── Posts & media ───────────────────────────────────────────────────────────

#[tokio::test]
async fn posts_by_owner_most_recent_first() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let first = post(&s, &alice, "first").await;
  let second = post(&s, &alice, "second").await;

  let posts = s.posts_by_owner(alice.id).await.unwrap();
  assert_eq!(posts.len(), 2);
  // Identical timestamps fall back to id order, newest insert first.
  assert_eq!(posts[0].id, second.id);
  assert_eq!(posts[1].id, first.id);
}

#[tokio::test]
async fn set_post_description() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let p = post(&s, &alice, "before").await;

  assert!(
    s.set_post_description(p.id, "after".to_string())
      .await
      .unwrap()
  );
  let fetched = s.get_post(p.id).await.unwrap().unwrap();
  assert_eq!(fetched.description, "after");

  assert!(
    !s.set_post_description(999, "nope".to_string()).await.unwrap()
  );
}

#[tokio::test]
async fn media_ordered_by_position() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let p = post(&s, &alice, "holiday").await;

  for (path, kind, position) in [
    ("b.mp4", MediaKind::Video, 1),
    ("a.jpg", MediaKind::Photo, 0),
    ("c.jpg", MediaKind::Photo, 2),
  ] {
    s.add_media_item(NewMediaItem {
      post_id: p.id,
      path: path.to_string(),
      kind,
      position,
    })
    .await
    .unwrap();
  }

  let media = s.media_for_post(p.id).await.unwrap();
  let paths: Vec<&str> = media.iter().map(|m| m.path.as_str()).collect();
  assert_eq!(paths, vec!["a.jpg", "b.mp4", "c.jpg"]);
  assert_eq!(media[0].kind, MediaKind::Photo);
}

#[tokio::test]
async fn delete_post_cascades_to_media_and_shares() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let p = post(&s, &alice, "holiday").await;
  let aud = audience(&s, &alice, "family").await;
  let m = s
    .add_media_item(NewMediaItem {
      post_id:  p.id,
      path:     "a.jpg".to_string(),
      kind:     MediaKind::Photo,
      position: 0,
    })
    .await
    .unwrap();
  s.replace_shares(p.id, vec![aud.id]).await.unwrap();

  assert!(s.delete_post(p.id).await.unwrap());
  assert!(s.get_post(p.id).await.unwrap().is_none());
  assert!(s.get_media_item(m.id).await.unwrap().is_none());
  assert!(s.post_ids_shared_to(aud.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_post_returns_false() {
  let s = store().await;
  assert!(!s.delete_post(999).await.unwrap());
}

// ─── Membership links ────────────────────────────────────────────────────────

#[tokio::test]
async fn add_members_is_idempotent() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let carol = contact(&s, &alice, "carol").await;
  let aud = audience(&s, &alice, "family").await;

  let member = Subject::Contact(carol.id);
  s.add_members(aud.id, vec![member, member]).await.unwrap();
  s.add_members(aud.id, vec![member]).await.unwrap();

  assert_eq!(s.member_subjects(aud.id).await.unwrap(), vec![member]);
}

#[tokio::test]
async fn membership_distinguishes_subject_kinds() {
  // An account and a contact with the same raw id are different members.
  let s = store().await;
  let alice = account(&s, "alice").await;
  let aud = audience(&s, &alice, "mixed").await;

  let raw_id = 1;
  s.add_members(
    aud.id,
    vec![Subject::Account(raw_id), Subject::Contact(raw_id)],
  )
  .await
  .unwrap();

  assert_eq!(s.member_subjects(aud.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn replace_members_swaps_the_full_set() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let carol = contact(&s, &alice, "carol").await;
  let dave = contact(&s, &alice, "dave").await;
  let aud = audience(&s, &alice, "family").await;

  s.add_members(aud.id, vec![Subject::Contact(carol.id)])
    .await
    .unwrap();
  s.replace_members(aud.id, vec![Subject::Contact(dave.id)])
    .await
    .unwrap();

  assert_eq!(
    s.member_subjects(aud.id).await.unwrap(),
    vec![Subject::Contact(dave.id)]
  );
}

#[tokio::test]
async fn remove_member_and_inverse_lookup() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let carol = contact(&s, &alice, "carol").await;
  let family = audience(&s, &alice, "family").await;
  let friends = audience(&s, &alice, "friends").await;

  let member = Subject::Contact(carol.id);
  s.add_members(family.id, vec![member]).await.unwrap();
  s.add_members(friends.id, vec![member]).await.unwrap();

  let mut ids = s.audience_ids_containing(member).await.unwrap();
  ids.sort();
  assert_eq!(ids, vec![family.id, friends.id]);

  assert!(s.remove_member(family.id, member).await.unwrap());
  assert!(!s.remove_member(family.id, member).await.unwrap());
  assert_eq!(
    s.audience_ids_containing(member).await.unwrap(),
    vec![friends.id]
  );
}

// ─── Share links ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_shares_and_reverse_index() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let p1 = post(&s, &alice, "one").await;
  let p2 = post(&s, &alice, "two").await;
  let family = audience(&s, &alice, "family").await;
  let friends = audience(&s, &alice, "friends").await;

  s.replace_shares(p1.id, vec![family.id, friends.id])
    .await
    .unwrap();
  s.replace_shares(p2.id, vec![family.id]).await.unwrap();

  let mut audiences = s.audience_ids_for_post(p1.id).await.unwrap();
  audiences.sort();
  assert_eq!(audiences, vec![family.id, friends.id]);

  let mut posts = s.post_ids_shared_to(family.id).await.unwrap();
  posts.sort();
  assert_eq!(posts, vec![p1.id, p2.id]);

  // Re-sharing replaces, never accumulates.
  s.replace_shares(p1.id, vec![friends.id]).await.unwrap();
  assert_eq!(s.audience_ids_for_post(p1.id).await.unwrap(), vec![friends.id]);
  assert_eq!(s.post_ids_shared_to(family.id).await.unwrap(), vec![p2.id]);
}

#[tokio::test]
async fn delete_audience_cascades_links() {
  let s = store().await;
  let alice = account(&s, "alice").await;
  let carol = contact(&s, &alice, "carol").await;
  let p = post(&s, &alice, "one").await;
  let aud = audience(&s, &alice, "family").await;
  s.add_members(aud.id, vec![Subject::Contact(carol.id)])
    .await
    .unwrap();
  s.replace_shares(p.id, vec![aud.id]).await.unwrap();

  assert!(s.delete_audience(aud.id).await.unwrap());
  assert!(s.get_audience(aud.id).await.unwrap().is_none());
  assert!(
    s.audience_ids_containing(Subject::Contact(carol.id))
      .await
      .unwrap()
      .is_empty()
  );
  assert!(s.audience_ids_for_post(p.id).await.unwrap().is_empty());
}
