//! Best-effort SMS fan-out when a post is shared.
//!
//! Delivery is never load-bearing: every failure is logged and counted, and
//! none of them fails the triggering action. One bad phone number must not
//! stop the rest of an audience from being notified.

use std::future::Future;

use ripple_core::{
  audience::AudienceId, post::PostId, store::ShareStore, subject::Subject,
};

use crate::authorize::Authorizer;

// ─── Delivery seam ───────────────────────────────────────────────────────────

/// Abstraction over an SMS delivery channel.
pub trait SmsSender: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send(
    &self,
    phone_number: &str,
    message: &str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Development sender: logs the message instead of delivering it.
#[derive(Clone, Default)]
pub struct LoggingSms;

impl SmsSender for LoggingSms {
  type Error = std::convert::Infallible;

  async fn send(&self, phone_number: &str, message: &str) -> Result<(), Self::Error> {
    tracing::info!(%phone_number, %message, "sms (logged, not delivered)");
    Ok(())
  }
}

// ─── Fan-out ─────────────────────────────────────────────────────────────────

/// Outcome counts for one fan-out, for observability only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
  pub sent:   usize,
  pub failed: usize,
}

/// Notifies the contact members of the audiences a post was shared to.
#[derive(Clone)]
pub struct Notifier {
  authorizer: Authorizer,
}

impl Notifier {
  pub fn new(authorizer: Authorizer) -> Self { Self { authorizer } }

  /// For each audience, for each contact member: mint a contact-scoped link
  /// pinned to the post and attempt delivery. Account members are post
  /// owners' peers with their own listings and are not texted.
  pub async fn notify_audiences<S, M>(
    &self,
    store: &S,
    sms: &M,
    post_id: PostId,
    audience_ids: &[AudienceId],
  ) -> DeliveryReport
  where
    S: ShareStore,
    M: SmsSender,
  {
    let mut report = DeliveryReport::default();
    if audience_ids.is_empty() {
      return report;
    }

    let sender_name = self.sender_name(store, post_id).await;

    for &audience_id in audience_ids {
      let members = match store.member_subjects(audience_id).await {
        Ok(members) => members,
        Err(e) => {
          tracing::warn!(audience_id, error = %e, "cannot list audience members");
          continue;
        }
      };

      for member in members {
        let Subject::Contact(contact_id) = member else { continue };
        match self.notify_contact(store, sms, &sender_name, post_id, contact_id).await {
          Ok(()) => report.sent += 1,
          Err(reason) => {
            report.failed += 1;
            tracing::warn!(contact_id, post_id, %reason, "sms delivery failed");
          }
        }
      }
    }

    tracing::info!(
      post_id,
      sent = report.sent,
      failed = report.failed,
      "notification fan-out complete"
    );
    report
  }

  async fn notify_contact<S, M>(
    &self,
    store: &S,
    sms: &M,
    sender_name: &str,
    post_id: PostId,
    contact_id: i64,
  ) -> Result<(), String>
  where
    S: ShareStore,
    M: SmsSender,
  {
    let contact = store
      .get_contact(contact_id)
      .await
      .map_err(|e| e.to_string())?
      // Dangling membership link; nobody to notify.
      .ok_or_else(|| format!("contact {contact_id} no longer exists"))?;

    let link = self
      .authorizer
      .issue_link(store, Subject::Contact(contact_id), post_id, true)
      .await
      .map_err(|e| e.to_string())?;

    let message = format!(
      "Hello {}! {} shared something with you: {}",
      contact.name, sender_name, link.url
    );

    sms
      .send(&contact.phone_number, &message)
      .await
      .map_err(|e| e.to_string())
  }

  async fn sender_name<S: ShareStore>(&self, store: &S, post_id: PostId) -> String {
    let owner = match store.get_post(post_id).await {
      Ok(Some(post)) => store.get_account(post.owner_id).await.ok().flatten(),
      _ => None,
    };
    owner.map(|a| a.name).unwrap_or_else(|| "Someone".to_string())
  }
}
