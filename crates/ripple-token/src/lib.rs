//! Signed, expiring bearer tokens for Ripple share links.
//!
//! A token is `base64url(claims-json) . base64url(hmac-sha256-tag)`, keyed
//! by a process-wide secret. Two kinds are recognised: account-scoped
//! (`"view"`) and contact-scoped (`"contact_view"`). Anything else — bad
//! signature, expired, malformed, unknown kind, non-numeric subject —
//! verifies to the single opaque [`TokenError::Invalid`]; no partial decode
//! ever escapes this crate.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use ripple_core::subject::Subject;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default link lifetime. There is no server-side revocation; expiry and
/// per-access capability re-checks are the only mitigations.
pub const DEFAULT_TTL_DAYS: i64 = 30;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  /// The signing secret is unusable (empty). Fatal at startup.
  #[error("token signing secret is misconfigured")]
  Misconfigured,

  /// Deliberately carries no detail: callers must not be able to tell a
  /// bad signature from an expired or malformed token.
  #[error("invalid token")]
  Invalid,
}

pub type Result<T, E = TokenError> = std::result::Result<T, E>;

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The `type` claim. Serde tags are the wire discriminant; verification
/// dispatches on this variant, never on claim-presence probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
  #[serde(rename = "view")]
  AccountView,
  #[serde(rename = "contact_view")]
  ContactView,
}

/// Verified token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// Numeric subject id, rendered as a string on the wire.
  pub sub:  String,
  #[serde(rename = "type")]
  pub kind: TokenKind,
  /// Issued-at, unix seconds.
  pub iat:  i64,
  /// Expiry, unix seconds. Tokens at or past this instant are invalid.
  pub exp:  i64,
}

impl Claims {
  /// The subject this token asserts, dispatched on the kind discriminant.
  pub fn subject(&self) -> Result<Subject> {
    let id: i64 = self.sub.parse().map_err(|_| TokenError::Invalid)?;
    Ok(match self.kind {
      TokenKind::AccountView => Subject::Account(id),
      TokenKind::ContactView => Subject::Contact(id),
    })
  }
}

// ─── Codec ───────────────────────────────────────────────────────────────────

/// Mints and verifies bearer tokens with a process-wide symmetric secret.
///
/// The secret is injected once at construction (from configuration), never
/// read ad hoc.
#[derive(Clone, Debug)]
pub struct TokenCodec {
  secret: Vec<u8>,
}

impl TokenCodec {
  /// Build a codec from the configured secret. An empty secret is a fatal
  /// misconfiguration, caught here rather than at first use.
  pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self> {
    let secret = secret.into();
    if secret.is_empty() {
      return Err(TokenError::Misconfigured);
    }
    Ok(Self { secret })
  }

  /// Mint a token asserting `subject`, valid for `ttl` from now.
  pub fn issue(&self, subject: Subject, ttl: Duration) -> Result<String> {
    let kind = match subject {
      Subject::Account(_) => TokenKind::AccountView,
      Subject::Contact(_) => TokenKind::ContactView,
    };
    let now = Utc::now();
    let claims = Claims {
      sub: subject.raw_id().to_string(),
      kind,
      iat: now.timestamp(),
      exp: (now + ttl).timestamp(),
    };
    let payload =
      serde_json::to_vec(&claims).map_err(|_| TokenError::Misconfigured)?;
    let encoded = B64.encode(payload);
    let tag = self.sign(encoded.as_bytes())?;
    Ok(format!("{encoded}.{tag}"))
  }

  /// Verify signature then expiry, returning the decoded claims.
  ///
  /// Never panics on attacker-controlled input; every failure mode
  /// normalises to [`TokenError::Invalid`].
  pub fn verify(&self, token: &str) -> Result<Claims> {
    let (payload_b64, tag_b64) =
      token.split_once('.').ok_or(TokenError::Invalid)?;

    let tag = B64.decode(tag_b64).map_err(|_| TokenError::Invalid)?;
    let mut mac = HmacSha256::new_from_slice(&self.secret)
      .map_err(|_| TokenError::Invalid)?;
    mac.update(payload_b64.as_bytes());
    // Constant-time comparison.
    mac.verify_slice(&tag).map_err(|_| TokenError::Invalid)?;

    let payload = B64.decode(payload_b64).map_err(|_| TokenError::Invalid)?;
    let claims: Claims =
      serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)?;

    // The subject must be well-formed before the claims leave this crate.
    claims.subject()?;

    if claims.exp <= Utc::now().timestamp() {
      return Err(TokenError::Invalid);
    }
    Ok(claims)
  }

  fn sign(&self, data: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(&self.secret)
      .map_err(|_| TokenError::Misconfigured)?;
    mac.update(data);
    Ok(B64.encode(mac.finalize().into_bytes()))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn codec() -> TokenCodec { TokenCodec::new("test-secret").unwrap() }

  fn forge(codec_secret: &[u8], payload_json: &str) -> String {
    // Craft a correctly-signed token with arbitrary claims.
    let encoded = B64.encode(payload_json);
    let mut mac = HmacSha256::new_from_slice(codec_secret).unwrap();
    mac.update(encoded.as_bytes());
    let tag = B64.encode(mac.finalize().into_bytes());
    format!("{encoded}.{tag}")
  }

  #[test]
  fn empty_secret_is_misconfigured() {
    assert_eq!(TokenCodec::new("").unwrap_err(), TokenError::Misconfigured);
  }

  #[test]
  fn account_token_round_trips() {
    let c = codec();
    let token = c.issue(Subject::Account(7), Duration::days(30)).unwrap();
    let claims = c.verify(&token).unwrap();
    assert_eq!(claims.kind, TokenKind::AccountView);
    assert_eq!(claims.subject().unwrap(), Subject::Account(7));
  }

  #[test]
  fn contact_token_round_trips() {
    let c = codec();
    let token = c.issue(Subject::Contact(12), Duration::days(1)).unwrap();
    let claims = c.verify(&token).unwrap();
    assert_eq!(claims.kind, TokenKind::ContactView);
    assert_eq!(claims.subject().unwrap(), Subject::Contact(12));
  }

  #[test]
  fn expired_token_is_invalid() {
    let c = codec();
    let token = c.issue(Subject::Account(7), Duration::seconds(-1)).unwrap();
    assert_eq!(c.verify(&token).unwrap_err(), TokenError::Invalid);
  }

  #[test]
  fn tampered_payload_is_invalid() {
    let c = codec();
    let token = c.issue(Subject::Account(7), Duration::days(30)).unwrap();
    let (payload, tag) = token.split_once('.').unwrap();
    // Swap the payload for another subject, keeping the old tag.
    let other = c.issue(Subject::Account(8), Duration::days(30)).unwrap();
    let (other_payload, _) = other.split_once('.').unwrap();
    assert_ne!(payload, other_payload);
    let forged = format!("{other_payload}.{tag}");
    assert_eq!(c.verify(&forged).unwrap_err(), TokenError::Invalid);
  }

  #[test]
  fn truncated_tag_is_invalid() {
    let c = codec();
    let token = c.issue(Subject::Account(7), Duration::days(30)).unwrap();
    let truncated = &token[..token.len() - 2];
    assert_eq!(c.verify(truncated).unwrap_err(), TokenError::Invalid);
  }

  #[test]
  fn wrong_secret_is_invalid() {
    let c = codec();
    let other = TokenCodec::new("other-secret").unwrap();
    let token = c.issue(Subject::Account(7), Duration::days(30)).unwrap();
    assert_eq!(other.verify(&token).unwrap_err(), TokenError::Invalid);
  }

  #[test]
  fn garbage_inputs_are_invalid() {
    let c = codec();
    for garbage in ["", ".", "not-a-token", "a.b.c", "!!!.???"] {
      assert_eq!(c.verify(garbage).unwrap_err(), TokenError::Invalid);
    }
  }

  #[test]
  fn unknown_kind_is_invalid_even_when_signed() {
    let c = codec();
    let exp = Utc::now().timestamp() + 3600;
    let payload = format!(
      r#"{{"sub":"7","type":"admin","iat":0,"exp":{exp}}}"#
    );
    let token = forge(b"test-secret", &payload);
    assert_eq!(c.verify(&token).unwrap_err(), TokenError::Invalid);
  }

  #[test]
  fn non_numeric_subject_is_invalid_even_when_signed() {
    let c = codec();
    let exp = Utc::now().timestamp() + 3600;
    let payload = format!(
      r#"{{"sub":"alice","type":"view","iat":0,"exp":{exp}}}"#
    );
    let token = forge(b"test-secret", &payload);
    assert_eq!(c.verify(&token).unwrap_err(), TokenError::Invalid);
  }

  #[test]
  fn missing_kind_claim_is_invalid_even_when_signed() {
    let c = codec();
    let exp = Utc::now().timestamp() + 3600;
    let payload = format!(r#"{{"sub":"7","iat":0,"exp":{exp}}}"#);
    let token = forge(b"test-secret", &payload);
    assert_eq!(c.verify(&token).unwrap_err(), TokenError::Invalid);
  }
}
