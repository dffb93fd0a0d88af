//! SMS history records — the append-only log of notification attempts.
//!
//! Entries are associated with a person only loosely, by phone number at
//! query time; there is no foreign key. Once written, an entry is never
//! mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome class of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
  Sent,
  Failed,
  /// Suppressed because the destination was already notified inside the
  /// dedup window. The dispatcher itself writes nothing for suppressed
  /// sends; this label exists for callers that log suppressions.
  Duplicate,
}

impl SendStatus {
  /// The storage label. Must match the serde `rename_all` above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Sent => "sent",
      Self::Failed => "failed",
      Self::Duplicate => "duplicate",
    }
  }

  pub fn from_label(s: &str) -> Option<Self> {
    match s {
      "sent" => Some(Self::Sent),
      "failed" => Some(Self::Failed),
      "duplicate" => Some(Self::Duplicate),
      _ => None,
    }
  }
}

/// A stored send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsRecord {
  pub id:              i64,
  /// Destination in canonical `+`-prefixed form.
  pub to_number:       String,
  pub message:         String,
  pub status:          SendStatus,
  /// Delivery status as reported by the gateway at accept time.
  pub delivery_status: String,
  pub error:           Option<String>,
  /// Store-assigned at append time; monotonically increasing per insert.
  pub sent_at:         DateTime<Utc>,
}

/// Input to [`SmsHistoryStore::append`](crate::store::SmsHistoryStore::append).
/// `id` and `sent_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewSmsRecord {
  pub to_number:       String,
  pub message:         String,
  pub status:          SendStatus,
  pub delivery_status: String,
  pub error:           Option<String>,
}
