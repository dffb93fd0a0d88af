//! The status workflow — a closed label set with a single side-effect rule.
//!
//! Stages are listed in their nominal order, but transitions are not
//! guarded: any status may be set from any other, directly or through a
//! bulk criterion update. The one rule attached to the workflow is that
//! setting [`Status::Ready`] triggers a pickup notification.

use serde::{Deserialize, Serialize};

/// Workflow stage of a person's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
  Received,
  SentToAuthority,
  ReceivedByAuthority,
  SentFromAuthority,
  Ready,
  Collected,
}

impl Status {
  /// The wire/storage label. Must match the serde `rename_all` above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Received => "received",
      Self::SentToAuthority => "sent-to-authority",
      Self::ReceivedByAuthority => "received-by-authority",
      Self::SentFromAuthority => "sent-from-authority",
      Self::Ready => "ready",
      Self::Collected => "collected",
    }
  }

  pub fn from_label(s: &str) -> Option<Self> {
    match s {
      "received" => Some(Self::Received),
      "sent-to-authority" => Some(Self::SentToAuthority),
      "received-by-authority" => Some(Self::ReceivedByAuthority),
      "sent-from-authority" => Some(Self::SentFromAuthority),
      "ready" => Some(Self::Ready),
      "collected" => Some(Self::Collected),
      _ => None,
    }
  }

  /// Whether setting this status triggers a pickup SMS. True only for
  /// [`Status::Ready`]; no other stage has side effects.
  pub fn triggers_notification(&self) -> bool { matches!(self, Self::Ready) }
}

impl std::fmt::Display for Status {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_round_trip() {
    for status in [
      Status::Received,
      Status::SentToAuthority,
      Status::ReceivedByAuthority,
      Status::SentFromAuthority,
      Status::Ready,
      Status::Collected,
    ] {
      assert_eq!(Status::from_label(status.as_str()), Some(status));
    }
  }

  #[test]
  fn unknown_label_is_none() {
    assert_eq!(Status::from_label("pending"), None);
  }

  #[test]
  fn only_ready_triggers_notification() {
    assert!(Status::Ready.triggers_notification());
    for status in [
      Status::Received,
      Status::SentToAuthority,
      Status::ReceivedByAuthority,
      Status::SentFromAuthority,
      Status::Collected,
    ] {
      assert!(!status.triggers_notification());
    }
  }
}
