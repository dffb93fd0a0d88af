//! The notification dispatcher — decides whether a status change produces
//! an outbound SMS and records every attempt.

use chrono::Duration;
use thiserror::Error;
use tracing::{info, warn};

use sijil_core::{
  person::Person,
  phone::{self, PhoneError},
  sms::{NewSmsRecord, SendStatus},
  store::SmsHistoryStore,
};

use crate::gateway::{GatewayError, SmsGateway};

/// Canonical trailing window, in hours, within which a repeat notification
/// to the same number is suppressed.
pub const DEFAULT_DEDUP_WINDOW_HOURS: i64 = 24;

/// What happened to a dispatched notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
  /// The gateway accepted the message.
  Sent {
    message_id:      String,
    delivery_status: String,
  },
  /// Suppressed: the number was already notified inside the dedup window.
  /// Reported as success; neither a gateway call nor a history write
  /// happened.
  Duplicate,
}

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error(transparent)]
  Phone(#[from] PhoneError),

  #[error(transparent)]
  Gateway(#[from] GatewayError),

  /// The history store failed while checking for or recording an attempt.
  #[error(transparent)]
  History(#[from] sijil_core::Error),
}

/// Sends notifications through an [`SmsGateway`] and records every attempt
/// in an [`SmsHistoryStore`].
///
/// Per invocation there is at most one gateway call and at most one history
/// write, and never both a duplicate short-circuit and a gateway call.
pub struct Notifier<G> {
  gateway:      G,
  sender:       String,
  dedup_window: Duration,
}

impl<G: SmsGateway> Notifier<G> {
  pub fn new(gateway: G, sender: impl Into<String>) -> Self {
    Self {
      gateway,
      sender: sender.into(),
      dedup_window: Duration::hours(DEFAULT_DEDUP_WINDOW_HOURS),
    }
  }

  /// Override the dedup window. The canonical window is 24 hours.
  pub fn with_dedup_window(mut self, window: Duration) -> Self {
    self.dedup_window = window;
    self
  }

  /// The sender display identity reported back to callers.
  pub fn sender(&self) -> &str { &self.sender }

  /// The fixed pickup notification for `person`, addressed by name.
  pub fn ready_message(person: &Person) -> String {
    format!(
      "إلى السيد/ة {} نعلمكم بأن جواز السفر جاهز، وبإمكانكم استلامه ضمن أوقات الدوام الرسمية.",
      person.name
    )
  }

  /// Send the ready-for-pickup notification for one person.
  ///
  /// The person's phone is normalised first; a missing or malformed number
  /// is reported to the caller, never retried. A recent send to the same
  /// normalised number short-circuits as [`Delivery::Duplicate`].
  pub async fn send_status_notification<H: SmsHistoryStore>(
    &self,
    history: &H,
    person: &Person,
  ) -> Result<Delivery, NotifyError> {
    let to = phone::normalize(&person.phone)?;
    let message = Self::ready_message(person);

    if history.has_recent_duplicate(&to, self.dedup_window).await? {
      info!(
        person_id = person.id,
        to = %to,
        "notification suppressed: number already notified within the dedup window"
      );
      return Ok(Delivery::Duplicate);
    }

    self.deliver(history, &to, &message).await
  }

  /// Normalise `to`, send `message` and record the outcome. No duplicate
  /// suppression — callers wanting it go through
  /// [`send_status_notification`](Self::send_status_notification).
  pub async fn send<H: SmsHistoryStore>(
    &self,
    history: &H,
    to: &str,
    message: &str,
  ) -> Result<Delivery, NotifyError> {
    let to = phone::normalize(to)?;
    self.deliver(history, &to, message).await
  }

  /// Notify every person in `persons`, sequentially. A failure for one
  /// never aborts the rest; outcomes are returned per person id.
  pub async fn notify_ready<H: SmsHistoryStore>(
    &self,
    history: &H,
    persons: &[Person],
  ) -> Vec<(i64, Result<Delivery, NotifyError>)> {
    let mut outcomes = Vec::with_capacity(persons.len());
    for person in persons {
      let outcome = self.send_status_notification(history, person).await;
      outcomes.push((person.id, outcome));
    }
    outcomes
  }

  async fn deliver<H: SmsHistoryStore>(
    &self,
    history: &H,
    to: &str,
    message: &str,
  ) -> Result<Delivery, NotifyError> {
    match self.gateway.send(to, message).await {
      Ok(receipt) => {
        history
          .append(NewSmsRecord {
            to_number:       to.to_owned(),
            message:         message.to_owned(),
            status:          SendStatus::Sent,
            delivery_status: receipt.delivery_status.clone(),
            error:           None,
          })
          .await?;
        info!(to = %to, message_id = %receipt.message_id, "sms sent");
        Ok(Delivery::Sent {
          message_id:      receipt.message_id,
          delivery_status: receipt.delivery_status,
        })
      }
      Err(e) => {
        history
          .append(NewSmsRecord {
            to_number:       to.to_owned(),
            message:         message.to_owned(),
            status:          SendStatus::Failed,
            delivery_status: "failed".to_owned(),
            error:           Some(e.to_string()),
          })
          .await?;
        warn!(to = %to, error = %e, "sms send failed");
        Err(e.into())
      }
    }
  }
}
