//! Status-update handlers — the one place a workflow label change can fan
//! out into SMS notifications.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `PUT`  | `/persons/:id/status` | Body: `{"status":"ready"}`; 404 if not found |
//! | `POST` | `/persons/status` | Body: [`BulkStatusBody`]; 400 on unknown criterion |
//!
//! Setting the `ready` status dispatches one notification per affected
//! person. Notification outcomes are reported alongside the updated
//! records; a failed send never turns a successful status write into an
//! HTTP error.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use sijil_core::{
  criteria::UpdateCriterion,
  person::Person,
  status::Status,
  store::Store,
};
use sijil_notify::{Delivery, NotifyError, SmsGateway};

use crate::{ApiState, error::ApiError};

// ─── Notification reporting ──────────────────────────────────────────────────

/// Per-person notification outcome reported alongside status updates.
#[derive(Debug, Serialize)]
pub struct NotificationReport {
  pub person_id:  i64,
  pub success:    bool,
  pub duplicate:  bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:      Option<String>,
}

impl NotificationReport {
  fn from_outcome(person_id: i64, outcome: Result<Delivery, NotifyError>) -> Self {
    match outcome {
      Ok(Delivery::Sent { message_id, .. }) => Self {
        person_id,
        success: true,
        duplicate: false,
        message_id: Some(message_id),
        error: None,
      },
      Ok(Delivery::Duplicate) => Self {
        person_id,
        success: true,
        duplicate: true,
        message_id: None,
        error: None,
      },
      Err(e) => Self {
        person_id,
        success: false,
        duplicate: false,
        message_id: None,
        error: Some(e.to_string()),
      },
    }
  }
}

// ─── Single update ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
  pub person:       Person,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notification: Option<NotificationReport>,
}

/// `PUT /persons/:id/status`
pub async fn update_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<i64>,
  Json(body): Json<StatusBody>,
) -> Result<Json<StatusUpdateResponse>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let person = state
    .store
    .set_status(id, body.status)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;

  let notification = if body.status.triggers_notification() {
    let outcome = state
      .notifier
      .send_status_notification(&*state.store, &person)
      .await;
    Some(NotificationReport::from_outcome(person.id, outcome))
  } else {
    None
  };

  Ok(Json(StatusUpdateResponse { person, notification }))
}

// ─── Bulk update ──────────────────────────────────────────────────────────────

/// The criterion arrives as a string and is parsed into the closed
/// [`UpdateCriterion`] set; anything else is a 400.
#[derive(Debug, Deserialize)]
pub struct BulkStatusBody {
  pub criterion: String,
  pub value:     String,
  pub status:    Status,
}

#[derive(Debug, Serialize)]
pub struct BulkStatusResponse {
  pub persons:       Vec<Person>,
  pub notifications: Vec<NotificationReport>,
}

/// `POST /persons/status`
pub async fn update_by_criterion<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(body): Json<BulkStatusBody>,
) -> Result<Json<BulkStatusResponse>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let criterion: UpdateCriterion = body.criterion.parse()?;
  let persons = state
    .store
    .set_status_where(criterion, &body.value, body.status)
    .await?;

  let notifications = if body.status.triggers_notification() && !persons.is_empty() {
    state
      .notifier
      .notify_ready(&*state.store, &persons)
      .await
      .into_iter()
      .map(|(id, outcome)| NotificationReport::from_outcome(id, outcome))
      .collect()
  } else {
    Vec::new()
  };

  Ok(Json(BulkStatusResponse { persons, notifications }))
}
