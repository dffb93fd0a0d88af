//! Handlers for raw SMS send and the notification history.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/send-sms` | Body: `{"to":"...","message":"..."}` |
//! | `GET`  | `/sms-history` | Full history, newest first |

use axum::{
  Json,
  extract::State,
};
use serde::{Deserialize, Serialize};
use sijil_core::{sms::SmsRecord, store::Store};
use sijil_notify::{Delivery, SmsGateway};

use crate::{ApiState, error::ApiError};

// ─── Send ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendBody {
  pub to:      String,
  pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
  pub success:         bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message_id:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub delivery_status: Option<String>,
  pub from:            String,
}

/// `POST /send-sms` — normalises the destination, sends through the
/// gateway and records the attempt. No duplicate suppression on this path.
pub async fn send<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(body): Json<SendBody>,
) -> Result<Json<SendResponse>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "Phone number and message are required".to_owned(),
    ));
  }

  let delivery = state
    .notifier
    .send(&*state.store, &body.to, &body.message)
    .await?;

  let from = state.notifier.sender().to_owned();
  let response = match delivery {
    Delivery::Sent { message_id, delivery_status } => SendResponse {
      success:         true,
      message_id:      Some(message_id),
      delivery_status: Some(delivery_status),
      from,
    },
    Delivery::Duplicate => SendResponse {
      success:         true,
      message_id:      None,
      delivery_status: None,
      from,
    },
  };
  Ok(Json(response))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /sms-history`
pub async fn history<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<Json<Vec<SmsRecord>>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let records = state.store.history().await?;
  Ok(Json(records))
}
