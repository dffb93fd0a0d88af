//! [`TwilioGateway`] — the Twilio Messages API implementation of
//! [`SmsGateway`].
//!
//! Messages are sent through a Messaging Service with an alphanumeric
//! sender identity; errors come back as `{code, message}` JSON and are
//! classified into the [`GatewayError`] taxonomy.

use std::time::Duration;

use serde::Deserialize;

use crate::gateway::{GatewayError, GatewayReceipt, SmsGateway};

/// Production API host. Tests point [`TwilioGateway::with_base_url`] at a
/// local mock server instead.
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Credentials and sender configuration for the Twilio Messages API.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
  pub account_sid:           String,
  pub auth_token:            String,
  pub messaging_service_sid: String,
  /// Alphanumeric sender identity shown to recipients.
  pub sender:                String,
}

/// Async Twilio client.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TwilioGateway {
  http:     reqwest::Client,
  config:   TwilioConfig,
  base_url: String,
}

impl TwilioGateway {
  pub fn new(config: TwilioConfig) -> Result<Self, GatewayError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      http,
      config,
      base_url: TWILIO_API_BASE.to_owned(),
    })
  }

  /// Point the client at a different API host — used in tests.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  fn messages_url(&self) -> String {
    format!(
      "{}/2010-04-01/Accounts/{}/Messages.json",
      self.base_url.trim_end_matches('/'),
      self.config.account_sid
    )
  }
}

/// Successful message-creation response body (the fields we read).
#[derive(Debug, Deserialize)]
struct MessageCreated {
  sid:    String,
  status: String,
}

/// Error response body.
#[derive(Debug, Default, Deserialize)]
struct ApiFailure {
  code:    Option<i64>,
  message: Option<String>,
}

/// Map a provider error code onto the classified taxonomy.
fn classify(code: Option<i64>, message: String) -> GatewayError {
  match code {
    Some(21211) => GatewayError::InvalidDestination,
    Some(21214) => GatewayError::UnverifiedDestination,
    Some(21608) => GatewayError::UnverifiedAccount,
    Some(20003) => GatewayError::BadCredentials,
    Some(21215) => GatewayError::InsufficientBalance,
    Some(21614) => GatewayError::BadSenderConfig,
    _ => GatewayError::Provider { code, message },
  }
}

impl SmsGateway for TwilioGateway {
  async fn send(&self, to: &str, body: &str) -> Result<GatewayReceipt, GatewayError> {
    let resp = self
      .http
      .post(self.messages_url())
      .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
      .form(&[
        ("To", to),
        ("Body", body),
        ("MessagingServiceSid", self.config.messaging_service_sid.as_str()),
        ("From", self.config.sender.as_str()),
      ])
      .send()
      .await?;

    if resp.status().is_success() {
      let created: MessageCreated = resp.json().await?;
      return Ok(GatewayReceipt {
        message_id:      created.sid,
        delivery_status: created.status,
      });
    }

    let http_status = resp.status();
    let failure: ApiFailure = resp.json().await.unwrap_or_default();
    Err(classify(
      failure.code,
      failure
        .message
        .unwrap_or_else(|| format!("sms gateway returned {http_status}")),
    ))
  }
}
