//! The outbound SMS gateway abstraction and its error taxonomy.

use std::future::Future;

use thiserror::Error;

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReceipt {
  /// Provider-assigned message identifier.
  pub message_id:      String,
  /// Provider-reported delivery status at accept time (e.g. "queued").
  pub delivery_status: String,
}

/// Abstraction over an outbound SMS provider.
///
/// `to` is always a canonical `+`-prefixed number — normalisation happens
/// before the gateway is reached.
pub trait SmsGateway: Send + Sync {
  fn send<'a>(
    &'a self,
    to: &'a str,
    body: &'a str,
  ) -> impl Future<Output = Result<GatewayReceipt, GatewayError>> + Send + 'a;
}

/// Classified provider failures. Each variant's message is the user-facing
/// text surfaced by the API layer. None of these are retried here.
#[derive(Debug, Error)]
pub enum GatewayError {
  #[error("Invalid phone number format")]
  InvalidDestination,

  #[error(
    "This number needs to be verified in your Twilio console first. Please go to \
     Twilio Console → Phone Numbers → Verified Caller IDs and add this number."
  )]
  UnverifiedDestination,

  #[error("Your Twilio account is not verified. Please verify your account in the Twilio console.")]
  UnverifiedAccount,

  #[error("Invalid Twilio credentials. Please check your Account SID and Auth Token.")]
  BadCredentials,

  #[error("Your Twilio account doesn't have sufficient funds to send SMS.")]
  InsufficientBalance,

  #[error("Invalid Messaging Service SID. Please check your configuration.")]
  BadSenderConfig,

  /// Any provider error without a dedicated classification.
  #[error("{message}")]
  Provider {
    code:    Option<i64>,
    message: String,
  },

  #[error("sms transport error: {0}")]
  Transport(#[from] reqwest::Error),
}
