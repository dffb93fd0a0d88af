//! Status-change SMS notification for sijil.
//!
//! Defines the outbound [`SmsGateway`] abstraction with its classified
//! error taxonomy, the Twilio implementation, and the [`Notifier`] that
//! decides whether a status change produces an SMS and records every
//! attempt in the history log.

mod dispatch;
mod gateway;
mod twilio;

pub use dispatch::{DEFAULT_DEDUP_WINDOW_HOURS, Delivery, Notifier, NotifyError};
pub use gateway::{GatewayError, GatewayReceipt, SmsGateway};
pub use twilio::{TwilioConfig, TwilioGateway};
