//! JSON REST API for sijil.
//!
//! Exposes an axum [`Router`] backed by any [`Store`] backend and any
//! [`SmsGateway`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sijil_api::api_router(state))
//! ```

pub mod error;
pub mod persons;
pub mod sms;
pub mod status;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use sijil_core::store::Store;
use sijil_notify::{Notifier, SmsGateway};

pub use error::ApiError;


/// Shared state threaded through all handlers.
pub struct ApiState<S, G> {
  pub store:    Arc<S>,
  pub notifier: Arc<Notifier<G>>,
}

impl<S, G> Clone for ApiState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      notifier: Arc::clone(&self.notifier),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S, G>(state: ApiState<S, G>) -> Router<()>
where
  S: Store + 'static,
  G: SmsGateway + 'static,
{
  Router::new()
    // Persons
    .route("/persons", get(persons::list::<S, G>).post(persons::create::<S, G>))
    .route("/persons/search", get(persons::search::<S, G>))
    .route("/persons/status", post(status::update_by_criterion::<S, G>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S, G>)
        .put(persons::update_one::<S, G>)
        .delete(persons::delete_by_id::<S, G>),
    )
    .route(
      "/persons/by-list-number/{list_number}",
      delete(persons::delete_by_list_number::<S, G>),
    )
    .route("/persons/{id}/status", put(status::update_one::<S, G>))
    // SMS
    .route("/send-sms", post(sms::send::<S, G>))
    .route("/sms-history", get(sms::history::<S, G>))
    .with_state(state)
}
