//! The `PersonStore` and `SmsHistoryStore` traits.
//!
//! The traits are implemented by storage backends (`sijil-store-mem`,
//! `sijil-store-sqlite`). Higher layers (`sijil-api`, `sijil-notify`)
//! depend on these abstractions, not on any concrete backend.

use std::future::Future;

use chrono::Duration;

use crate::{
  Result,
  criteria::UpdateCriterion,
  person::{NewPerson, Person},
  sms::{NewSmsRecord, SmsRecord},
  status::Status,
};

// ─── Persons ─────────────────────────────────────────────────────────────────

/// Abstraction over a person records backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  /// All persons, ordered by creation date descending, then id descending.
  /// No pagination; returns the full set.
  fn all(&self) -> impl Future<Output = Result<Vec<Person>>> + Send + '_;

  /// Retrieve a person by store-assigned id. `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>>> + Send + '_;

  /// Retrieve a person by the caller-assigned unique list number.
  fn get_by_list_number<'a>(
    &'a self,
    list_number: &'a str,
  ) -> impl Future<Output = Result<Option<Person>>> + Send + 'a;

  /// Case-insensitive substring search over name, phone, list_number,
  /// receipt_number, register_number and request_name. An empty term
  /// yields an empty result, not the full set.
  fn search<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>>> + Send + 'a;

  /// Create a person. The id is store-assigned and `date` defaults to the
  /// current UTC calendar date. Fails with
  /// [`Error::DuplicateListNumber`](crate::Error::DuplicateListNumber) on a
  /// list-number collision; nothing is written in that case.
  fn add(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person>> + Send + '_;

  /// Full replace by id. Fails with
  /// [`Error::PersonNotFound`](crate::Error::PersonNotFound) when the id is
  /// unknown; returns the updated record otherwise.
  fn update(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person>> + Send + '_;

  /// Set the status of one person. Returns `None` (not an error) when the
  /// id is unknown — callers decide how to surface that.
  fn set_status(
    &self,
    id: i64,
    status: Status,
  ) -> impl Future<Output = Result<Option<Person>>> + Send + '_;

  /// Set the status of every person whose criterion column equals `value`
  /// exactly (case-sensitive). Returns the updated set, possibly empty.
  fn set_status_where<'a>(
    &'a self,
    criterion: UpdateCriterion,
    value: &'a str,
    status: Status,
  ) -> impl Future<Output = Result<Vec<Person>>> + Send + 'a;

  /// Delete by id. Deleting a missing person is idempotent success.
  fn delete_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Delete by list number. Deleting a missing person is idempotent
  /// success.
  fn delete_by_list_number<'a>(
    &'a self,
    list_number: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

// ─── SMS history ─────────────────────────────────────────────────────────────

/// Abstraction over the append-only SMS notification log.
///
/// Entries are never mutated after creation and the store exposes no delete
/// operation — history pruning is a view-layer concern.
pub trait SmsHistoryStore: Send + Sync {
  /// Store a send attempt. `id` and `sent_at` are assigned here; returns
  /// the stored copy.
  fn append(
    &self,
    entry: NewSmsRecord,
  ) -> impl Future<Output = Result<SmsRecord>> + Send + '_;

  /// Records for `to_number` with `sent_at` inside the trailing window,
  /// newest first.
  fn recent<'a>(
    &'a self,
    to_number: &'a str,
    within: Duration,
  ) -> impl Future<Output = Result<Vec<SmsRecord>>> + Send + 'a;

  /// Whether any record for `to_number` falls inside the trailing window.
  fn has_recent_duplicate<'a>(
    &'a self,
    to_number: &'a str,
    within: Duration,
  ) -> impl Future<Output = Result<bool>> + Send + 'a;

  /// The full history, newest first.
  fn history(&self) -> impl Future<Output = Result<Vec<SmsRecord>>> + Send + '_;
}

// ─── Combined capability ─────────────────────────────────────────────────────

/// The full capability set of a backend: persons plus SMS history.
/// Blanket-implemented; backends only implement the two traits above.
pub trait Store: PersonStore + SmsHistoryStore {}

impl<T: PersonStore + SmsHistoryStore> Store for T {}
