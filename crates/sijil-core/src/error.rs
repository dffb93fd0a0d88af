//! Error types for `sijil-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(i64),

  /// `list_number` collision on add or full update. Nothing is written when
  /// this is returned.
  #[error("list number already in use: {0:?}")]
  DuplicateListNumber(String),

  #[error("unknown update criterion: {0:?}")]
  InvalidCriterion(String),

  /// A stored value could not be decoded back into its domain type.
  #[error("invalid stored value: {0}")]
  Corrupt(String),

  /// Backend failure surfaced by a store implementation.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an arbitrary backend error.
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
