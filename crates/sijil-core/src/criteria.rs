//! Bulk-update criteria — the closed set of columns a bulk status update
//! may match against. Free-form field names never reach a query layer.

use serde::{Deserialize, Serialize};

use crate::{error::Error, person::Person};

/// A permitted match column for
/// [`PersonStore::set_status_where`](crate::store::PersonStore::set_status_where).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateCriterion {
  ListNumber,
  ReceiptNumber,
  RegisterNumber,
}

impl UpdateCriterion {
  /// The storage column this criterion matches against.
  pub fn column(&self) -> &'static str {
    match self {
      Self::ListNumber => "list_number",
      Self::ReceiptNumber => "receipt_number",
      Self::RegisterNumber => "register_number",
    }
  }

  /// The field value this criterion reads from a person.
  pub fn value_of<'p>(&self, person: &'p Person) -> &'p str {
    match self {
      Self::ListNumber => &person.list_number,
      Self::ReceiptNumber => &person.receipt_number,
      Self::RegisterNumber => &person.register_number,
    }
  }
}

impl std::str::FromStr for UpdateCriterion {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "list_number" => Ok(Self::ListNumber),
      "receipt_number" => Ok(Self::ReceiptNumber),
      "register_number" => Ok(Self::RegisterNumber),
      other => Err(Error::InvalidCriterion(other.to_owned())),
    }
  }
}

impl std::fmt::Display for UpdateCriterion {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.column())
  }
}
