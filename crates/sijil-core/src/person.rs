//! Person — an applicant record tracked through the status workflow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// A persisted applicant record.
///
/// `id` is store-assigned and immutable. `list_number` is the
/// caller-assigned business identifier, unique across all persons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:              i64,
  pub name:            String,
  pub phone:           String,
  /// Creation date (UTC calendar date); defaulted by the store on add.
  pub date:            NaiveDate,
  pub status:          Status,
  pub list_number:     String,
  pub receipt_number:  String,
  pub register_number: String,
  pub request_name:    String,
  /// Delimited list of attachment names owned by an external file store;
  /// opaque to this service.
  pub files:           Option<String>,
}

impl Person {
  /// The search predicate: case-insensitive substring match of `term`
  /// against the six searchable fields. Backends that filter in process
  /// use this directly; the SQL backends mirror it with `LIKE`.
  pub fn matches(&self, term: &str) -> bool {
    let needle = term.to_lowercase();
    [
      &self.name,
      &self.phone,
      &self.list_number,
      &self.receipt_number,
      &self.register_number,
      &self.request_name,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
  }
}

/// Input to [`PersonStore::add`](crate::store::PersonStore::add).
///
/// `id` is always assigned by the store; `date` defaults to the current UTC
/// calendar date when `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
  pub name:            String,
  pub phone:           String,
  pub date:            Option<NaiveDate>,
  pub status:          Status,
  pub list_number:     String,
  pub receipt_number:  String,
  pub register_number: String,
  pub request_name:    String,
  pub files:           Option<String>,
}

impl NewPerson {
  /// Materialise a full [`Person`] with a store-assigned id, defaulting the
  /// creation date to `today` when absent.
  pub fn into_person(self, id: i64, today: NaiveDate) -> Person {
    Person {
      id,
      name: self.name,
      phone: self.phone,
      date: self.date.unwrap_or(today),
      status: self.status,
      list_number: self.list_number,
      receipt_number: self.receipt_number,
      register_number: self.register_number,
      request_name: self.request_name,
      files: self.files,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn person() -> Person {
    Person {
      id:              1,
      name:            "Layla Haddad".into(),
      phone:           "+4512345678".into(),
      date:            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      status:          Status::Received,
      list_number:     "L-100".into(),
      receipt_number:  "R-200".into(),
      register_number: "G-300".into(),
      request_name:    "renewal".into(),
      files:           None,
    }
  }

  #[test]
  fn matches_is_case_insensitive() {
    assert!(person().matches("layla"));
    assert!(person().matches("LAYLA"));
  }

  #[test]
  fn matches_covers_all_six_fields() {
    let p = person();
    for term in ["Layla", "4512345678", "L-100", "R-200", "G-300", "renewal"] {
      assert!(p.matches(term), "expected match for {term:?}");
    }
  }

  #[test]
  fn matches_rejects_non_substrings() {
    assert!(!person().matches("L-101"));
  }

  #[test]
  fn into_person_defaults_date() {
    let input = NewPerson {
      name:            "Omar".into(),
      phone:           "".into(),
      date:            None,
      status:          Status::Received,
      list_number:     "L-1".into(),
      receipt_number:  "".into(),
      register_number: "".into(),
      request_name:    "".into(),
      files:           None,
    };
    let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    assert_eq!(input.into_person(7, today).date, today);
  }
}
