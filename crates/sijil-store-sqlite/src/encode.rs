//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, and enum labels as their wire strings.

use chrono::{DateTime, NaiveDate, Utc};
use sijil_core::{
  Error, Result,
  person::Person,
  sms::{SendStatus, SmsRecord},
  status::Status,
};

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e| Error::Corrupt(format!("bad date {s:?}: {e}")))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Corrupt(format!("bad timestamp {s:?}: {e}")))
}

// ─── Enum labels ─────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<Status> {
  Status::from_label(s).ok_or_else(|| Error::Corrupt(format!("unknown status label: {s:?}")))
}

pub fn decode_send_status(s: &str) -> Result<SendStatus> {
  SendStatus::from_label(s)
    .ok_or_else(|| Error::Corrupt(format!("unknown send status label: {s:?}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub id:              i64,
  pub name:            String,
  pub phone:           String,
  pub date:            String,
  pub status:          String,
  pub list_number:     String,
  pub receipt_number:  String,
  pub register_number: String,
  pub request_name:    String,
  pub files:           Option<String>,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:              self.id,
      name:            self.name,
      phone:           self.phone,
      date:            decode_date(&self.date)?,
      status:          decode_status(&self.status)?,
      list_number:     self.list_number,
      receipt_number:  self.receipt_number,
      register_number: self.register_number,
      request_name:    self.request_name,
      files:           self.files,
    })
  }
}

/// Raw values read directly from an `sms_history` row.
pub struct RawSmsRecord {
  pub id:              i64,
  pub to_number:       String,
  pub message:         String,
  pub status:          String,
  pub delivery_status: String,
  pub error:           Option<String>,
  pub sent_at:         String,
}

impl RawSmsRecord {
  pub fn into_record(self) -> Result<SmsRecord> {
    Ok(SmsRecord {
      id:              self.id,
      to_number:       self.to_number,
      message:         self.message,
      status:          decode_send_status(&self.status)?,
      delivery_status: self.delivery_status,
      error:           self.error,
      sent_at:         decode_dt(&self.sent_at)?,
    })
  }
}
