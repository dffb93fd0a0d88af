//! [`SqliteStore`] — the SQLite implementation of the sijil store traits.

use std::path::Path;

use chrono::{Duration, Utc};
use rusqlite::OptionalExtension as _;

use sijil_core::{
  Error, Result,
  criteria::UpdateCriterion,
  person::{NewPerson, Person},
  sms::{NewSmsRecord, SmsRecord},
  status::Status,
  store::{PersonStore, SmsHistoryStore},
};

use crate::{
  encode::{RawPerson, RawSmsRecord, encode_date, encode_dt},
  schema::SCHEMA,
};

const PERSON_COLS: &str = "id, name, phone, date, status, list_number, \
                           receipt_number, register_number, request_name, files";

const SMS_COLS: &str = "id, to_number, message, status, delivery_status, error, sent_at";

fn person_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    id:              row.get(0)?,
    name:            row.get(1)?,
    phone:           row.get(2)?,
    date:            row.get(3)?,
    status:          row.get(4)?,
    list_number:     row.get(5)?,
    receipt_number:  row.get(6)?,
    register_number: row.get(7)?,
    request_name:    row.get(8)?,
    files:           row.get(9)?,
  })
}

fn sms_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSmsRecord> {
  Ok(RawSmsRecord {
    id:              row.get(0)?,
    to_number:       row.get(1)?,
    message:         row.get(2)?,
    status:          row.get(3)?,
    delivery_status: row.get(4)?,
    error:           row.get(5)?,
    sent_at:         row.get(6)?,
  })
}

/// Whether a backend error is a UNIQUE constraint violation — in this
/// schema that can only be `persons.list_number`.
fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(err, _))
      if err.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A sijil store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn fetch_person(&self, id: i64) -> Result<Option<Person>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM persons WHERE id = ?1"),
              rusqlite::params![id],
              person_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)?;

    raw.map(RawPerson::into_person).transpose()
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  async fn all(&self) -> Result<Vec<Person>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLS} FROM persons ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], person_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get(&self, id: i64) -> Result<Option<Person>> {
    self.fetch_person(id).await
  }

  async fn get_by_list_number(&self, list_number: &str) -> Result<Option<Person>> {
    let ln = list_number.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLS} FROM persons WHERE list_number = ?1"),
              rusqlite::params![ln],
              person_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn search(&self, term: &str) -> Result<Vec<Person>> {
    if term.trim().is_empty() {
      return Ok(Vec::new());
    }

    let pattern = format!("%{term}%");
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLS} FROM persons
           WHERE name LIKE ?1 OR phone LIKE ?1 OR list_number LIKE ?1
              OR receipt_number LIKE ?1 OR register_number LIKE ?1
              OR request_name LIKE ?1
           ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern], person_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn add(&self, input: NewPerson) -> Result<Person> {
    // The real id is the rowid assigned on insert.
    let person = input.into_person(0, Utc::now().date_naive());
    let list_number = person.list_number.clone();

    let p = person.clone();
    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (
             name, phone, date, status, list_number,
             receipt_number, register_number, request_name, files
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            p.name,
            p.phone,
            encode_date(p.date),
            p.status.as_str(),
            p.list_number,
            p.receipt_number,
            p.register_number,
            p.request_name,
            p.files,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    match result {
      Ok(id) => Ok(Person { id, ..person }),
      Err(ref e) if is_unique_violation(e) => Err(Error::DuplicateListNumber(list_number)),
      Err(e) => Err(Error::storage(e)),
    }
  }

  async fn update(&self, person: Person) -> Result<Person> {
    let p = person.clone();
    let result = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons SET
             name = ?1, phone = ?2, date = ?3, status = ?4, list_number = ?5,
             receipt_number = ?6, register_number = ?7, request_name = ?8, files = ?9
           WHERE id = ?10",
          rusqlite::params![
            p.name,
            p.phone,
            encode_date(p.date),
            p.status.as_str(),
            p.list_number,
            p.receipt_number,
            p.register_number,
            p.request_name,
            p.files,
            p.id,
          ],
        )?)
      })
      .await;

    let changes = match result {
      Ok(n) => n,
      Err(ref e) if is_unique_violation(e) => {
        return Err(Error::DuplicateListNumber(person.list_number));
      }
      Err(e) => return Err(Error::storage(e)),
    };

    if changes == 0 {
      return Err(Error::PersonNotFound(person.id));
    }
    Ok(person)
  }

  async fn set_status(&self, id: i64, status: Status) -> Result<Option<Person>> {
    let changes = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons SET status = ?1 WHERE id = ?2",
          rusqlite::params![status.as_str(), id],
        )?)
      })
      .await
      .map_err(Error::storage)?;

    if changes == 0 {
      return Ok(None);
    }
    self.fetch_person(id).await
  }

  async fn set_status_where(
    &self,
    criterion: UpdateCriterion,
    value: &str,
    status: Status,
  ) -> Result<Vec<Person>> {
    // The column name comes from a closed enum, never from caller input.
    let sql = format!(
      "UPDATE persons SET status = ?1 WHERE {} = ?2 RETURNING {PERSON_COLS}",
      criterion.column()
    );
    let value = value.to_owned();

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![status.as_str(), value], person_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn delete_by_id(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM persons WHERE id = ?1", rusqlite::params![id])?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn delete_by_list_number(&self, list_number: &str) -> Result<()> {
    let ln = list_number.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM persons WHERE list_number = ?1",
          rusqlite::params![ln],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }
}

// ─── SmsHistoryStore impl ────────────────────────────────────────────────────

impl SmsHistoryStore for SqliteStore {
  async fn append(&self, entry: NewSmsRecord) -> Result<SmsRecord> {
    let sent_at = Utc::now();
    let at_str = encode_dt(sent_at);

    let e = entry.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sms_history (
             to_number, message, status, delivery_status, error, sent_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            e.to_number,
            e.message,
            e.status.as_str(),
            e.delivery_status,
            e.error,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::storage)?;

    Ok(SmsRecord {
      id,
      to_number: entry.to_number,
      message: entry.message,
      status: entry.status,
      delivery_status: entry.delivery_status,
      error: entry.error,
      sent_at,
    })
  }

  async fn recent(&self, to_number: &str, within: Duration) -> Result<Vec<SmsRecord>> {
    let cutoff = encode_dt(Utc::now() - within);
    let to = to_number.to_owned();

    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SMS_COLS} FROM sms_history
           WHERE to_number = ?1 AND sent_at > ?2
           ORDER BY sent_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![to, cutoff], sms_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws.into_iter().map(RawSmsRecord::into_record).collect()
  }

  async fn has_recent_duplicate(&self, to_number: &str, within: Duration) -> Result<bool> {
    let cutoff = encode_dt(Utc::now() - within);
    let to = to_number.to_owned();

    let hit: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM sms_history
               WHERE to_number = ?1 AND sent_at > ?2
               LIMIT 1",
              rusqlite::params![to, cutoff],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)?;

    Ok(hit.is_some())
  }

  async fn history(&self) -> Result<Vec<SmsRecord>> {
    let raws = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SMS_COLS} FROM sms_history ORDER BY sent_at DESC, id DESC"
        ))?;
        let rows = stmt
          .query_map([], sms_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)?;

    raws.into_iter().map(RawSmsRecord::into_record).collect()
  }
}
