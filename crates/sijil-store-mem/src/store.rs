//! [`MemStore`] — the in-memory implementation of the sijil store traits.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use sijil_core::{
  Error, Result,
  criteria::UpdateCriterion,
  person::{NewPerson, Person},
  sms::{NewSmsRecord, SmsRecord},
  status::Status,
  store::{PersonStore, SmsHistoryStore},
};

#[derive(Default)]
struct Inner {
  persons:        Vec<Person>,
  next_person_id: i64,
  sms:            Vec<SmsRecord>,
  next_sms_id:    i64,
}

/// An in-memory store. Cloning is cheap — clones share the same state,
/// which is owned explicitly by whoever holds the last handle; there is no
/// module-level singleton.
#[derive(Clone, Default)]
pub struct MemStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemStore {
  pub fn new() -> Self { Self::default() }
}

fn ordered(mut persons: Vec<Person>) -> Vec<Person> {
  persons.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
  persons
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for MemStore {
  async fn all(&self) -> Result<Vec<Person>> {
    let inner = self.inner.read().await;
    Ok(ordered(inner.persons.clone()))
  }

  async fn get(&self, id: i64) -> Result<Option<Person>> {
    let inner = self.inner.read().await;
    Ok(inner.persons.iter().find(|p| p.id == id).cloned())
  }

  async fn get_by_list_number(&self, list_number: &str) -> Result<Option<Person>> {
    let inner = self.inner.read().await;
    Ok(
      inner
        .persons
        .iter()
        .find(|p| p.list_number == list_number)
        .cloned(),
    )
  }

  async fn search(&self, term: &str) -> Result<Vec<Person>> {
    if term.trim().is_empty() {
      return Ok(Vec::new());
    }
    let inner = self.inner.read().await;
    Ok(ordered(
      inner
        .persons
        .iter()
        .filter(|p| p.matches(term))
        .cloned()
        .collect(),
    ))
  }

  async fn add(&self, input: NewPerson) -> Result<Person> {
    let mut inner = self.inner.write().await;
    if inner.persons.iter().any(|p| p.list_number == input.list_number) {
      return Err(Error::DuplicateListNumber(input.list_number));
    }
    inner.next_person_id += 1;
    let person = input.into_person(inner.next_person_id, Utc::now().date_naive());
    inner.persons.push(person.clone());
    Ok(person)
  }

  async fn update(&self, person: Person) -> Result<Person> {
    let mut inner = self.inner.write().await;
    if inner
      .persons
      .iter()
      .any(|p| p.id != person.id && p.list_number == person.list_number)
    {
      return Err(Error::DuplicateListNumber(person.list_number));
    }
    let slot = inner
      .persons
      .iter_mut()
      .find(|p| p.id == person.id)
      .ok_or(Error::PersonNotFound(person.id))?;
    *slot = person.clone();
    Ok(person)
  }

  async fn set_status(&self, id: i64, status: Status) -> Result<Option<Person>> {
    let mut inner = self.inner.write().await;
    Ok(inner.persons.iter_mut().find(|p| p.id == id).map(|p| {
      p.status = status;
      p.clone()
    }))
  }

  async fn set_status_where(
    &self,
    criterion: UpdateCriterion,
    value: &str,
    status: Status,
  ) -> Result<Vec<Person>> {
    let mut inner = self.inner.write().await;
    let mut updated = Vec::new();
    for person in &mut inner.persons {
      if criterion.value_of(person) == value {
        person.status = status;
        updated.push(person.clone());
      }
    }
    Ok(updated)
  }

  async fn delete_by_id(&self, id: i64) -> Result<()> {
    let mut inner = self.inner.write().await;
    inner.persons.retain(|p| p.id != id);
    Ok(())
  }

  async fn delete_by_list_number(&self, list_number: &str) -> Result<()> {
    let mut inner = self.inner.write().await;
    inner.persons.retain(|p| p.list_number != list_number);
    Ok(())
  }
}

// ─── SmsHistoryStore impl ────────────────────────────────────────────────────

impl SmsHistoryStore for MemStore {
  async fn append(&self, entry: NewSmsRecord) -> Result<SmsRecord> {
    let mut inner = self.inner.write().await;
    inner.next_sms_id += 1;
    let record = SmsRecord {
      id:              inner.next_sms_id,
      to_number:       entry.to_number,
      message:         entry.message,
      status:          entry.status,
      delivery_status: entry.delivery_status,
      error:           entry.error,
      sent_at:         Utc::now(),
    };
    inner.sms.push(record.clone());
    Ok(record)
  }

  async fn recent(&self, to_number: &str, within: Duration) -> Result<Vec<SmsRecord>> {
    let cutoff = Utc::now() - within;
    let inner = self.inner.read().await;
    let mut records: Vec<SmsRecord> = inner
      .sms
      .iter()
      .filter(|r| r.to_number == to_number && r.sent_at > cutoff)
      .cloned()
      .collect();
    records.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
    Ok(records)
  }

  async fn has_recent_duplicate(&self, to_number: &str, within: Duration) -> Result<bool> {
    let cutoff = Utc::now() - within;
    let inner = self.inner.read().await;
    Ok(
      inner
        .sms
        .iter()
        .any(|r| r.to_number == to_number && r.sent_at > cutoff),
    )
  }

  async fn history(&self) -> Result<Vec<SmsRecord>> {
    let inner = self.inner.read().await;
    let mut records = inner.sms.clone();
    records.sort_by(|a, b| b.sent_at.cmp(&a.sent_at).then(b.id.cmp(&a.id)));
    Ok(records)
  }
}
