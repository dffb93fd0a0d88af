//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, NaiveDate, Utc};
use sijil_core::{
  Error,
  criteria::UpdateCriterion,
  person::NewPerson,
  sms::{NewSmsRecord, SendStatus},
  status::Status,
  store::{PersonStore, SmsHistoryStore},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn person_input(list_number: &str) -> NewPerson {
  NewPerson {
    name:            "Layla Haddad".into(),
    phone:           "+4512345678".into(),
    date:            None,
    status:          Status::Received,
    list_number:     list_number.into(),
    receipt_number:  format!("R-{list_number}"),
    register_number: format!("G-{list_number}"),
    request_name:    "renewal".into(),
    files:           None,
  }
}

fn sms_input(to: &str) -> NewSmsRecord {
  NewSmsRecord {
    to_number:       to.into(),
    message:         "pickup".into(),
    status:          SendStatus::Sent,
    delivery_status: "queued".into(),
    error:           None,
  }
}

// ─── Persons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_round_trip() {
  let s = store().await;

  let person = s.add(person_input("L-1")).await.unwrap();
  assert!(person.id > 0);
  assert_eq!(person.date, Utc::now().date_naive());

  let fetched = s.get(person.id).await.unwrap().unwrap();
  assert_eq!(fetched, person);

  let by_ln = s.get_by_list_number("L-1").await.unwrap().unwrap();
  assert_eq!(by_ln, person);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(42).await.unwrap().is_none());
  assert!(s.get_by_list_number("L-404").await.unwrap().is_none());
}

#[tokio::test]
async fn add_duplicate_list_number_is_rejected() {
  let s = store().await;
  s.add(person_input("L-1")).await.unwrap();

  let err = s.add(person_input("L-1")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateListNumber(ref ln) if ln == "L-1"));
  assert_eq!(s.all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn add_keeps_explicit_date_and_files() {
  let s = store().await;
  let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

  let mut input = person_input("L-1");
  input.date = Some(date);
  input.files = Some("scan.pdf;photo.jpg".into());

  let person = s.add(input).await.unwrap();
  let fetched = s.get(person.id).await.unwrap().unwrap();
  assert_eq!(fetched.date, date);
  assert_eq!(fetched.files.as_deref(), Some("scan.pdf;photo.jpg"));
}

#[tokio::test]
async fn all_is_ordered_by_date_then_id_descending() {
  let s = store().await;

  let mut older = person_input("L-1");
  older.date = NaiveDate::from_ymd_opt(2024, 1, 1);
  let mut newer = person_input("L-2");
  newer.date = NaiveDate::from_ymd_opt(2024, 2, 1);
  let mut same_day = person_input("L-3");
  same_day.date = NaiveDate::from_ymd_opt(2024, 2, 1);

  s.add(older).await.unwrap();
  s.add(newer).await.unwrap();
  s.add(same_day).await.unwrap();

  let list_numbers: Vec<_> = s
    .all()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.list_number)
    .collect();
  assert_eq!(list_numbers, ["L-3", "L-2", "L-1"]);
}

#[tokio::test]
async fn search_empty_term_is_empty() {
  let s = store().await;
  s.add(person_input("L-1")).await.unwrap();

  assert!(s.search("").await.unwrap().is_empty());
  assert!(s.search("  ").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_covers_the_six_fields() {
  let s = store().await;
  s.add(person_input("L-1")).await.unwrap();
  s.add(person_input("L-2")).await.unwrap();

  assert_eq!(s.search("layla").await.unwrap().len(), 2);
  assert_eq!(s.search("4512345678").await.unwrap().len(), 2);

  let hits = s.search("G-L-1").await.unwrap();
  assert_eq!(hits.len(), 1);
  assert_eq!(hits[0].list_number, "L-1");

  assert!(s.search("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_all_fields() {
  let s = store().await;
  let mut person = s.add(person_input("L-1")).await.unwrap();

  person.name = "Omar Nasser".into();
  person.phone = "+96655512345".into();
  person.status = Status::SentToAuthority;
  person.request_name = "new request".into();
  person.files = Some("scan.pdf".into());

  let updated = s.update(person.clone()).await.unwrap();
  assert_eq!(updated, person);
  assert_eq!(s.get(person.id).await.unwrap().unwrap(), person);
}

#[tokio::test]
async fn update_unknown_id_errors() {
  let s = store().await;
  let mut person = s.add(person_input("L-1")).await.unwrap();
  person.id += 100;
  person.list_number = "L-99".into();

  let err = s.update(person).await.unwrap_err();
  assert!(matches!(err, Error::PersonNotFound(_)));
}

#[tokio::test]
async fn update_cannot_steal_a_list_number() {
  let s = store().await;
  s.add(person_input("L-1")).await.unwrap();
  let mut second = s.add(person_input("L-2")).await.unwrap();

  second.list_number = "L-1".into();
  let err = s.update(second).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateListNumber(_)));
}

#[tokio::test]
async fn set_status_returns_none_for_unknown_id() {
  let s = store().await;
  assert!(s.set_status(42, Status::Ready).await.unwrap().is_none());
}

#[tokio::test]
async fn set_status_updates_and_returns_the_person() {
  let s = store().await;
  let person = s.add(person_input("L-1")).await.unwrap();

  let updated = s.set_status(person.id, Status::Ready).await.unwrap().unwrap();
  assert_eq!(updated.status, Status::Ready);
  assert_eq!(updated.id, person.id);
}

#[tokio::test]
async fn set_status_where_updates_every_match() {
  let s = store().await;
  let mut a = person_input("L-1");
  a.register_number = "G-BATCH".into();
  let mut b = person_input("L-2");
  b.register_number = "G-BATCH".into();
  s.add(a).await.unwrap();
  s.add(b).await.unwrap();
  s.add(person_input("L-3")).await.unwrap();

  let updated = s
    .set_status_where(UpdateCriterion::RegisterNumber, "G-BATCH", Status::Ready)
    .await
    .unwrap();
  assert_eq!(updated.len(), 2);
  assert!(updated.iter().all(|p| p.status == Status::Ready));

  let untouched = s.get_by_list_number("L-3").await.unwrap().unwrap();
  assert_eq!(untouched.status, Status::Received);
}

#[tokio::test]
async fn set_status_where_no_match_is_empty() {
  let s = store().await;
  s.add(person_input("L-1")).await.unwrap();

  let updated = s
    .set_status_where(UpdateCriterion::ListNumber, "L-404", Status::Ready)
    .await
    .unwrap();
  assert!(updated.is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
  let s = store().await;
  let person = s.add(person_input("L-1")).await.unwrap();

  s.delete_by_id(person.id).await.unwrap();
  assert!(s.get(person.id).await.unwrap().is_none());
  s.delete_by_id(person.id).await.unwrap();

  let second = s.add(person_input("L-2")).await.unwrap();
  s.delete_by_list_number("L-2").await.unwrap();
  assert!(s.get(second.id).await.unwrap().is_none());
  s.delete_by_list_number("L-2").await.unwrap();
}

// ─── SMS history ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_assigns_id_and_sent_at() {
  let s = store().await;
  let before = Utc::now();

  let record = s.append(sms_input("+4512345678")).await.unwrap();
  assert!(record.id > 0);
  assert!(record.sent_at >= before);

  let history = s.history().await.unwrap();
  assert_eq!(history, vec![record]);
}

#[tokio::test]
async fn failed_attempts_round_trip() {
  let s = store().await;

  let mut input = sms_input("+4512345678");
  input.status = SendStatus::Failed;
  input.delivery_status = "failed".into();
  input.error = Some("Invalid phone number format".into());

  let record = s.append(input).await.unwrap();
  let history = s.history().await.unwrap();
  assert_eq!(history[0].status, SendStatus::Failed);
  assert_eq!(history[0].error.as_deref(), Some("Invalid phone number format"));
  assert_eq!(history[0].id, record.id);
}

#[tokio::test]
async fn history_is_newest_first() {
  let s = store().await;
  s.append(sms_input("+4512345678")).await.unwrap();
  s.append(sms_input("+15551234567")).await.unwrap();

  let history = s.history().await.unwrap();
  assert_eq!(history.len(), 2);
  assert!(history[0].id > history[1].id);
}

#[tokio::test]
async fn recent_is_scoped_to_number_and_window() {
  let s = store().await;
  s.append(sms_input("+4512345678")).await.unwrap();
  s.append(sms_input("+15551234567")).await.unwrap();

  let recent = s.recent("+4512345678", Duration::hours(24)).await.unwrap();
  assert_eq!(recent.len(), 1);
  assert_eq!(recent[0].to_number, "+4512345678");

  assert!(
    s.has_recent_duplicate("+4512345678", Duration::hours(24))
      .await
      .unwrap()
  );
  assert!(
    !s.has_recent_duplicate("+4599999999", Duration::hours(24))
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn duplicate_detection_expires_with_the_window() {
  let s = store().await;
  s.append(sms_input("+4512345678")).await.unwrap();

  tokio::time::sleep(std::time::Duration::from_millis(60)).await;
  assert!(
    !s.has_recent_duplicate("+4512345678", Duration::milliseconds(10))
      .await
      .unwrap()
  );
  assert!(
    s.recent("+4512345678", Duration::milliseconds(10))
      .await
      .unwrap()
      .is_empty()
  );
}
