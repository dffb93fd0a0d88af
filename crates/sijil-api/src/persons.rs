//! Handlers for `/persons` CRUD and search.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | Full set, creation date descending |
//! | `POST`   | `/persons` | Body: [`NewPerson`]; 400 on duplicate list number |
//! | `GET`    | `/persons/search` | `?term=`; empty term yields `[]` |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `PUT`    | `/persons/:id` | Full replace; 404 if not found |
//! | `DELETE` | `/persons/:id` | Idempotent |
//! | `DELETE` | `/persons/by-list-number/:ln` | Idempotent |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sijil_core::{
  person::{NewPerson, Person},
  status::Status,
  store::Store,
};
use sijil_notify::SmsGateway;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let persons = state.store.all().await?;
  Ok(Json(persons))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons` — returns 201 + the stored person.
pub async fn create<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let person = state.store.add(body).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub term: Option<String>,
}

/// `GET /persons/search?term=...` — a missing or empty term yields `[]`,
/// never the full set.
pub async fn search<S, G>(
  State(state): State<ApiState<S, G>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let Some(term) = params.term else {
    return Ok(Json(Vec::new()));
  };
  let persons = state.store.search(&term).await?;
  Ok(Json(persons))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let person = state
    .store
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /persons/:id` — every field of the record;
/// the id comes from the path.
#[derive(Debug, Deserialize)]
pub struct UpdatePersonBody {
  pub name:            String,
  pub phone:           String,
  pub date:            NaiveDate,
  pub status:          Status,
  pub list_number:     String,
  pub receipt_number:  String,
  pub register_number: String,
  pub request_name:    String,
  pub files:           Option<String>,
}

/// `PUT /persons/:id` — full replace.
pub async fn update_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdatePersonBody>,
) -> Result<Json<Person>, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  let person = Person {
    id,
    name:            body.name,
    phone:           body.phone,
    date:            body.date,
    status:          body.status,
    list_number:     body.list_number,
    receipt_number:  body.receipt_number,
    register_number: body.register_number,
    request_name:    body.request_name,
    files:           body.files,
  };
  let updated = state.store.update(person).await?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/:id` — deleting a missing person still succeeds.
pub async fn delete_by_id<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  state.store.delete_by_id(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /persons/by-list-number/:list_number` — idempotent as well.
pub async fn delete_by_list_number<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(list_number): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: Store,
  G: SmsGateway,
{
  state.store.delete_by_list_number(&list_number).await?;
  Ok(StatusCode::NO_CONTENT)
}
