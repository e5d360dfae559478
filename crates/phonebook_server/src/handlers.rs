//! HTTP handlers for the person resource.
//!
//! Store work is synchronous, so each handler hands it to the blocking pool
//! and only that request waits on it.

use crate::error::{error_response, ApiError, UNKNOWN_ENDPOINT_MESSAGE};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Response};
use axum::Json;
use phonebook_core::{Person, PersonService, PersonStore, ServiceResult};
use serde::Deserialize;
use std::sync::Arc;

pub type AppState<S> = Arc<PersonService<S>>;

/// Request body for create and update.
///
/// Absent fields decode as empty strings and then fail validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonPayload {
    pub name: String,
    pub number: String,
}

async fn run_blocking<S, T, F>(service: AppState<S>, op: F) -> Result<T, ApiError>
where
    S: PersonStore + 'static,
    T: Send + 'static,
    F: FnOnce(&PersonService<S>) -> ServiceResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(ApiError::Task)?;
    Ok(result?)
}

pub async fn list_persons<S: PersonStore + 'static>(
    State(service): State<AppState<S>>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let persons = run_blocking(service, |service| service.list()).await?;
    Ok(Json(persons))
}

pub async fn get_person<S: PersonStore + 'static>(
    State(service): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = run_blocking(service, move |service| service.get(&id)).await?;
    Ok(Json(person))
}

pub async fn create_person<S: PersonStore + 'static>(
    State(service): State<AppState<S>>,
    payload: Result<Json<PersonPayload>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(PersonPayload { name, number }) = payload?;
    let person = run_blocking(service, move |service| service.create(name, number)).await?;
    Ok(Json(person))
}

pub async fn update_person<S: PersonStore + 'static>(
    State(service): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<PersonPayload>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(PersonPayload { name, number }) = payload?;
    let person = run_blocking(service, move |service| service.update(&id, name, number)).await?;
    Ok(Json(person))
}

pub async fn delete_person<S: PersonStore + 'static>(
    State(service): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    run_blocking(service, move |service| service.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn info<S: PersonStore + 'static>(
    State(service): State<AppState<S>>,
) -> Result<Html<String>, ApiError> {
    let info = run_blocking(service, |service| service.info()).await?;
    Ok(Html(info.to_html()))
}

pub async fn unknown_endpoint() -> Response {
    error_response(StatusCode::NOT_FOUND, UNKNOWN_ENDPOINT_MESSAGE)
}
