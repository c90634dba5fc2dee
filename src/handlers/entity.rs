//! Entity handlers: list, get by id, save (create or update), delete.
//! Generic over the entity family; routes instantiate one set per family.

use crate::entity::{Entity, HardDelete};
use crate::error::AppError;
use crate::extractors::ListParams;
use crate::response::{self, ListBody};
use crate::service::{CrudService, SaveOutcome, SaveRequest};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};

/// Prefix under which entity routes are nested; used for `Location`.
pub const API_PREFIX: &str = "/api/v1";

pub async fn list<E: Entity>(
    State(state): State<AppState>,
    params: ListParams,
) -> Result<Json<ListBody<E::Summary>>, AppError> {
    let query = E::list_query(&params, &state.query)?;
    let page = CrudService::list::<E>(&state.pool, &query).await?;
    Ok(Json(ListBody::from(page)))
}

pub async fn read<E: Entity>(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<E::Detail>, AppError> {
    let detail = CrudService::read::<E>(&state.pool, id).await?;
    Ok(Json(detail))
}

/// No `id` in the body creates (201 + Location), an `id` updates (204).
pub async fn save<E: Entity>(
    State(state): State<AppState>,
    body: Result<Json<E::Save>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    req.validate()?;
    match CrudService::save::<E>(&state.pool, &req).await? {
        SaveOutcome::Created(id) => Ok(response::created(format!("{}/{}/{}", API_PREFIX, E::PATH, id), id)),
        SaveOutcome::Updated(_) => Ok(response::no_content()),
    }
}

pub async fn delete<E: HardDelete>(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Response, AppError> {
    CrudService::delete::<E>(&state.pool, id).await?;
    Ok(response::no_content())
}
