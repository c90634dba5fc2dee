//! Response envelope helpers.

use crate::service::Page;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// One page of a list endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBody<T> {
    pub items: Vec<T>,
    pub total_items: i64,
}

impl<T> From<Page<T>> for ListBody<T> {
    fn from(page: Page<T>) -> Self {
        ListBody {
            items: page.items,
            total_items: page.total_items,
        }
    }
}

#[derive(Serialize)]
pub struct CreatedBody {
    pub id: i64,
}

/// 201 with a `Location` header pointing at the new row.
pub fn created(location: String, id: i64) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreatedBody { id }),
    )
        .into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
