//! Extract and validate list query parameters (`page`, `size`, `name`,
//! `isArchived`, `sort`, plus the per-entity `isParent` and `toolId`).

use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, extract::Query, http::request::Parts};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListParams {
    /// 1-indexed; range checked by `PageRequest::from_ui`.
    pub page: i64,
    pub size: i64,
    pub name: Option<String>,
    /// Defaults to `false` when not supplied.
    pub is_archived: bool,
    pub sort: Option<String>,
    pub is_parent: Option<bool>,
    pub tool_id: Option<i64>,
}

impl ListParams {
    pub fn from_query(raw: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(ListParams {
            page: required_int(raw, "page")?,
            size: required_int(raw, "size")?,
            name: raw.get("name").cloned(),
            is_archived: optional_bool(raw, "isArchived")?.unwrap_or(false),
            sort: raw.get("sort").cloned(),
            is_parent: optional_bool(raw, "isParent")?,
            tool_id: optional_int(raw, "toolId")?,
        })
    }
}

fn required_int(raw: &HashMap<String, String>, key: &str) -> Result<i64, AppError> {
    optional_int(raw, key)?.ok_or_else(|| AppError::Validation(format!("{} is required", key)))
}

fn optional_int(raw: &HashMap<String, String>, key: &str) -> Result<Option<i64>, AppError> {
    match raw.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be an integer, got '{}'", key, v))),
    }
}

fn optional_bool(raw: &HashMap<String, String>, key: &str) -> Result<Option<bool>, AppError> {
    match raw.get(key).map(|v| v.trim()) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(v) => Err(AppError::Validation(format!("{} must be true or false, got '{}'", key, v))),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::Validation(e.body_text()))?;
        ListParams::from_query(&raw)
    }
}
