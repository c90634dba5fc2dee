//! Labels attached to persons and tools.

use crate::entity::Entity;
use crate::error::AppError;
use crate::query::predicate::NAME;
use crate::query::{Column, Referent, SortWhitelist};
use crate::service::{self, RequestValidator, SaveRequest, MAX_NAME_LENGTH};
use crate::sql::{self, PgBindValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

const MAX_COLOR_LENGTH: usize = 32;

pub struct Label;

impl Referent for Label {
    const KIND: &'static str = "label";
    const TABLE: &'static str = "labels";
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LabelRow {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLabel {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveLabel {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)?;
        RequestValidator::optional_text("color", self.color.as_deref(), MAX_COLOR_LENGTH)
    }
}

impl SaveLabel {
    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("color", PgBindValue::OptString(self.color.clone())),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Label {
    const PATH: &'static str = "labels";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::with_name(NAME);
    const COLUMNS: &'static [&'static str] = &["id", "name", "color", "is_archived", "created_at", "updated_at"];

    type Summary = LabelRow;
    type Detail = LabelRow;
    type Save = SaveLabel;

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<LabelRow>, AppError> {
        service::fetch_by_id(conn, Self::TABLE, Self::COLUMNS, id).await
    }

    async fn insert(conn: &mut PgConnection, req: &SaveLabel) -> Result<i64, AppError> {
        service::insert_returning_id(conn, &sql::insert(Self::TABLE, req.scalar_fields())).await
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveLabel) -> Result<(), AppError> {
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}
