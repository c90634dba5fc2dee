//! Brands referenced by tools.

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
use uuid::Uuid;

pub struct Brand;

impl Referent for Brand {
    const KIND: &'static str = "brand";
    const TABLE: &'static str = "brands";
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BrandRow {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBrand {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveBrand {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)
    }
}

impl SaveBrand {
    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Brand {
    const PATH: &'static str = "brands";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::with_name(NAME);
    const COLUMNS: &'static [&'static str] = &["id", "uuid", "name", "is_archived", "created_at", "updated_at"];

    type Summary = BrandRow;
    type Detail = BrandRow;
    type Save = SaveBrand;

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<BrandRow>, AppError> {
        service::fetch_by_id(conn, Self::TABLE, Self::COLUMNS, id).await
    }

    async fn insert(conn: &mut PgConnection, req: &SaveBrand) -> Result<i64, AppError> {
        let mut values = vec![("uuid", PgBindValue::Uuid(Uuid::new_v4()))];
        values.extend(req.scalar_fields());
        service::insert_returning_id(conn, &sql::insert(Self::TABLE, values)).await
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveBrand) -> Result<(), AppError> {
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}
