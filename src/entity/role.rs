//! Roles held by persons.

use crate::entity::Entity;
use crate::error::AppError;
use crate::query::predicate::NAME;
use crate::query::{Column, Referent, SortWhitelist};
use crate::service::{self, RequestValidator, SaveRequest, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
use crate::sql::{self, PgBindValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

pub struct Role;

impl Referent for Role {
    const KIND: &'static str = "role";
    const TABLE: &'static str = "roles";
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRole {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveRole {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)?;
        RequestValidator::optional_text("description", self.description.as_deref(), MAX_TEXT_LENGTH)
    }
}

impl SaveRole {
    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("description", PgBindValue::OptString(self.description.clone())),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Role {
    const PATH: &'static str = "roles";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::with_name(NAME);
    const COLUMNS: &'static [&'static str] = &["id", "name", "description", "is_archived", "created_at", "updated_at"];

    type Summary = RoleRow;
    type Detail = RoleRow;
    type Save = SaveRole;

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<RoleRow>, AppError> {
        service::fetch_by_id(conn, Self::TABLE, Self::COLUMNS, id).await
    }

    async fn insert(conn: &mut PgConnection, req: &SaveRole) -> Result<i64, AppError> {
        service::insert_returning_id(conn, &sql::insert(Self::TABLE, req.scalar_fields())).await
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveRole) -> Result<(), AppError> {
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}
