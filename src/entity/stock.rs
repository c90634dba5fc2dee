//! Stock items: quantities held at a location.

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

pub struct Stock;

impl Referent for Stock {
    const KIND: &'static str = "stock";
    const TABLE: &'static str = "stocks";
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub quantity: i32,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStock {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveStock {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)?;
        RequestValidator::optional_text("location", self.location.as_deref(), MAX_NAME_LENGTH)?;
        RequestValidator::non_negative("quantity", i64::from(self.quantity))
    }
}

impl SaveStock {
    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("location", PgBindValue::OptString(self.location.clone())),
            ("quantity", PgBindValue::I32(self.quantity)),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Stock {
    const PATH: &'static str = "stocks";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::with_name(NAME);
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "uuid",
        "name",
        "location",
        "quantity",
        "is_archived",
        "created_at",
        "updated_at",
    ];

    type Summary = StockRow;
    type Detail = StockRow;
    type Save = SaveStock;

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<StockRow>, AppError> {
        service::fetch_by_id(conn, Self::TABLE, Self::COLUMNS, id).await
    }

    async fn insert(conn: &mut PgConnection, req: &SaveStock) -> Result<i64, AppError> {
        let mut values = vec![("uuid", PgBindValue::Uuid(Uuid::new_v4()))];
        values.extend(req.scalar_fields());
        service::insert_returning_id(conn, &sql::insert(Self::TABLE, values)).await
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveStock) -> Result<(), AppError> {
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_quantity_fails_validation() {
        let req: SaveStock = serde_json::from_value(serde_json::json!({ "name": "Bolts", "quantity": -3 })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let req: SaveStock = serde_json::from_value(serde_json::json!({ "name": "Bolts" })).unwrap();
        assert_eq!(req.id, None);
        assert_eq!(req.quantity, 0);
        assert!(!req.is_archived);
        assert!(req.validate().is_ok());
    }
}
