//! Tools: a brand, a category and a set of labels.

use crate::entity::{Brand, Category, Entity, Label, RefSummary};
use crate::error::AppError;
use crate::query::predicate::NAME;
use crate::query::{resolve_opt, resolve_set, Association, Column, Ref, Referent, SortWhitelist};
use crate::service::{self, RequestValidator, SaveRequest, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
use crate::sql::{self, PgBindValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

pub struct Tool;

impl Referent for Tool {
    const KIND: &'static str = "tool";
    const TABLE: &'static str = "tools";
}

pub const TOOL_LABELS: Association<Tool, Label> = Association::new("tool_labels", "tool_id", "label_id");

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ToolRow {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub brand_id: Option<i64>,
    pub category_id: Option<i64>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetail {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<RefSummary>,
    pub category: Option<RefSummary>,
    pub labels: Vec<RefSummary>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTool {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub label_ids: Vec<i64>,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveTool {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)?;
        RequestValidator::optional_text("description", self.description.as_deref(), MAX_TEXT_LENGTH)?;
        RequestValidator::ids("brandId", self.brand_id.iter())?;
        RequestValidator::ids("categoryId", self.category_id.iter())?;
        RequestValidator::ids("labelIds", &self.label_ids)
    }
}

impl SaveTool {
    fn brand(&self) -> Option<Ref<Brand>> {
        resolve_opt(self.brand_id)
    }

    fn category(&self) -> Option<Ref<Category>> {
        resolve_opt(self.category_id)
    }

    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("description", PgBindValue::OptString(self.description.clone())),
            ("brand_id", PgBindValue::OptI64(self.brand().map(|r| r.id()))),
            ("category_id", PgBindValue::OptI64(self.category().map(|r| r.id()))),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Tool {
    const PATH: &'static str = "tools";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::with_name(NAME);
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "uuid",
        "name",
        "description",
        "brand_id",
        "category_id",
        "is_archived",
        "created_at",
        "updated_at",
    ];

    type Summary = ToolRow;
    type Detail = ToolDetail;
    type Save = SaveTool;

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<ToolDetail>, AppError> {
        let Some(row) = service::fetch_by_id::<ToolRow>(conn, Self::TABLE, Self::COLUMNS, id).await? else {
            return Ok(None);
        };
        let brand = service::reference_summary::<Brand>(conn, resolve_opt(row.brand_id), "name").await?;
        let category = service::reference_summary::<Category>(conn, resolve_opt(row.category_id), "name").await?;
        let labels = service::linked_summaries(conn, &TOOL_LABELS, id).await?;
        Ok(Some(ToolDetail {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            description: row.description,
            brand,
            category,
            labels,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    async fn insert(conn: &mut PgConnection, req: &SaveTool) -> Result<i64, AppError> {
        let mut values = vec![("uuid", PgBindValue::Uuid(Uuid::new_v4()))];
        values.extend(req.scalar_fields());
        let id = service::insert_returning_id(conn, &sql::insert(Self::TABLE, values)).await?;
        let labels: Vec<Ref<Label>> = resolve_set(req.label_ids.iter().copied());
        service::replace_links(conn, &TOOL_LABELS, id, &labels).await?;
        Ok(id)
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveTool) -> Result<(), AppError> {
        let labels: Vec<Ref<Label>> = resolve_set(req.label_ids.iter().copied());
        service::replace_links(conn, &TOOL_LABELS, id, &labels).await?;
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_references_bind_as_nullable_ids() {
        let req: SaveTool = serde_json::from_value(serde_json::json!({
            "name": "Hammer",
            "brandId": 2
        }))
        .unwrap();
        let fields = req.scalar_fields();
        assert!(fields.contains(&("brand_id", PgBindValue::OptI64(Some(2)))));
        assert!(fields.contains(&("category_id", PgBindValue::OptI64(None))));
        assert!(req.label_ids.is_empty());
    }

    #[test]
    fn non_positive_reference_fails_validation() {
        let req: SaveTool =
            serde_json::from_value(serde_json::json!({ "name": "Hammer", "categoryId": 0 })).unwrap();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}
