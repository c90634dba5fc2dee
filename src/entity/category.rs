//! Two-level category tree. A category without a parent is a root.

use crate::entity::{Entity, RefSummary};
use crate::error::AppError;
use crate::extractors::ListParams;
use crate::query::predicate::{NAME, PARENT_ID};
use crate::query::{flags, resolve_opt, Column, Predicate, Ref, Referent, SortWhitelist};
use crate::service::{self, RequestValidator, SaveRequest, MAX_NAME_LENGTH};
use crate::sql::{self, PgBindValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

pub struct Category;

impl Referent for Category {
    const KIND: &'static str = "category";
    const TABLE: &'static str = "categories";
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRow {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub parent_id: Option<i64>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub parent: Option<RefSummary>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCategory {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveCategory {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)?;
        RequestValidator::ids("parentId", self.parent_id.iter())?;
        if self.id.is_some() && self.id == self.parent_id {
            return Err(AppError::Validation("a category cannot be its own parent".into()));
        }
        Ok(())
    }
}

impl SaveCategory {
    fn parent(&self) -> Option<Ref<Category>> {
        resolve_opt(self.parent_id)
    }

    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("parent_id", PgBindValue::OptI64(self.parent().map(|r| r.id()))),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Category {
    const PATH: &'static str = "categories";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::timestamps_only();
    const COLUMNS: &'static [&'static str] =
        &["id", "uuid", "name", "parent_id", "is_archived", "created_at", "updated_at"];

    type Summary = CategoryRow;
    type Detail = CategoryDetail;
    type Save = SaveCategory;

    fn extra_filters(params: &ListParams) -> Vec<Option<Predicate>> {
        vec![params.is_parent.map(|is_parent| flags::hierarchy(PARENT_ID, is_parent))]
    }

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<CategoryDetail>, AppError> {
        let Some(row) = service::fetch_by_id::<CategoryRow>(conn, Self::TABLE, Self::COLUMNS, id).await? else {
            return Ok(None);
        };
        let parent = service::reference_summary::<Category>(conn, resolve_opt(row.parent_id), "name").await?;
        Ok(Some(CategoryDetail {
            id: row.id,
            uuid: row.uuid,
            name: row.name,
            parent,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    async fn insert(conn: &mut PgConnection, req: &SaveCategory) -> Result<i64, AppError> {
        let mut values = vec![("uuid", PgBindValue::Uuid(Uuid::new_v4()))];
        values.extend(req.scalar_fields());
        service::insert_returning_id(conn, &sql::insert(Self::TABLE, values)).await
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveCategory) -> Result<(), AppError> {
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save(id: Option<i64>, parent_id: Option<i64>) -> SaveCategory {
        SaveCategory {
            id,
            name: "Hand tools".into(),
            parent_id,
            is_archived: false,
        }
    }

    #[test]
    fn self_parent_is_rejected() {
        assert!(save(Some(3), Some(3)).validate().is_err());
        assert!(save(Some(3), Some(4)).validate().is_ok());
        assert!(save(None, None).validate().is_ok());
    }

    #[test]
    fn parent_binds_as_nullable_id() {
        let fields = save(None, None).scalar_fields();
        assert!(fields.contains(&("parent_id", PgBindValue::OptI64(None))));
        let fields = save(None, Some(8)).scalar_fields();
        assert!(fields.contains(&("parent_id", PgBindValue::OptI64(Some(8)))));
    }
}
