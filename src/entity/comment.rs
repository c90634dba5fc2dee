//! Free-text comments attached to a tool. The only family with physical
//! deletion.

use crate::entity::{Entity, HardDelete, RefSummary, Tool};
use crate::error::AppError;
use crate::extractors::ListParams;
use crate::query::{resolve, Column, Predicate, Ref, Referent, SortWhitelist, SqlValue};
use crate::service::{self, RequestValidator, SaveRequest, MAX_TEXT_LENGTH};
use crate::sql::{self, PgBindValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

pub const CONTENT: Column = Column::new("content");
pub const TOOL_ID: Column = Column::new("tool_id");

pub struct Comment;

impl Referent for Comment {
    const KIND: &'static str = "comment";
    const TABLE: &'static str = "comments";
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub id: i64,
    pub content: String,
    pub tool_id: i64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    pub id: i64,
    pub content: String,
    pub tool: Option<RefSummary>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveComment {
    #[serde(default)]
    pub id: Option<i64>,
    pub content: String,
    pub tool_id: i64,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SaveComment {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("content", &self.content, MAX_TEXT_LENGTH)?;
        RequestValidator::ids("toolId", [self.tool_id].iter())
    }
}

impl SaveComment {
    fn tool(&self) -> Ref<Tool> {
        resolve(self.tool_id)
    }

    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("content", PgBindValue::String(self.content.clone())),
            ("tool_id", PgBindValue::I64(self.tool().id())),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }
}

#[async_trait]
impl Entity for Comment {
    const PATH: &'static str = "comments";
    const SEARCH_COLUMN: Column = CONTENT;
    const SORTABLE: SortWhitelist = SortWhitelist::timestamps_only();
    const COLUMNS: &'static [&'static str] = &["id", "content", "tool_id", "is_archived", "created_at", "updated_at"];

    type Summary = CommentRow;
    type Detail = CommentDetail;
    type Save = SaveComment;

    fn extra_filters(params: &ListParams) -> Vec<Option<Predicate>> {
        vec![params.tool_id.map(|id| Predicate::Equals(TOOL_ID, SqlValue::Int(id)))]
    }

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<CommentDetail>, AppError> {
        let Some(row) = service::fetch_by_id::<CommentRow>(conn, Self::TABLE, Self::COLUMNS, id).await? else {
            return Ok(None);
        };
        let tool = service::reference_summary::<Tool>(conn, Some(resolve(row.tool_id)), "name").await?;
        Ok(Some(CommentDetail {
            id: row.id,
            content: row.content,
            tool,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    async fn insert(conn: &mut PgConnection, req: &SaveComment) -> Result<i64, AppError> {
        service::insert_returning_id(conn, &sql::insert(Self::TABLE, req.scalar_fields())).await
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SaveComment) -> Result<(), AppError> {
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}

impl HardDelete for Comment {}
