//! Persons, with label and role collections.

use crate::entity::{Entity, Label, RefSummary, Role};
use crate::error::AppError;
use crate::query::predicate::NAME;
use crate::query::{resolve_set, Association, Column, Ref, Referent, SortWhitelist};
use crate::service::{self, RequestValidator, SaveRequest, MAX_NAME_LENGTH};
use crate::sql::{self, PgBindValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use uuid::Uuid;

pub struct Person;

impl Referent for Person {
    const KIND: &'static str = "person";
    const TABLE: &'static str = "persons";
}

pub const PERSON_LABELS: Association<Person, Label> = Association::new("person_labels", "person_id", "label_id");
pub const PERSON_ROLES: Association<Person, Role> = Association::new("person_roles", "person_id", "role_id");

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersonRow {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetail {
    #[serde(flatten)]
    pub person: PersonRow,
    pub labels: Vec<RefSummary>,
    pub roles: Vec<RefSummary>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePerson {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub label_ids: Vec<i64>,
    #[serde(default)]
    pub role_ids: Vec<i64>,
    #[serde(default)]
    pub is_archived: bool,
}

impl SaveRequest for SavePerson {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn validate(&self) -> Result<(), AppError> {
        RequestValidator::required_text("name", &self.name, MAX_NAME_LENGTH)?;
        RequestValidator::email("email", self.email.as_deref())?;
        RequestValidator::ids("labelIds", &self.label_ids)?;
        RequestValidator::ids("roleIds", &self.role_ids)
    }
}

impl SavePerson {
    fn labels(&self) -> Vec<Ref<Label>> {
        resolve_set(self.label_ids.iter().copied())
    }

    fn roles(&self) -> Vec<Ref<Role>> {
        resolve_set(self.role_ids.iter().copied())
    }

    fn scalar_fields(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", PgBindValue::String(self.name.trim().to_string())),
            ("email", PgBindValue::OptString(self.email.clone())),
            ("is_archived", PgBindValue::Bool(self.is_archived)),
        ]
    }

    async fn attach(&self, conn: &mut PgConnection, id: i64) -> Result<(), AppError> {
        service::replace_links(conn, &PERSON_LABELS, id, &self.labels()).await?;
        service::replace_links(conn, &PERSON_ROLES, id, &self.roles()).await
    }
}

#[async_trait]
impl Entity for Person {
    const PATH: &'static str = "persons";
    const SEARCH_COLUMN: Column = NAME;
    const SORTABLE: SortWhitelist = SortWhitelist::with_name(NAME);
    const COLUMNS: &'static [&'static str] = &["id", "uuid", "name", "email", "is_archived", "created_at", "updated_at"];

    type Summary = PersonRow;
    type Detail = PersonDetail;
    type Save = SavePerson;

    async fn load_detail(conn: &mut PgConnection, id: i64) -> Result<Option<PersonDetail>, AppError> {
        let Some(person) = service::fetch_by_id::<PersonRow>(conn, Self::TABLE, Self::COLUMNS, id).await? else {
            return Ok(None);
        };
        let labels = service::linked_summaries(conn, &PERSON_LABELS, id).await?;
        let roles = service::linked_summaries(conn, &PERSON_ROLES, id).await?;
        Ok(Some(PersonDetail { person, labels, roles }))
    }

    async fn insert(conn: &mut PgConnection, req: &SavePerson) -> Result<i64, AppError> {
        let mut values = vec![("uuid", PgBindValue::Uuid(Uuid::new_v4()))];
        values.extend(req.scalar_fields());
        let id = service::insert_returning_id(conn, &sql::insert(Self::TABLE, values)).await?;
        req.attach(conn, id).await?;
        Ok(id)
    }

    async fn update(conn: &mut PgConnection, id: i64, req: &SavePerson) -> Result<(), AppError> {
        req.attach(conn, id).await?;
        service::execute(conn, &sql::update_by_id(Self::TABLE, id, req.scalar_fields())).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_ids_become_distinct_handles() {
        let req: SavePerson = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "labelIds": [3, 1, 3],
            "roleIds": []
        }))
        .unwrap();
        let ids: Vec<i64> = req.labels().iter().map(Ref::id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(req.roles().is_empty());
    }

    #[test]
    fn invalid_email_fails_validation() {
        let req: SavePerson =
            serde_json::from_value(serde_json::json!({ "name": "Ada", "email": "ada-at-example" })).unwrap();
        assert!(req.validate().is_err());
    }
}
