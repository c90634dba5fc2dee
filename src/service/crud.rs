//! Generic list/read/save/delete execution against PostgreSQL.

use crate::entity::{Entity, HardDelete, RefSummary};
use crate::error::AppError;
use crate::query::{Association, ListQuery, Ref, Referent};
use crate::service::validation::SaveRequest;
use crate::sql::{self, PgBindValue, QueryBuf};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{PgConnection, PgPool, Postgres};

/// One page of rows plus the unpaginated match count.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(i64),
    Updated(i64),
}

impl SaveOutcome {
    pub fn id(&self) -> i64 {
        match self {
            SaveOutcome::Created(id) | SaveOutcome::Updated(id) => *id,
        }
    }
}

pub struct CrudService;

impl CrudService {
    /// Run a composed list query: match count and the requested window.
    pub async fn list<E: Entity>(pool: &PgPool, query: &ListQuery) -> Result<Page<E::Summary>, AppError> {
        let count_q = sql::count(E::TABLE, &query.predicate);
        tracing::debug!(sql = %count_q.sql, params = ?count_q.params, "query");
        let total_items: i64 = bind_scalar(sqlx::query_scalar::<_, i64>(&count_q.sql), &count_q.params)
            .fetch_one(pool)
            .await?;

        let page_q = sql::select_page(E::TABLE, E::COLUMNS, query);
        tracing::debug!(sql = %page_q.sql, params = ?page_q.params, "query");
        let items = bind_as(sqlx::query_as::<_, E::Summary>(&page_q.sql), &page_q.params)
            .fetch_all(pool)
            .await?;
        Ok(Page { items, total_items })
    }

    pub async fn read<E: Entity>(pool: &PgPool, id: i64) -> Result<E::Detail, AppError> {
        let mut conn = pool.acquire().await?;
        E::load_detail(&mut *conn, id)
            .await?
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    /// Insert when the body carries no id, otherwise lock, mutate and
    /// re-attach associations of the existing row. One transaction; any
    /// failure rolls everything back.
    pub async fn save<E: Entity>(pool: &PgPool, req: &E::Save) -> Result<SaveOutcome, AppError> {
        let mut tx = pool.begin().await?;
        let outcome = match req.id() {
            None => SaveOutcome::Created(E::insert(&mut *tx, req).await?),
            Some(id) => {
                let lock = sql::lock_by_id(E::TABLE);
                tracing::debug!(sql = %lock, id, "query (tx)");
                sqlx::query_scalar::<_, i64>(&lock)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| AppError::not_found(E::KIND, id))?;
                E::update(&mut *tx, id, req).await?;
                SaveOutcome::Updated(id)
            }
        };
        tx.commit().await?;
        tracing::info!(entity = E::KIND, outcome = ?outcome, "saved");
        Ok(outcome)
    }

    pub async fn delete<E: HardDelete>(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let sql = sql::delete_by_id(E::TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let done = sqlx::query(&sql).bind(id).execute(pool).await?;
        if done.rows_affected() == 0 {
            return Err(AppError::not_found(E::KIND, id));
        }
        tracing::info!(entity = E::KIND, id, "deleted");
        Ok(())
    }
}

/// INSERT ... RETURNING id.
pub(crate) async fn insert_returning_id(conn: &mut PgConnection, q: &QueryBuf) -> Result<i64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let id = bind_scalar(sqlx::query_scalar::<_, i64>(&q.sql), &q.params)
        .fetch_one(&mut *conn)
        .await?;
    Ok(id)
}

pub(crate) async fn execute(conn: &mut PgConnection, q: &QueryBuf) -> Result<u64, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let done = bind(sqlx::query(&q.sql), &q.params).execute(&mut *conn).await?;
    Ok(done.rows_affected())
}

/// Clear every link of `owner_id`, then link it to exactly `targets`.
pub(crate) async fn replace_links<O: Referent, T: Referent>(
    conn: &mut PgConnection,
    assoc: &Association<O, T>,
    owner_id: i64,
    targets: &[Ref<T>],
) -> Result<(), AppError> {
    let clear = sql::clear_links(assoc);
    tracing::debug!(sql = %clear, owner_id, "query (tx)");
    sqlx::query(&clear).bind(owner_id).execute(&mut *conn).await?;
    if targets.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = targets.iter().map(Ref::id).collect();
    let insert = sql::insert_links(assoc);
    tracing::debug!(sql = %insert, owner_id, targets = ?ids, "query (tx)");
    sqlx::query(&insert)
        .bind(owner_id)
        .bind(ids)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn linked_summaries<O: Referent, T: Referent>(
    conn: &mut PgConnection,
    assoc: &Association<O, T>,
    owner_id: i64,
) -> Result<Vec<RefSummary>, AppError> {
    let sql = sql::linked_summaries(assoc, "name");
    tracing::debug!(sql = %sql, owner_id, "query");
    let rows = sqlx::query_as::<_, RefSummary>(&sql)
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

/// `{ id, label }` of the row a nullable reference points at.
pub(crate) async fn reference_summary<T: Referent>(
    conn: &mut PgConnection,
    target: Option<Ref<T>>,
    label_column: &str,
) -> Result<Option<RefSummary>, AppError> {
    let Some(target) = target else { return Ok(None) };
    let sql = sql::summary_by_id(T::TABLE, label_column);
    tracing::debug!(sql = %sql, id = target.id(), "query");
    let row = sqlx::query_as::<_, (i64, String)>(&sql)
        .bind(target.id())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|(id, name)| RefSummary { id, name }))
}

/// Fetch a row by id into `R`.
pub(crate) async fn fetch_by_id<R>(conn: &mut PgConnection, table: &str, columns: &[&str], id: i64) -> Result<Option<R>, AppError>
where
    R: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
    let sql = sql::select_by_id(table, columns);
    tracing::debug!(sql = %sql, id, "query");
    let row = sqlx::query_as::<_, R>(&sql).bind(id).fetch_optional(&mut *conn).await?;
    Ok(row)
}

fn bind<'q>(mut query: Query<'q, Postgres, PgArguments>, params: &[PgBindValue]) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = query.bind(p.clone());
    }
    query
}

fn bind_as<'q, R>(
    mut query: QueryAs<'q, Postgres, R, PgArguments>,
    params: &[PgBindValue],
) -> QueryAs<'q, Postgres, R, PgArguments> {
    for p in params {
        query = query.bind(p.clone());
    }
    query
}

fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    params: &[PgBindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for p in params {
        query = query.bind(p.clone());
    }
    query
}
