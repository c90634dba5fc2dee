//! Typed values bound to PostgreSQL placeholders.

use crate::query::SqlValue;
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query. Each variant reports its
/// own type so one `Vec<PgBindValue>` can mix column types.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Bool(bool),
    I32(i32),
    I64(i64),
    OptI64(Option<i64>),
    String(String),
    OptString(Option<String>),
    Uuid(uuid::Uuid),
    I64Array(Vec<i64>),
}

impl From<&SqlValue> for PgBindValue {
    fn from(v: &SqlValue) -> Self {
        match v {
            SqlValue::Bool(b) => PgBindValue::Bool(*b),
            SqlValue::Int(n) => PgBindValue::I64(*n),
            SqlValue::Text(s) => PgBindValue::String(s.clone()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self {
            PgBindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf),
            PgBindValue::I32(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::I64(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::OptI64(n) => <Option<i64> as Encode<Postgres>>::encode_by_ref(n, buf),
            PgBindValue::String(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf),
            PgBindValue::OptString(s) => <Option<String> as Encode<Postgres>>::encode_by_ref(s, buf),
            PgBindValue::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
            PgBindValue::I64Array(v) => <Vec<i64> as Encode<Postgres>>::encode_by_ref(v, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Bool(_) => <bool as Type<Postgres>>::type_info(),
            PgBindValue::I32(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::I64(_) | PgBindValue::OptI64(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::String(_) | PgBindValue::OptString(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Uuid(_) => <uuid::Uuid as Type<Postgres>>::type_info(),
            PgBindValue::I64Array(_) => <Vec<i64> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_values_convert() {
        assert_eq!(PgBindValue::from(&SqlValue::Bool(true)), PgBindValue::Bool(true));
        assert_eq!(PgBindValue::from(&SqlValue::Int(4)), PgBindValue::I64(4));
        assert_eq!(PgBindValue::from(&SqlValue::Text("x".into())), PgBindValue::String("x".into()));
    }

    #[test]
    fn each_variant_reports_its_own_type() {
        assert_eq!(PgBindValue::Bool(true).produces(), Some(<bool as Type<Postgres>>::type_info()));
        assert_eq!(PgBindValue::OptI64(None).produces(), Some(<i64 as Type<Postgres>>::type_info()));
        assert_eq!(
            PgBindValue::I64Array(vec![1]).produces(),
            Some(<Vec<i64> as Type<Postgres>>::type_info())
        );
    }
}
