//! Registry DDL. Every statement is idempotent; tables are created in
//! dependency order inside the configured schema.

use crate::error::AppError;
use crate::store::quote_ident;
use sqlx::PgPool;

const SHARED_COLUMNS: &str = "\"is_archived\" BOOLEAN NOT NULL DEFAULT FALSE,
  \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
  \"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW()";

/// (table, columns beyond `id` and the shared ones).
const ENTITY_TABLES: &[(&str, &[&str])] = &[
    ("brands", &["\"uuid\" UUID NOT NULL UNIQUE", "\"name\" TEXT NOT NULL"]),
    (
        "categories",
        &[
            "\"uuid\" UUID NOT NULL UNIQUE",
            "\"name\" TEXT NOT NULL",
            "\"parent_id\" BIGINT REFERENCES {schema}.\"categories\" (\"id\")",
        ],
    ),
    ("labels", &["\"name\" TEXT NOT NULL", "\"color\" TEXT"]),
    ("roles", &["\"name\" TEXT NOT NULL", "\"description\" TEXT"]),
    (
        "persons",
        &["\"uuid\" UUID NOT NULL UNIQUE", "\"name\" TEXT NOT NULL", "\"email\" TEXT"],
    ),
    (
        "tools",
        &[
            "\"uuid\" UUID NOT NULL UNIQUE",
            "\"name\" TEXT NOT NULL",
            "\"description\" TEXT",
            "\"brand_id\" BIGINT REFERENCES {schema}.\"brands\" (\"id\")",
            "\"category_id\" BIGINT REFERENCES {schema}.\"categories\" (\"id\")",
        ],
    ),
    (
        "stocks",
        &[
            "\"uuid\" UUID NOT NULL UNIQUE",
            "\"name\" TEXT NOT NULL",
            "\"location\" TEXT",
            "\"quantity\" INTEGER NOT NULL DEFAULT 0 CHECK (\"quantity\" >= 0)",
        ],
    ),
    (
        "comments",
        &[
            "\"content\" TEXT NOT NULL",
            "\"tool_id\" BIGINT NOT NULL REFERENCES {schema}.\"tools\" (\"id\")",
        ],
    ),
];

/// (link table, owner column, owner table, target column, target table).
const LINK_TABLES: &[(&str, &str, &str, &str, &str)] = &[
    ("person_labels", "person_id", "persons", "label_id", "labels"),
    ("person_roles", "person_id", "persons", "role_id", "roles"),
    ("tool_labels", "tool_id", "tools", "label_id", "labels"),
];

/// Every DDL statement, schema-qualified, in execution order.
pub fn statements(schema: &str) -> Vec<String> {
    let schema = quote_ident(schema);
    let mut out = vec![format!("CREATE SCHEMA IF NOT EXISTS {}", schema)];
    for (table, columns) in ENTITY_TABLES {
        let mut defs = vec!["\"id\" BIGSERIAL PRIMARY KEY".to_string()];
        defs.extend(columns.iter().map(|c| c.replace("{schema}", &schema)));
        defs.push(SHARED_COLUMNS.to_string());
        out.push(format!(
            "CREATE TABLE IF NOT EXISTS {}.{} (\n  {}\n)",
            schema,
            quote_ident(table),
            defs.join(",\n  ")
        ));
    }
    for (table, owner_col, owner_table, target_col, target_table) in LINK_TABLES {
        out.push(format!(
            "CREATE TABLE IF NOT EXISTS {s}.{t} (\n  {oc} BIGINT NOT NULL REFERENCES {s}.{ot} (\"id\") ON DELETE CASCADE,\n  {tc} BIGINT NOT NULL REFERENCES {s}.{tt} (\"id\"),\n  PRIMARY KEY ({oc}, {tc})\n)",
            s = schema,
            t = quote_ident(table),
            oc = quote_ident(owner_col),
            ot = quote_ident(owner_table),
            tc = quote_ident(target_col),
            tt = quote_ident(target_table),
        ));
    }
    out.push(format!(
        "CREATE INDEX IF NOT EXISTS \"comments_tool_id_idx\" ON {}.\"comments\" (\"tool_id\")",
        schema
    ));
    out
}

/// Create the schema, entity tables, link tables and indexes if missing.
pub async fn apply_migrations(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    for ddl in statements(schema) {
        tracing::debug!(sql = %ddl, "migration");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(schema = %schema, "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_comes_first_and_every_table_is_qualified() {
        let stmts = statements("reg_test");
        assert_eq!(stmts[0], "CREATE SCHEMA IF NOT EXISTS \"reg_test\"");
        assert_eq!(stmts.len(), 1 + ENTITY_TABLES.len() + LINK_TABLES.len() + 1);
        for s in &stmts[1..] {
            assert!(s.contains("\"reg_test\"."), "unqualified: {}", s);
            assert!(!s.contains("{schema}"));
        }
    }

    #[test]
    fn referenced_tables_are_created_before_referencing_ones() {
        let stmts = statements("public");
        let pos = |t: &str| {
            stmts
                .iter()
                .position(|s| s.starts_with(&format!("CREATE TABLE IF NOT EXISTS \"public\".\"{}\"", t)))
                .unwrap()
        };
        assert!(pos("brands") < pos("tools"));
        assert!(pos("categories") < pos("tools"));
        assert!(pos("tools") < pos("comments"));
        assert!(pos("labels") < pos("person_labels"));
        assert!(pos("tools") < pos("tool_labels"));
    }

    #[test]
    fn comment_requires_a_tool() {
        let stmts = statements("public");
        let comments = stmts.iter().find(|s| s.contains("\"public\".\"comments\" (\n")).unwrap();
        assert!(comments.contains("\"tool_id\" BIGINT NOT NULL REFERENCES \"public\".\"tools\""));
    }
}
