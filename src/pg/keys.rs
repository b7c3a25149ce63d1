use sqlx::PgPool;

use crate::error::ScoutError;
use crate::source::{ImportedKeyRow, PrimaryKeyRow};

/// Primary-key rows of one table, in key-sequence order.
pub async fn query_primary_keys(
    pool: &PgPool,
    schema_pattern: Option<&str>,
    table: &str,
) -> Result<Vec<PrimaryKeyRow>, ScoutError> {
    let rows = sqlx::query_as::<_, RawPkRow>(
        r#"
        SELECT kcu.column_name, kcu.ordinal_position::int2 AS key_seq,
               tc.constraint_name AS pk_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            USING (constraint_name, table_schema, table_name)
        WHERE tc.table_schema LIKE COALESCE($1, '%') AND tc.table_name = $2
            AND tc.constraint_type = 'PRIMARY KEY'
        ORDER BY kcu.ordinal_position
        "#,
    )
    .bind(schema_pattern)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PrimaryKeyRow {
            column_name: row.column_name,
            key_seq: row.key_seq,
            pk_name: row.pk_name,
        })
        .collect())
}

/// Foreign-key column pairs of one table, one row per referencing column,
/// with the referential action rules.
pub async fn query_imported_keys(
    pool: &PgPool,
    schema_pattern: Option<&str>,
    table: &str,
) -> Result<Vec<ImportedKeyRow>, ScoutError> {
    let rows = sqlx::query_as::<_, RawFkRow>(
        r#"
        SELECT tc.constraint_name AS fk_name,
               ccu.table_name AS pk_table_name,
               ccu.column_name AS pk_column_name,
               kcu.column_name AS fk_column_name,
               rc.update_rule, rc.delete_rule,
               kcu.ordinal_position::int2 AS key_seq
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON kcu.constraint_name = tc.constraint_name
            AND kcu.table_schema = tc.table_schema
            AND kcu.table_name = tc.table_name
        JOIN information_schema.constraint_column_usage ccu
            ON ccu.constraint_name = tc.constraint_name
            AND ccu.constraint_schema = tc.constraint_schema
        JOIN information_schema.referential_constraints rc
            ON rc.constraint_name = tc.constraint_name
            AND rc.constraint_schema = tc.constraint_schema
        WHERE tc.table_schema LIKE COALESCE($1, '%') AND tc.table_name = $2
            AND tc.constraint_type = 'FOREIGN KEY'
        ORDER BY tc.constraint_name, kcu.ordinal_position
        "#,
    )
    .bind(schema_pattern)
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ImportedKeyRow {
            fk_name: row.fk_name,
            pk_table_name: row.pk_table_name,
            pk_column_name: row.pk_column_name,
            fk_column_name: row.fk_column_name,
            update_rule: Some(row.update_rule),
            delete_rule: Some(row.delete_rule),
            key_seq: row.key_seq,
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct RawPkRow {
    column_name: String,
    key_seq: i16,
    pk_name: Option<String>,
}

#[derive(sqlx::FromRow)]
struct RawFkRow {
    fk_name: Option<String>,
    pk_table_name: String,
    pk_column_name: String,
    fk_column_name: String,
    update_rule: String,
    delete_rule: String,
    key_seq: i16,
}
