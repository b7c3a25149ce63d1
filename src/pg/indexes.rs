use sqlx::PgPool;

use crate::error::ScoutError;
use crate::source::IndexInfoRow;

/// Index rows of one table, one row per index column, excluding the primary
/// key's backing index. `unique_only` restricts to unique indexes.
pub async fn query_index_info(
    pool: &PgPool,
    schema_pattern: Option<&str>,
    table: &str,
    unique_only: bool,
) -> Result<Vec<IndexInfoRow>, ScoutError> {
    let rows = sqlx::query_as::<_, RawIndexRow>(
        r#"
        SELECT i.relname AS index_name,
               a.attname AS column_name,
               am.amname AS index_type,
               CASE WHEN ((ix.indoption::smallint[])
                          [array_position(ix.indkey::smallint[], a.attnum)] & 1) = 1
                    THEN 'DESC' ELSE 'ASC' END AS ordering
        FROM pg_index ix
        JOIN pg_class t ON t.oid = ix.indrelid
        JOIN pg_class i ON i.oid = ix.indexrelid
        JOIN pg_am am ON am.oid = i.relam
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
        WHERE n.nspname LIKE COALESCE($1, '%') AND t.relname = $2
          AND NOT ix.indisprimary
          AND (ix.indisunique OR NOT $3)
        ORDER BY i.relname, array_position(ix.indkey::smallint[], a.attnum)
        "#,
    )
    .bind(schema_pattern)
    .bind(table)
    .bind(unique_only)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| IndexInfoRow {
            index_name: Some(row.index_name),
            column_name: Some(row.column_name),
            index_type: Some(row.index_type),
            ordering: row.ordering,
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct RawIndexRow {
    index_name: String,
    column_name: String,
    index_type: String,
    ordering: Option<String>,
}
