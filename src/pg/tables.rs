use sqlx::PgPool;

use crate::error::ScoutError;
use crate::source::TableRow;

/// List tables and views matching the given LIKE patterns, with their
/// comments. `None` patterns match everything; system schemas are never
/// listed.
pub async fn query_tables(
    pool: &PgPool,
    schema_pattern: Option<&str>,
    table_name_pattern: Option<&str>,
    types: &[String],
) -> Result<Vec<TableRow>, ScoutError> {
    let rows = sqlx::query_as::<_, RawTableRow>(
        r#"
        SELECT t.table_name, t.table_type,
               obj_description(
                   (quote_ident(t.table_schema) || '.' || quote_ident(t.table_name))::regclass
               ) AS comment
        FROM information_schema.tables t
        WHERE t.table_schema LIKE COALESCE($1, '%')
          AND t.table_name LIKE COALESCE($2, '%')
          AND t.table_schema NOT IN ('pg_catalog', 'information_schema')
          AND t.table_type IN ('BASE TABLE', 'VIEW')
        ORDER BY t.table_name
        "#,
    )
    .bind(schema_pattern)
    .bind(table_name_pattern)
    .fetch_all(pool)
    .await?;

    let tables = rows
        .into_iter()
        .map(|row| {
            // Normalize information_schema's BASE TABLE to the generic type string.
            let table_type = match row.table_type.as_str() {
                "BASE TABLE" => "TABLE".to_string(),
                other => other.to_string(),
            };
            TableRow {
                name: row.table_name,
                table_type,
                comment: row.comment,
            }
        })
        .filter(|row| {
            types.is_empty() || types.iter().any(|t| t.eq_ignore_ascii_case(&row.table_type))
        })
        .collect();

    Ok(tables)
}

/// Comment attached to the first visible relation of the given name.
pub async fn query_table_comment(
    pool: &PgPool,
    table: &str,
) -> Result<Option<String>, ScoutError> {
    let comment = sqlx::query_scalar::<_, Option<String>>(
        r#"
        SELECT obj_description(c.oid)
        FROM pg_class c
        WHERE c.relname = $1 AND pg_table_is_visible(c.oid)
        LIMIT 1
        "#,
    )
    .bind(table)
    .fetch_optional(pool)
    .await?;
    Ok(comment.flatten())
}

#[derive(sqlx::FromRow)]
struct RawTableRow {
    table_name: String,
    table_type: String,
    comment: Option<String>,
}
