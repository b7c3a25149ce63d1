use std::collections::HashMap;

use sqlx::postgres::PgPool;
use sqlx::{Column, Executor, TypeInfo};

use crate::error::ScoutError;
use crate::source::{ColumnCommentRow, QueryColumnRow};

/// Column shape of `table` as the query engine reports it.
///
/// Issues a structurally-empty probe selection and reads the result
/// description, then fills in precision/scale/identity from the catalog,
/// which the probe cannot provide.
pub async fn query_columns_of_probe(
    pool: &PgPool,
    table: &str,
) -> Result<Vec<QueryColumnRow>, ScoutError> {
    let probe = format!("SELECT * FROM {table} WHERE 1=2");
    let describe = pool.describe(&probe).await?;
    let shapes = query_column_shapes(pool, table).await?;

    let mut rows = Vec::with_capacity(describe.columns().len());
    for (ordinal, column) in describe.columns().iter().enumerate() {
        let name = column.name().to_string();
        let type_name = column.type_info().name().to_lowercase();
        let shape = shapes.get(&name);
        rows.push(QueryColumnRow {
            label: Some(name.clone()),
            host_type: host_type_for(&type_name).map(str::to_string),
            type_name,
            type_code: shape.map_or(0, |s| s.type_oid),
            nullable: describe.nullable(ordinal).unwrap_or(true),
            auto_increment: shape.is_some_and(|s| s.auto_increment),
            precision: shape.and_then(|s| s.precision),
            scale: shape.and_then(|s| s.scale),
            name,
        });
    }
    Ok(rows)
}

/// Comment and default expression of one column, if any.
pub async fn query_column_comment(
    pool: &PgPool,
    table: &str,
    column: &str,
) -> Result<Option<ColumnCommentRow>, ScoutError> {
    let row = sqlx::query_as::<_, RawCommentRow>(
        r#"
        SELECT col_description(a.attrelid, a.attnum) AS comment,
               pg_get_expr(d.adbin, d.adrelid) AS default_value
        FROM pg_attribute a
        JOIN pg_class c ON c.oid = a.attrelid
        LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
        WHERE c.relname = $1 AND a.attname = $2
          AND pg_table_is_visible(c.oid)
          AND a.attnum > 0 AND NOT a.attisdropped
        LIMIT 1
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| ColumnCommentRow {
        comment: r.comment,
        default_value: r.default_value,
    }))
}

/// Per-column catalog facts the probe description does not carry.
async fn query_column_shapes(
    pool: &PgPool,
    table: &str,
) -> Result<HashMap<String, ShapeRow>, ScoutError> {
    let rows = sqlx::query_as::<_, ShapeRow>(
        r#"
        SELECT a.attname AS column_name,
               a.atttypid::int4 AS type_oid,
               COALESCE(i.numeric_precision, i.character_maximum_length)::int4 AS precision,
               i.numeric_scale::int4 AS scale,
               (i.is_identity = 'YES'
                OR COALESCE(i.column_default, '') LIKE 'nextval(%') AS auto_increment
        FROM pg_attribute a
        JOIN pg_class t ON t.oid = a.attrelid
        JOIN pg_namespace n ON n.oid = t.relnamespace
        JOIN information_schema.columns i
          ON i.table_schema = n.nspname
         AND i.table_name = t.relname
         AND i.column_name = a.attname
        WHERE t.relname = $1 AND pg_table_is_visible(t.oid)
          AND a.attnum > 0 AND NOT a.attisdropped
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.column_name.clone(), row))
        .collect())
}

/// Rust type the driver maps a PostgreSQL type to, for the common cases.
fn host_type_for(type_name: &str) -> Option<&'static str> {
    let host = match type_name {
        "bool" => "bool",
        "int2" => "i16",
        "int4" => "i32",
        "int8" => "i64",
        "float4" => "f32",
        "float8" => "f64",
        "numeric" => "BigDecimal",
        "text" | "varchar" | "bpchar" | "char" | "name" => "String",
        "bytea" => "Vec<u8>",
        "date" => "NaiveDate",
        "time" => "NaiveTime",
        "timestamp" => "NaiveDateTime",
        "timestamptz" => "DateTime<Utc>",
        "uuid" => "Uuid",
        "json" | "jsonb" => "serde_json::Value",
        _ => return None,
    };
    Some(host)
}

#[derive(sqlx::FromRow)]
struct ShapeRow {
    column_name: String,
    type_oid: i32,
    precision: Option<i32>,
    scale: Option<i32>,
    auto_increment: bool,
}

#[derive(sqlx::FromRow)]
struct RawCommentRow {
    comment: Option<String>,
    default_value: Option<String>,
}
