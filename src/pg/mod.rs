//! `MetadataSource` implementation backed by a PostgreSQL connection pool.

mod columns;
mod indexes;
mod keys;
mod tables;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ScoutError;
use crate::source::{
    ColumnCommentRow, ImportedKeyRow, IndexInfoRow, MetadataSource, PrimaryKeyRow,
    QueryColumnRow, TableRow,
};

pub struct PgMetadataSource {
    pool: PgPool,
}

impl PgMetadataSource {
    pub fn new(pool: PgPool) -> Self {
        PgMetadataSource { pool }
    }
}

#[async_trait]
impl MetadataSource for PgMetadataSource {
    async fn list_tables(
        &self,
        _catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: &[String],
    ) -> Result<Vec<TableRow>, ScoutError> {
        tables::query_tables(&self.pool, schema_pattern, table_name_pattern, types).await
    }

    async fn list_columns_of_query(
        &self,
        table: &str,
    ) -> Result<Vec<QueryColumnRow>, ScoutError> {
        columns::query_columns_of_probe(&self.pool, table).await
    }

    async fn list_primary_keys(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<PrimaryKeyRow>, ScoutError> {
        keys::query_primary_keys(&self.pool, schema, table).await
    }

    async fn list_imported_keys(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKeyRow>, ScoutError> {
        keys::query_imported_keys(&self.pool, schema, table).await
    }

    async fn list_index_info(
        &self,
        _catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        unique_only: bool,
    ) -> Result<Vec<IndexInfoRow>, ScoutError> {
        indexes::query_index_info(&self.pool, schema, table, unique_only).await
    }

    async fn list_catalogs(&self) -> Result<Vec<String>, ScoutError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT datname FROM pg_database WHERE NOT datistemplate ORDER BY datname",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn current_catalog(&self) -> Result<Option<String>, ScoutError> {
        let name = sqlx::query_scalar::<_, String>("SELECT current_database()")
            .fetch_one(&self.pool)
            .await?;
        Ok(Some(name))
    }

    async fn table_comment(&self, table: &str) -> Result<Option<String>, ScoutError> {
        tables::query_table_comment(&self.pool, table).await
    }

    async fn column_comment(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnCommentRow>, ScoutError> {
        columns::query_column_comment(&self.pool, table, column).await
    }
}
