//! The tabular metadata contract a backend must expose for schema assembly.
//!
//! Every method is a read-only, request/response lookup against the live
//! connection. The assembly engine reconciles these independently shaped row
//! streams into one model; backends only have to deliver the rows.

use async_trait::async_trait;

use crate::error::ScoutError;

/// One row of a table/view listing.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub name: String,
    /// Driver-reported type string, e.g. `TABLE` or `VIEW`.
    pub table_type: String,
    pub comment: Option<String>,
}

/// One column of a zero-row probe query's result shape.
///
/// Sourced from query-result metadata rather than catalog rows, because
/// catalog column listings are not guaranteed complete across backends.
#[derive(Debug, Clone)]
pub struct QueryColumnRow {
    pub name: String,
    pub label: Option<String>,
    pub type_name: String,
    pub type_code: i32,
    pub host_type: Option<String>,
    pub nullable: bool,
    pub auto_increment: bool,
    pub precision: Option<i32>,
    pub scale: Option<i32>,
}

/// One primary-key column row, delivered in key-sequence order.
#[derive(Debug, Clone)]
pub struct PrimaryKeyRow {
    pub column_name: String,
    pub key_seq: i16,
    pub pk_name: Option<String>,
}

/// One foreign-key column pair, seen from the referencing table. Rows for a
/// multi-column constraint are not guaranteed to arrive grouped.
#[derive(Debug, Clone)]
pub struct ImportedKeyRow {
    pub fk_name: Option<String>,
    pub pk_table_name: String,
    pub pk_column_name: String,
    pub fk_column_name: String,
    pub update_rule: Option<String>,
    pub delete_rule: Option<String>,
    pub key_seq: i16,
}

/// One index/column row. Index or column names may be missing; such rows are
/// skipped during assembly.
#[derive(Debug, Clone)]
pub struct IndexInfoRow {
    pub index_name: Option<String>,
    pub column_name: Option<String>,
    pub index_type: Option<String>,
    pub ordering: Option<String>,
}

/// Comment/default lookup result for one column.
#[derive(Debug, Clone)]
pub struct ColumnCommentRow {
    pub comment: Option<String>,
    pub default_value: Option<String>,
}

/// Read-only catalog metadata queries over one live connection.
#[async_trait]
pub trait MetadataSource {
    /// List tables and views matching the given patterns and type strings.
    /// An empty `types` slice means no type restriction.
    async fn list_tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: &[String],
    ) -> Result<Vec<TableRow>, ScoutError>;

    /// Column shape of a structurally-empty probe selection against `table`.
    async fn list_columns_of_query(&self, table: &str)
        -> Result<Vec<QueryColumnRow>, ScoutError>;

    async fn list_primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<PrimaryKeyRow>, ScoutError>;

    async fn list_imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKeyRow>, ScoutError>;

    /// Index rows for `table`, one row per index column. With `unique_only`
    /// the backend may restrict to unique indexes, but callers tolerate
    /// non-unique rows regardless.
    async fn list_index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        unique_only: bool,
    ) -> Result<Vec<IndexInfoRow>, ScoutError>;

    /// Names of all catalogs visible on the connection.
    async fn list_catalogs(&self) -> Result<Vec<String>, ScoutError>;

    /// Catalog name the live connection reports for itself.
    async fn current_catalog(&self) -> Result<Option<String>, ScoutError>;

    /// Optional descriptive comment for a table.
    async fn table_comment(&self, table: &str) -> Result<Option<String>, ScoutError>;

    /// Optional comment/default lookup for one column.
    async fn column_comment(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnCommentRow>, ScoutError>;
}
