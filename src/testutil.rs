//! In-memory metadata source and row builders shared across tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::ScoutError;
use crate::source::{
    ColumnCommentRow, ImportedKeyRow, IndexInfoRow, MetadataSource, PrimaryKeyRow,
    QueryColumnRow, TableRow,
};

/// A canned metadata source: every lookup answers from in-memory maps.
/// Probe queries for tables in `failing_probes` fail the way an
/// unselectable table would; lookup kinds in `failing_lookups` fail
/// wholesale, for exercising the absorb-and-continue paths.
#[derive(Default)]
pub struct FakeSource {
    pub tables: Vec<TableRow>,
    pub columns: HashMap<String, Vec<QueryColumnRow>>,
    pub primary_keys: HashMap<String, Vec<PrimaryKeyRow>>,
    pub imported_keys: HashMap<String, Vec<ImportedKeyRow>>,
    pub indexes: HashMap<String, Vec<IndexInfoRow>>,
    pub catalogs: Vec<String>,
    pub current: Option<String>,
    pub table_comments: HashMap<String, String>,
    pub column_comments: HashMap<(String, String), ColumnCommentRow>,
    pub failing_probes: HashSet<String>,
    pub failing_lookups: HashSet<String>,
    pub list_tables_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, table_type: &str) -> Self {
        self.tables.push(TableRow {
            name: name.to_string(),
            table_type: table_type.to_string(),
            comment: None,
        });
        self
    }

    pub fn with_column(mut self, table: &str, row: QueryColumnRow) -> Self {
        self.columns.entry(table.to_string()).or_default().push(row);
        self
    }

    pub fn with_primary_key(mut self, table: &str, row: PrimaryKeyRow) -> Self {
        self.primary_keys
            .entry(table.to_string())
            .or_default()
            .push(row);
        self
    }

    pub fn with_imported_key(mut self, table: &str, row: ImportedKeyRow) -> Self {
        self.imported_keys
            .entry(table.to_string())
            .or_default()
            .push(row);
        self
    }

    pub fn with_index(mut self, table: &str, row: IndexInfoRow) -> Self {
        self.indexes.entry(table.to_string()).or_default().push(row);
        self
    }

    /// Register a catalog name and make it the connection's current catalog.
    pub fn with_catalog(mut self, name: &str) -> Self {
        self.catalogs.push(name.to_string());
        self.current = Some(name.to_string());
        self
    }

    pub fn with_table_comment(mut self, table: &str, comment: &str) -> Self {
        self.table_comments
            .insert(table.to_string(), comment.to_string());
        self
    }

    pub fn with_column_comment(
        mut self,
        table: &str,
        column: &str,
        comment: &str,
        default_value: Option<&str>,
    ) -> Self {
        self.column_comments.insert(
            (table.to_string(), column.to_string()),
            ColumnCommentRow {
                comment: Some(comment.to_string()),
                default_value: default_value.map(str::to_string),
            },
        );
        self
    }

    pub fn with_failing_probe(mut self, table: &str) -> Self {
        self.failing_probes.insert(table.to_string());
        self
    }

    /// Make one lookup kind fail for every table: `primary_keys`,
    /// `imported_keys`, `indexes`, `table_comments` or `column_comments`.
    pub fn with_failing_lookup(mut self, lookup: &str) -> Self {
        self.failing_lookups.insert(lookup.to_string());
        self
    }

    fn lookup_failure(&self, lookup: &str) -> Result<(), ScoutError> {
        if self.failing_lookups.contains(lookup) {
            return Err(ScoutError::Connection(format!("{lookup} lookup refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn list_tables(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _table_name_pattern: Option<&str>,
        types: &[String],
    ) -> Result<Vec<TableRow>, ScoutError> {
        self.list_tables_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tables
            .iter()
            .filter(|t| {
                types.is_empty() || types.iter().any(|ty| ty.eq_ignore_ascii_case(&t.table_type))
            })
            .cloned()
            .collect())
    }

    async fn list_columns_of_query(
        &self,
        table: &str,
    ) -> Result<Vec<QueryColumnRow>, ScoutError> {
        if self.failing_probes.contains(table) {
            return Err(ScoutError::Connection(format!(
                "relation \"{table}\" is not selectable"
            )));
        }
        Ok(self.columns.get(table).cloned().unwrap_or_default())
    }

    async fn list_primary_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<PrimaryKeyRow>, ScoutError> {
        self.lookup_failure("primary_keys")?;
        Ok(self.primary_keys.get(table).cloned().unwrap_or_default())
    }

    async fn list_imported_keys(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKeyRow>, ScoutError> {
        self.lookup_failure("imported_keys")?;
        Ok(self.imported_keys.get(table).cloned().unwrap_or_default())
    }

    async fn list_index_info(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
        _unique_only: bool,
    ) -> Result<Vec<IndexInfoRow>, ScoutError> {
        self.lookup_failure("indexes")?;
        Ok(self.indexes.get(table).cloned().unwrap_or_default())
    }

    async fn list_catalogs(&self) -> Result<Vec<String>, ScoutError> {
        Ok(self.catalogs.clone())
    }

    async fn current_catalog(&self) -> Result<Option<String>, ScoutError> {
        Ok(self.current.clone())
    }

    async fn table_comment(&self, table: &str) -> Result<Option<String>, ScoutError> {
        self.lookup_failure("table_comments")?;
        Ok(self.table_comments.get(table).cloned())
    }

    async fn column_comment(
        &self,
        _catalog: Option<&str>,
        _schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Result<Option<ColumnCommentRow>, ScoutError> {
        self.lookup_failure("column_comments")?;
        Ok(self
            .column_comments
            .get(&(table.to_string(), column.to_string()))
            .cloned())
    }
}

/// A probe-query column with sensible defaults: non-nullable, no precision,
/// not auto-incrementing.
pub fn probe_column(name: &str, type_name: &str) -> QueryColumnRow {
    QueryColumnRow {
        name: name.to_string(),
        label: Some(name.to_string()),
        type_name: type_name.to_string(),
        type_code: 0,
        host_type: None,
        nullable: false,
        auto_increment: false,
        precision: None,
        scale: None,
    }
}

pub fn pk_row(column: &str, key_seq: i16, pk_name: &str) -> PrimaryKeyRow {
    PrimaryKeyRow {
        column_name: column.to_string(),
        key_seq,
        pk_name: Some(pk_name.to_string()),
    }
}

pub fn fk_row(name: &str, pk_table: &str, pk_column: &str, fk_column: &str) -> ImportedKeyRow {
    ImportedKeyRow {
        fk_name: Some(name.to_string()),
        pk_table_name: pk_table.to_string(),
        pk_column_name: pk_column.to_string(),
        fk_column_name: fk_column.to_string(),
        update_rule: Some("NO ACTION".to_string()),
        delete_rule: Some("NO ACTION".to_string()),
        key_seq: 1,
    }
}

pub fn ix_row(index: &str, column: &str) -> IndexInfoRow {
    IndexInfoRow {
        index_name: Some(index.to_string()),
        column_name: Some(column.to_string()),
        index_type: Some("btree".to_string()),
        ordering: Some("ASC".to_string()),
    }
}
