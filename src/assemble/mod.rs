//! The schema assembly engine: reconciles the independently shaped metadata
//! row streams of one connection into a single normalized schema model.

mod columns;
mod filter;
mod fk;
mod index;
mod pk;

pub use columns::{column_flags, fk_rows_by_column, ColumnFlags};
pub use filter::ExclusionFilter;

use crate::error::ScoutError;
use crate::id::fresh_id;
use crate::model::{Column, SchemaModel, Table, TableKind};
use crate::source::{MetadataSource, TableRow};

/// What to do when one table's probe query fails mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableErrorPolicy {
    /// Abort the whole run with an error naming the table.
    Abort,
    /// Drop the table from the result and continue with the rest.
    SkipTable,
}

/// Drives the full assembly pipeline over one exclusively owned metadata
/// source. Tables are processed strictly one at a time; there is no fan-out
/// and no cancellation beyond the source itself failing.
pub struct SchemaReader<S> {
    source: S,
    excluded: ExclusionFilter,
    on_progress: Option<Box<dyn Fn(&str) + Send>>,
    last_message: String,
}

impl<S: MetadataSource> SchemaReader<S> {
    pub fn new(source: S) -> Self {
        SchemaReader {
            source,
            excluded: ExclusionFilter::default(),
            on_progress: None,
            last_message: String::new(),
        }
    }

    /// Table names to drop before introspection, matched case-insensitively.
    /// Applied only when the table list comes from catalog enumeration.
    pub fn with_excluded_tables<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.excluded = ExclusionFilter::new(names);
        self
    }

    /// Callback invoked with every progress message as it is produced.
    pub fn with_progress(mut self, callback: impl Fn(&str) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// The most recent progress message of the current or last run.
    pub fn last_progress_message(&self) -> &str {
        &self.last_message
    }

    /// Assemble the full schema model.
    ///
    /// With `explicit_tables`, no catalog enumeration happens and the
    /// exclusion filter is not applied: each name is taken as-is, in order.
    /// Otherwise the catalog's table/view list is enumerated, filtered, and
    /// processed in catalog order. Any table whose probe query fails aborts
    /// the run. `catalog` seeds the model name; the finished model is named
    /// after whatever catalog the live connection reports.
    pub async fn process_schema(
        &mut self,
        catalog: &str,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: &[String],
        explicit_tables: Option<&[String]>,
    ) -> Result<SchemaModel, ScoutError> {
        let mut model = SchemaModel::new(catalog);
        let catalog_arg = if catalog.is_empty() { None } else { Some(catalog) };

        self.progress("Reading table list...");
        let shells = match explicit_tables {
            Some(names) if !names.is_empty() => names
                .iter()
                .map(|name| explicit_shell(name))
                .collect(),
            _ => {
                self.enumerate_tables(catalog_arg, schema_pattern, table_name_pattern, types)
                    .await?
            }
        };

        self.progress("Reading table metadata...");
        model.tables = self
            .assemble_tables(shells, catalog_arg, schema_pattern, TableErrorPolicy::Abort)
            .await?;

        let reported = self.source.current_catalog().await?;
        if let Some(name) = reported {
            model.name = name;
        }
        self.progress("Schema read complete");
        Ok(model)
    }

    /// Enumerate and assemble tables, dropping any table whose probe query
    /// fails instead of aborting the run.
    pub async fn list_basic_table_info(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: &[String],
    ) -> Result<Vec<Table>, ScoutError> {
        self.progress("Reading table list...");
        let shells = self
            .enumerate_tables(catalog, schema_pattern, table_name_pattern, types)
            .await?;
        let tables = self
            .assemble_tables(shells, catalog, schema_pattern, TableErrorPolicy::SkipTable)
            .await?;
        self.progress("Schema read complete");
        Ok(tables)
    }

    /// Column metadata for one table: probe shape plus derived pk/fk flags.
    /// No index lookup is made, so uniqueness here reflects the primary key
    /// only; comments and defaults are not fetched.
    pub async fn column_metadata(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<Column>, ScoutError> {
        let probe = self.source.list_columns_of_query(table).await?;

        let result = self.source.list_primary_keys(catalog, schema, table).await;
        let pk_rows = self.absorb("primary key lookup", result);
        let pk = pk::resolve_primary_key(&pk_rows);

        let result = self.source.list_imported_keys(catalog, schema, table).await;
        let fk_rows = self.absorb("imported key lookup", result);
        let fk_by_column = columns::fk_rows_by_column(&fk_rows);

        Ok(columns::assemble_columns(
            &probe,
            table,
            pk.as_ref(),
            &Default::default(),
            &fk_by_column,
        ))
    }

    /// Ordered primary-key column names of one table.
    pub async fn primary_key_columns(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<String>, ScoutError> {
        let rows = self.source.list_primary_keys(catalog, schema, table).await?;
        Ok(rows.into_iter().map(|r| r.column_name).collect())
    }

    /// Whether a catalog of the given name exists, compared case-insensitively.
    pub async fn schema_exists(&mut self, name: &str) -> Result<bool, ScoutError> {
        let catalogs = self.source.list_catalogs().await?;
        Ok(catalogs.iter().any(|c| c.eq_ignore_ascii_case(name)))
    }

    async fn enumerate_tables(
        &mut self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: &[String],
    ) -> Result<Vec<Table>, ScoutError> {
        let rows = self
            .source
            .list_tables(catalog, schema_pattern, table_name_pattern, types)
            .await?;
        Ok(rows
            .into_iter()
            .filter(|row| !self.excluded.excludes(&row.name))
            .map(table_shell)
            .collect())
    }

    async fn assemble_tables(
        &mut self,
        shells: Vec<Table>,
        catalog: Option<&str>,
        schema: Option<&str>,
        policy: TableErrorPolicy,
    ) -> Result<Vec<Table>, ScoutError> {
        let total = shells.len();
        let mut tables = Vec::with_capacity(total);
        for (processed, shell) in shells.into_iter().enumerate() {
            self.progress(format!("Table: {}", shell.name));
            self.progress(format!("Processed {processed} of {total}"));
            if let Some(table) = self.assemble_table(shell, catalog, schema, policy).await? {
                tables.push(table);
            }
        }
        self.progress(format!("Processed {} of {total}", tables.len()));
        Ok(tables)
    }

    /// Assemble one table. Returns `Ok(None)` when the probe query fails
    /// under the skip policy; key, index, and comment lookups never abort,
    /// their failures are logged and treated as empty results.
    async fn assemble_table(
        &mut self,
        mut table: Table,
        catalog: Option<&str>,
        schema: Option<&str>,
        policy: TableErrorPolicy,
    ) -> Result<Option<Table>, ScoutError> {
        let name = table.name.clone();

        let result = self.source.list_primary_keys(catalog, schema, &name).await;
        let pk_rows = self.absorb("primary key lookup", result);
        let primary_key = pk::resolve_primary_key(&pk_rows);

        let result = self
            .source
            .list_index_info(catalog, schema, &name, true)
            .await;
        let index_rows = self.absorb("index lookup", result);
        let index_map = index::resolve_indexes(&index_rows);

        let result = self.source.list_imported_keys(catalog, schema, &name).await;
        let fk_rows = self.absorb("imported key lookup", result);
        let fk_by_column = columns::fk_rows_by_column(&fk_rows);

        let result = self.source.list_columns_of_query(&name).await;
        let probe = match result {
            Ok(rows) => rows,
            Err(err) => match policy {
                TableErrorPolicy::Abort => {
                    self.note(&err);
                    return Err(ScoutError::table(name, &err));
                }
                TableErrorPolicy::SkipTable => {
                    tracing::warn!(table = %name, error = %err, "probe query failed, skipping table");
                    return Ok(None);
                }
            },
        };

        let mut assembled = columns::assemble_columns(
            &probe,
            &name,
            primary_key.as_ref(),
            &index_map,
            &fk_by_column,
        );
        for column in &mut assembled {
            let result = self
                .source
                .column_comment(catalog, schema, &name, &column.name)
                .await;
            match result {
                Ok(Some(row)) => {
                    column.comment = row.comment;
                    column.default_value = row.default_value;
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(table = %name, column = %column.name, error = %err,
                        "comment lookup failed");
                }
            }
        }

        if table.comment.is_none() {
            let result = self.source.table_comment(&name).await;
            match result {
                Ok(comment) => table.comment = comment,
                Err(err) => {
                    tracing::warn!(table = %name, error = %err, "table comment lookup failed");
                }
            }
        }

        table.foreign_keys = fk::resolve_foreign_keys(&fk_rows, &name, &mut assembled);
        table.columns = assembled;
        table.primary_key = primary_key;
        table.indexes = index_map.into_values().collect();
        Ok(Some(table))
    }

    fn absorb<T>(&mut self, context: &str, result: Result<Vec<T>, ScoutError>) -> Vec<T> {
        match result {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!("{context} failed: {err}");
                self.progress(err.to_string());
                Vec::new()
            }
        }
    }

    fn note(&mut self, err: &ScoutError) {
        tracing::error!("{err}");
        self.progress(err.to_string());
    }

    fn progress(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{message}");
        if let Some(callback) = &self.on_progress {
            callback(&message);
        }
        self.last_message = message;
    }
}

fn table_shell(row: TableRow) -> Table {
    Table {
        id: fresh_id(),
        kind: TableKind::from_type_str(&row.table_type),
        name: row.name,
        comment: row.comment,
        columns: Vec::new(),
        primary_key: None,
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
    }
}

fn explicit_shell(name: &str) -> Table {
    Table {
        id: fresh_id(),
        name: name.to_string(),
        kind: TableKind::Table,
        comment: None,
        columns: Vec::new(),
        primary_key: None,
        indexes: Vec::new(),
        foreign_keys: Vec::new(),
    }
}
