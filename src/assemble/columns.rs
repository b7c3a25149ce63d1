use std::collections::{BTreeMap, HashMap};

use crate::id::fresh_id;
use crate::model::{Column, IndexConstraint, PkConstraint};
use crate::source::{ImportedKeyRow, QueryColumnRow};

/// Derived per-column key flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFlags {
    pub is_pk: bool,
    pub is_fk: bool,
    pub is_unique: bool,
}

/// Compute the derived flags for one column name.
///
/// Primary-key membership is case-sensitive; the foreign-key lookup is
/// case-insensitive (keys of `fk_by_column` are lowercased). A column counts
/// as unique when it is in the primary key or appears in any index
/// constraint, whether or not that index is itself unique-typed.
pub fn column_flags(
    name: &str,
    pk: Option<&PkConstraint>,
    fk_by_column: &HashMap<String, &ImportedKeyRow>,
    indexes: &BTreeMap<String, IndexConstraint>,
) -> ColumnFlags {
    let is_pk = pk.is_some_and(|p| p.columns.iter().any(|c| c == name));
    let in_index = indexes.values().any(|ix| ix.covers(name));
    let is_fk = fk_by_column.contains_key(&name.to_lowercase());
    ColumnFlags {
        is_pk,
        is_fk,
        is_unique: is_pk || in_index,
    }
}

/// Index foreign-key rows by lowercased referencing column name. The first
/// row for a column wins when several constraints share it.
pub fn fk_rows_by_column(rows: &[ImportedKeyRow]) -> HashMap<String, &ImportedKeyRow> {
    let mut by_column = HashMap::new();
    for row in rows {
        by_column
            .entry(row.fk_column_name.to_lowercase())
            .or_insert(row);
    }
    by_column
}

/// Build the column list for one table from its probe-query shape, merging
/// in the flags derived from the key and index constraints. Column order is
/// exactly the probe query's column order.
pub fn assemble_columns(
    rows: &[QueryColumnRow],
    table: &str,
    pk: Option<&PkConstraint>,
    indexes: &BTreeMap<String, IndexConstraint>,
    fk_by_column: &HashMap<String, &ImportedKeyRow>,
) -> Vec<Column> {
    rows.iter()
        .map(|row| {
            let flags = column_flags(&row.name, pk, fk_by_column, indexes);
            Column {
                id: fresh_id(),
                name: row.name.clone(),
                label: row.label.clone(),
                type_name: row.type_name.clone(),
                type_code: row.type_code,
                host_type: row.host_type.clone(),
                nullable: row.nullable,
                auto_increment: row.auto_increment,
                is_pk: flags.is_pk,
                is_fk: flags.is_fk,
                is_unique: flags.is_unique,
                precision: row.precision,
                scale: row.scale,
                comment: None,
                default_value: None,
                referenced_table: fk_by_column
                    .get(&row.name.to_lowercase())
                    .map(|fk| fk.pk_table_name.clone()),
                table: table.to_string(),
            }
        })
        .collect()
}
