use std::collections::BTreeMap;

use crate::id::fresh_id;
use crate::model::{Column, FkConstraint, ImportedKey};
use crate::source::ImportedKeyRow;

/// Group a table's imported-key rows into one constraint per name and mark
/// the owning table's columns that participate.
///
/// Rows may arrive ungrouped; the first row seen for a constraint name
/// establishes the referenced table. Column pairs keep row delivery order
/// within each constraint. The matching column (exact name match) is flagged
/// as a foreign key and its nullable/unique/pk flags are copied onto the
/// pair, so the columns must already be assembled when this runs.
pub fn resolve_foreign_keys(
    rows: &[ImportedKeyRow],
    fk_table: &str,
    columns: &mut [Column],
) -> Vec<FkConstraint> {
    let mut by_name: BTreeMap<String, FkConstraint> = BTreeMap::new();
    for row in rows {
        let name = row.fk_name.clone().unwrap_or_default();
        let constraint = by_name.entry(name.clone()).or_insert_with(|| FkConstraint {
            id: fresh_id(),
            name,
            fk_table: fk_table.to_string(),
            pk_table: row.pk_table_name.clone(),
            imported_keys: Vec::new(),
        });
        let pk_table = constraint.pk_table.clone();

        let mut imported = ImportedKey {
            id: fresh_id(),
            pk_column: row.pk_column_name.clone(),
            fk_column: row.fk_column_name.clone(),
            update_rule: row.update_rule.clone(),
            delete_rule: row.delete_rule.clone(),
            nullable: false,
            unique: false,
            is_pk: false,
        };
        if let Some(column) = columns.iter_mut().find(|c| c.name == row.fk_column_name) {
            column.is_fk = true;
            column.referenced_table = Some(pk_table);
            imported.nullable = column.nullable;
            imported.unique = column.is_unique;
            imported.is_pk = column.is_pk;
        }
        constraint.imported_keys.push(imported);
    }
    by_name.into_values().collect()
}
