use std::collections::BTreeMap;

use crate::id::fresh_id;
use crate::model::IndexConstraint;
use crate::source::IndexInfoRow;

/// Merge a table's index rows into one constraint per index name.
///
/// The first row seen for a name seeds the type and ordering metadata; every
/// row contributes its column name. Rows missing either the index name or the
/// column name are skipped.
pub fn resolve_indexes(rows: &[IndexInfoRow]) -> BTreeMap<String, IndexConstraint> {
    let mut by_name: BTreeMap<String, IndexConstraint> = BTreeMap::new();
    for row in rows {
        let (Some(index_name), Some(column_name)) =
            (non_empty(&row.index_name), non_empty(&row.column_name))
        else {
            tracing::warn!(?row, "skipping index row with missing name");
            continue;
        };
        let constraint = by_name
            .entry(index_name.to_string())
            .or_insert_with(|| IndexConstraint {
                id: fresh_id(),
                name: index_name.to_string(),
                index_type: row.index_type.clone(),
                ordering: row.ordering.clone(),
                columns: Vec::new(),
            });
        if !constraint.covers(column_name) {
            constraint.columns.push(column_name.to_string());
        }
    }
    by_name
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::testutil::ix_row;

    #[test]
    fn test_rows_sharing_a_name_merge_into_one_constraint() {
        let rows = vec![
            ix_row("orders_region_ix", "region"),
            ix_row("orders_region_ix", "zone"),
            ix_row("orders_code_ux", "code"),
        ];
        let map = resolve_indexes(&rows);
        assert_eq!(map.len(), 2);
        assert_eq!(map["orders_region_ix"].columns, vec!["region", "zone"]);
        assert_eq!(map["orders_code_ux"].columns, vec!["code"]);
    }

    #[test]
    fn test_merging_is_idempotent_under_row_permutation() {
        let forward = vec![
            ix_row("ix_a", "x"),
            ix_row("ix_b", "y"),
            ix_row("ix_a", "z"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let left = resolve_indexes(&forward);
        let right = resolve_indexes(&backward);
        assert_eq!(left.len(), right.len());
        for (name, constraint) in &left {
            let columns: BTreeSet<_> = constraint.columns.iter().collect();
            let others: BTreeSet<_> = right[name].columns.iter().collect();
            assert_eq!(columns, others, "column set of {name}");
        }
    }

    #[test]
    fn test_rows_with_missing_names_are_skipped() {
        let mut nameless = ix_row("", "region");
        nameless.index_name = None;
        let mut columnless = ix_row("orders_ix", "");
        columnless.column_name = Some("   ".to_string());
        let rows = vec![nameless, columnless, ix_row("orders_ix", "region")];
        let map = resolve_indexes(&rows);
        assert_eq!(map.len(), 1);
        assert_eq!(map["orders_ix"].columns, vec!["region"]);
    }

    #[test]
    fn test_first_row_seeds_type_and_ordering() {
        let mut seed = ix_row("ix", "a");
        seed.index_type = Some("hash".to_string());
        seed.ordering = Some("DESC".to_string());
        let mut late = ix_row("ix", "b");
        late.index_type = Some("btree".to_string());
        late.ordering = Some("ASC".to_string());
        let map = resolve_indexes(&[seed, late]);
        let constraint = &map["ix"];
        assert_eq!(constraint.index_type.as_deref(), Some("hash"));
        assert_eq!(constraint.ordering.as_deref(), Some("DESC"));
    }

    #[test]
    fn test_duplicate_columns_collapse() {
        let rows = vec![ix_row("ix", "a"), ix_row("ix", "a")];
        let map = resolve_indexes(&rows);
        assert_eq!(map["ix"].columns, vec!["a"]);
    }
}
